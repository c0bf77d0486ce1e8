//! # Data Transfer Objects (DTOs)
//!
//! Structures handed across the boundary between the session core and the
//! JavaScript UI that renders it.
//!
//! ## Module Organization
//!
//! - [`session`] - Serializable view of the wallet session and its flows
//! - [`notification`] - Toast payloads emitted for every user-facing outcome
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase, so the UI can read fields without renaming
//! - **Optional fields**: Omitted when `None`
//! - **Enums**: Lowercase strings
//!
//! ```text
//! {
//!   "severity": "success",
//!   "title": "Message signed",
//!   "message": "0x5f1c...1b"
//! }
//! ```

pub mod notification;
pub mod session;

pub use notification::*;
pub use session::*;
