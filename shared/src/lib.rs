//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the wallet session core and the
//! JavaScript UI that renders it. All DTOs use JSON serialization via `serde`
//! and cross the wasm boundary through `serde-wasm-bindgen`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects
//!   - **[`dto::session`]**: Session snapshot, provider availability, flow state
//!   - **[`dto::notification`]**: Toast notifications
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::{Notification, SessionSnapshot};
//! use shared::utils::truncate_address;
//!
//! let snapshot = SessionSnapshot {
//!     accounts: vec!["0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string()],
//!     ..Default::default()
//! };
//! let display = truncate_address(snapshot.active_account().unwrap_or_default());
//! assert_eq!(display, "0x7099...79C8");
//!
//! let toast = Notification::success("Connected", display);
//! assert!(!toast.is_error());
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
