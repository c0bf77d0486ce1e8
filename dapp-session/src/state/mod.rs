//! Session state containers

pub mod connection;
pub mod flags;
pub mod session;

pub use connection::{ConnectionPhase, ConnectionState};
pub use flags::{PendingFlag, PendingGuard};
pub use session::{Session, SessionCommand, SessionStore};
