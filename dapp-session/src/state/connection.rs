//! Connection lifecycle state

use std::sync::Arc;

use parking_lot::RwLock;

use crate::state::flags::{PendingFlag, PendingGuard};

/// Where the session is in its connect lifecycle
///
/// `Disconnected → Connecting → Connected`, back to `Disconnected` on an
/// empty `accountsChanged` or a failed connect. Nothing moves to
/// `Connecting` without an explicit `connect()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionPhase {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionPhase::Connected)
    }
}

/// `connecting` flag plus the last connect error shown to the user
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    connecting: PendingFlag,
    error: Arc<RwLock<Option<String>>>,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "connecting is cleared as soon as the guard is dropped"]
    pub fn begin_connecting(&self) -> PendingGuard {
        self.connecting.begin()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting.is_pending()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.write() = Some(message.into());
    }

    pub fn clear_error(&self) {
        *self.error.write() = None;
    }

    pub fn has_error(&self) -> bool {
        self.error.read().is_some()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Derive the lifecycle phase given whether the session holds accounts
    pub fn phase(&self, has_accounts: bool) -> ConnectionPhase {
        if self.is_connecting() {
            ConnectionPhase::Connecting
        } else if has_accounts {
            ConnectionPhase::Connected
        } else {
            ConnectionPhase::Disconnected
        }
    }
}
