//! Wallet session state
//!
//! [`SessionStore`] is the single source of truth for accounts, balance and
//! chain id. It only changes through [`SessionStore::apply`]; each provider
//! event or user action is expressed as one [`SessionCommand`]. Concurrent
//! writers are last-write-wins.

use std::sync::Arc;

use parking_lot::RwLock;

/// Accounts, balance and chain of the connected wallet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Authorized accounts; empty when disconnected, first entry is the active signer
    pub accounts: Vec<String>,
    /// Display-formatted native balance of the active account
    pub balance: String,
    /// Hex chain id
    pub chain_id: String,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn active_account(&self) -> Option<&str> {
        self.accounts.first().map(String::as_str)
    }
}

/// A single mutation of the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Write the whole tuple at once after a wallet refresh
    Replace(Session),
    /// Chain switched; accounts and balance are left untouched
    SetChainId(String),
    /// Back to the empty, disconnected state
    Reset,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, command: SessionCommand) {
        let mut session = self.session.write();
        match command {
            SessionCommand::Replace(next) => *session = next,
            SessionCommand::SetChainId(chain_id) => session.chain_id = chain_id,
            SessionCommand::Reset => *session = Session::default(),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.session.read().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.session.read().is_connected()
    }

    pub fn active_account(&self) -> Option<String> {
        self.session.read().active_account().map(str::to_string)
    }

    pub fn accounts(&self) -> Vec<String> {
        self.session.read().accounts.clone()
    }
}
