use serde::{Deserialize, Serialize};

/// Whether an injected wallet provider was found
///
/// Starts as `Unknown` and is resolved exactly once by discovery.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    Unknown,
    Present,
    Absent,
}

impl Availability {
    pub fn is_present(&self) -> bool {
        matches!(self, Availability::Present)
    }
}

/// Snapshot of the signing flow for display
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SigningSnapshot {
    pub is_loading: bool,
    pub message_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Snapshot of the contract interaction flow for display
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub store_input: String,
    pub store_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transaction: Option<String>,
    pub retrieve_pending: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieve_error: Option<String>,
    /// Last value read from the contract, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieved_value: Option<String>,
}

/// Everything the UI needs to render the wallet session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub provider: Availability,
    pub can_connect: bool,
    pub connecting: bool,
    pub accounts: Vec<String>,
    pub balance: String,
    pub chain_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id_numeric: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub signing: SigningSnapshot,
    pub contract: ContractSnapshot,
}

impl SessionSnapshot {
    pub fn is_connected(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn active_account(&self) -> Option<&str> {
        self.accounts.first().map(String::as_str)
    }
}
