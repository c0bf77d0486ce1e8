//! # Contract Interaction Flow
//!
//! Write (`store`) and read (`retrieve`) against the `Storage` contract. Each
//! side has its own pending flag and last error, so a pending write never
//! blocks a read and neither clears the other's error.

use std::rc::Rc;

use alloy_primitives::{Address, TxHash, U256};
use parking_lot::RwLock;
use shared::{ContractSnapshot, Notification};

use crate::error::{Result, SessionError};
use crate::services::contract::StorageContract;
use crate::services::notify::Notifier;
use crate::services::provider::Eip1193Provider;
use crate::state::flags::PendingFlag;

/// Which contract call a status belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCallRequest {
    Write(U256),
    Read,
}

/// Pending flag and last error of one call kind
#[derive(Debug, Default)]
pub struct CallStatus {
    pending: PendingFlag,
    last_error: RwLock<Option<String>>,
}

impl CallStatus {
    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    fn record(&self, outcome: std::result::Result<(), &SessionError>) {
        *self.last_error.write() = outcome.err().map(SessionError::user_message);
    }
}

#[derive(Debug, Default)]
struct ContractState {
    store_input: String,
    retrieved: Option<U256>,
    last_transaction: Option<TxHash>,
}

pub struct ContractFlow {
    contract: StorageContract,
    notifier: Rc<dyn Notifier>,
    store: CallStatus,
    retrieve: CallStatus,
    state: RwLock<ContractState>,
}

impl ContractFlow {
    pub fn new(contract: StorageContract, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            contract,
            notifier,
            store: CallStatus::default(),
            retrieve: CallStatus::default(),
            state: RwLock::new(ContractState::default()),
        }
    }

    pub fn contract(&self) -> StorageContract {
        self.contract
    }

    pub fn store_status(&self) -> &CallStatus {
        &self.store
    }

    pub fn retrieve_status(&self) -> &CallStatus {
        &self.retrieve
    }

    pub fn status(&self, request: &ContractCallRequest) -> &CallStatus {
        match request {
            ContractCallRequest::Write(_) => &self.store,
            ContractCallRequest::Read => &self.retrieve,
        }
    }

    pub fn set_store_input(&self, input: impl Into<String>) {
        self.state.write().store_input = input.into();
    }

    pub fn store_input(&self) -> String {
        self.state.read().store_input.clone()
    }

    /// Value shown from the last successful `retrieve`
    pub fn retrieved_value(&self) -> Option<U256> {
        self.state.read().retrieved
    }

    pub fn last_transaction(&self) -> Option<TxHash> {
        self.state.read().last_transaction
    }

    pub fn snapshot(&self) -> ContractSnapshot {
        let state = self.state.read();
        ContractSnapshot {
            store_input: state.store_input.clone(),
            store_pending: self.store.is_pending(),
            store_error: self.store.last_error(),
            last_transaction: state.last_transaction.map(|hash| hash.to_string()),
            retrieve_pending: self.retrieve.is_pending(),
            retrieve_error: self.retrieve.last_error(),
            retrieved_value: state.retrieved.map(|value| value.to_string()),
        }
    }

    /// Parse the store input field as a decimal (or `0x` hex) `uint256`
    pub fn parse_store_input(&self) -> Result<U256> {
        parse_store_value(&self.store_input())
    }

    /// Parse `raw` as a store value, recording and notifying a rejection
    pub fn validate_store_value(&self, raw: &str) -> Result<U256> {
        parse_store_value(raw).inspect_err(|e| {
            self.store.record(Err(e));
            self.notifier
                .notify(Notification::error("Store failed", e.user_message()));
        })
    }

    /// [`ContractFlow::validate_store_value`] on the store input field
    pub fn validated_store_input(&self) -> Result<U256> {
        self.validate_store_value(&self.store_input())
    }

    /// Send `store(value)` from `from`
    pub async fn store_value<P>(&self, provider: &P, from: Address, value: U256) -> Result<TxHash>
    where
        P: Eip1193Provider + ?Sized,
    {
        let _pending = self.store.pending.begin();
        log::info!("[CONTRACT] store({value}) from {from}");

        match self.contract.store(provider, from, value).await {
            Ok(hash) => {
                self.store.record(Ok(()));
                {
                    let mut state = self.state.write();
                    state.store_input.clear();
                    state.last_transaction = Some(hash);
                }
                self.notifier
                    .notify(Notification::success("Value stored", format!("Transaction {hash}")));
                Ok(hash)
            }
            Err(e) => {
                log::warn!("[CONTRACT] store failed: {e}");
                self.store.record(Err(&e));
                self.notifier
                    .notify(Notification::error("Store failed", e.user_message()));
                Err(e)
            }
        }
    }

    /// Read the stored value and update the display field
    pub async fn retrieve_value<P>(&self, provider: &P) -> Result<U256>
    where
        P: Eip1193Provider + ?Sized,
    {
        let _pending = self.retrieve.pending.begin();
        log::debug!("[CONTRACT] retrieve()");

        match self.contract.retrieve(provider).await {
            Ok(value) => {
                self.retrieve.record(Ok(()));
                self.state.write().retrieved = Some(value);
                Ok(value)
            }
            Err(e) => {
                log::warn!("[CONTRACT] retrieve failed: {e}");
                self.retrieve.record(Err(&e));
                self.notifier
                    .notify(Notification::error("Retrieve failed", e.user_message()));
                Err(e)
            }
        }
    }
}

fn parse_store_value(raw: &str) -> Result<U256> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::InvalidInput("enter a value to store".to_string()));
    }
    trimmed
        .parse::<U256>()
        .map_err(|_| SessionError::InvalidInput(format!("{trimmed:?} is not a uint256")))
}
