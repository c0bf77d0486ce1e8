//! # EIP-1193 Provider Boundary
//!
//! [`Eip1193Provider`] is the only way the session core talks to a wallet:
//! one JSON-RPC style `request` plus an event emitter (`on` /
//! `remove_listener`). The browser binding wraps `window.ethereum`; tests use
//! an in-memory provider.
//!
//! [`ProviderExt`] layers typed helpers for the handful of methods the core
//! uses on top of the raw `request`, so call sites never build JSON by hand.
//!
//! Futures are `?Send`: the provider lives on the browser main thread.

use alloy_primitives::{hex, Address, Bytes, B256};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ProviderError, Result, SessionError};
use crate::utils::constants::{
    ACCOUNTS_CHANGED, CHAIN_CHANGED, ETH_ACCOUNTS, ETH_CALL, ETH_CHAIN_ID, ETH_GET_BALANCE,
    ETH_REQUEST_ACCOUNTS, ETH_SEND_TRANSACTION, LATEST_BLOCK, PERSONAL_SIGN,
};

/// Events the session listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEventKind {
    AccountsChanged,
    ChainChanged,
}

impl ProviderEventKind {
    /// Event name as emitted by the provider
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEventKind::AccountsChanged => ACCOUNTS_CHANGED,
            ProviderEventKind::ChainChanged => CHAIN_CHANGED,
        }
    }
}

/// A provider-pushed notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// New authorized account list; empty means the session ended
    AccountsChanged(Vec<String>),
    /// New chain id, hex encoded
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> ProviderEventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => ProviderEventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => ProviderEventKind::ChainChanged,
        }
    }
}

/// Identifies a registered listener so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked for each event of the kind it was registered for
pub type EventListener = Box<dyn Fn(ProviderEvent)>;

/// An injected EIP-1193 provider
#[async_trait(?Send)]
pub trait Eip1193Provider {
    /// Send a JSON-RPC request; `params` is the positional params array
    async fn request(&self, method: &str, params: Value) -> std::result::Result<Value, ProviderError>;

    /// Register `listener` for `kind`
    fn on(&self, kind: ProviderEventKind, listener: EventListener) -> ListenerId;

    /// Remove a listener previously returned by [`Eip1193Provider::on`]
    fn remove_listener(&self, kind: ProviderEventKind, id: ListenerId);

    /// Whether the provider identifies itself as MetaMask
    fn is_metamask(&self) -> bool {
        false
    }
}

/// Typed wrappers over the raw provider methods the session uses
#[async_trait(?Send)]
pub trait ProviderExt: Eip1193Provider {
    /// `eth_accounts`: already authorized accounts, never prompts
    async fn accounts(&self) -> Result<Vec<String>> {
        let value = self.request(ETH_ACCOUNTS, json!([])).await?;
        parse_accounts(value)
    }

    /// `eth_requestAccounts`: may prompt the user
    async fn request_accounts(&self) -> Result<Vec<String>> {
        let value = self.request(ETH_REQUEST_ACCOUNTS, json!([])).await?;
        parse_accounts(value)
    }

    /// `eth_getBalance(address, "latest")`, returned raw (hex wei)
    async fn balance(&self, address: &str) -> Result<String> {
        let value = self.request(ETH_GET_BALANCE, json!([address, LATEST_BLOCK])).await?;
        expect_string(value, ETH_GET_BALANCE)
    }

    /// `eth_chainId`, hex encoded
    async fn chain_id(&self) -> Result<String> {
        let value = self.request(ETH_CHAIN_ID, json!([])).await?;
        expect_string(value, ETH_CHAIN_ID)
    }

    /// `personal_sign(data, address, passphrase)` over raw bytes
    async fn personal_sign(&self, data: &[u8], signer: Address, passphrase: &str) -> Result<String> {
        let value = self
            .request(
                PERSONAL_SIGN,
                json!([hex::encode_prefixed(data), signer, passphrase]),
            )
            .await?;
        expect_string(value, PERSONAL_SIGN)
    }

    /// `eth_call` at the latest block
    async fn call(&self, to: Address, data: &[u8]) -> Result<Bytes> {
        let tx = json!({ "to": to, "data": hex::encode_prefixed(data) });
        let value = self.request(ETH_CALL, json!([tx, LATEST_BLOCK])).await?;
        let raw = expect_string(value, ETH_CALL)?;
        raw.parse::<Bytes>()
            .map_err(|e| SessionError::InvalidResponse(format!("{ETH_CALL} returned non-hex data: {e}")))
    }

    /// `eth_sendTransaction`; resolves with the transaction hash
    async fn send_transaction(&self, from: Address, to: Address, data: &[u8]) -> Result<B256> {
        let tx = json!({ "from": from, "to": to, "data": hex::encode_prefixed(data) });
        let value = self.request(ETH_SEND_TRANSACTION, json!([tx])).await?;
        let raw = expect_string(value, ETH_SEND_TRANSACTION)?;
        raw.parse::<B256>().map_err(|e| {
            SessionError::InvalidResponse(format!("{ETH_SEND_TRANSACTION} returned bad hash: {e}"))
        })
    }
}

impl<P: Eip1193Provider + ?Sized> ProviderExt for P {}

/// Decode an account list as returned by `eth_accounts` or an `accountsChanged` event
pub fn parse_accounts(value: Value) -> Result<Vec<String>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(address) => Ok(address),
                other => Err(SessionError::InvalidResponse(format!(
                    "account entry is not a string: {other}"
                ))),
            })
            .collect(),
        other => Err(SessionError::InvalidResponse(format!(
            "account list is not an array: {other}"
        ))),
    }
}

fn expect_string(value: Value, method: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(SessionError::InvalidResponse(format!(
            "{method} returned {other}, expected a string"
        ))),
    }
}
