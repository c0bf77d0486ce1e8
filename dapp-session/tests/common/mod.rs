//! # Test Harness
//!
//! In-memory EIP-1193 provider with real secp256k1 accounts, a scripted
//! `Storage` contract and an event emitter, plus a notifier that records
//! everything it is handed.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use alloy_primitives::{hex, keccak256, Address, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall, SolValue};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use dapp_session::error::ProviderError;
use dapp_session::services::provider::{EventListener, ListenerId, ProviderEventKind};
use dapp_session::services::ProviderProbe;
use dapp_session::utils::constants::STORAGE_CONTRACT_ADDRESS;
use dapp_session::{
    Eip1193Provider, Notifier, ProviderEvent, SessionConfig, WalletOrchestrator,
};
use shared::Notification;

sol! {
    interface StorageNode {
        function store(uint256 num) external;
        function retrieve() external view returns (uint256);
    }
}

/// 1.5 ether
pub const ONE_AND_A_HALF_ETH: &str = "0x14d1120d7b160000";
pub const SEPOLIA: &str = "0xaa36a7";
pub const MAINNET: &str = "0x1";

struct MockState {
    signers: Vec<PrivateKeySigner>,
    authorized: bool,
    chain_id: String,
    balances: HashMap<Address, String>,
    contract: Address,
    stored: U256,
    tx_count: u64,
    failures: HashMap<String, ProviderError>,
    requests: Vec<String>,
    last_passphrase: Option<String>,
}

pub struct MockProvider {
    state: RefCell<MockState>,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, (ProviderEventKind, EventListener)>>,
    metamask: bool,
    gates: RefCell<HashMap<String, Rc<Notify>>>,
}

impl MockProvider {
    /// MetaMask-flavoured provider with `accounts` keys, none authorized yet
    pub fn new(accounts: usize) -> Self {
        Self {
            state: RefCell::new(MockState {
                signers: (0..accounts).map(|_| PrivateKeySigner::random()).collect(),
                authorized: false,
                chain_id: SEPOLIA.to_string(),
                balances: HashMap::new(),
                contract: STORAGE_CONTRACT_ADDRESS,
                stored: U256::ZERO,
                tx_count: 0,
                failures: HashMap::new(),
                requests: Vec::new(),
                last_passphrase: None,
            }),
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
            metamask: true,
            gates: RefCell::new(HashMap::new()),
        }
    }

    /// Injected provider that does not identify as MetaMask
    pub fn generic(accounts: usize) -> Self {
        Self {
            metamask: false,
            ..Self::new(accounts)
        }
    }

    /// Accounts as the wallet reports them (checksummed)
    pub fn accounts(&self) -> Vec<String> {
        self.state
            .borrow()
            .signers
            .iter()
            .map(|signer| signer.address().to_checksum(None))
            .collect()
    }

    pub fn address(&self, index: usize) -> Address {
        self.state.borrow().signers[index].address()
    }

    /// Sign `message` off-band with account `index`, the way the wallet would
    pub fn sign_digest_with(&self, index: usize, message: &str) -> String {
        let digest = keccak256(message.as_bytes());
        let signature = self.state.borrow().signers[index]
            .sign_message_sync(digest.as_slice())
            .expect("Signing should succeed in test");
        hex::encode_prefixed(signature.as_bytes())
    }

    /// Mark accounts as already authorized (eth_accounts returns them)
    pub fn authorize(&self) {
        self.state.borrow_mut().authorized = true;
    }

    pub fn set_chain_id(&self, chain_id: &str) {
        self.state.borrow_mut().chain_id = chain_id.to_string();
    }

    pub fn set_balance(&self, index: usize, wei_hex: &str) {
        let address = self.address(index);
        self.state
            .borrow_mut()
            .balances
            .insert(address, wei_hex.to_string());
    }

    /// Move the contract elsewhere so `eth_call` at the configured address finds no code
    pub fn undeploy_contract(&self) {
        self.state.borrow_mut().contract = Address::repeat_byte(0xee);
    }

    /// Make every later call to `method` reject with `error`
    pub fn fail(&self, method: &str, error: ProviderError) {
        self.state
            .borrow_mut()
            .failures
            .insert(method.to_string(), error);
    }

    /// Hold the next call to `method` until the returned gate is notified
    pub fn gate(&self, method: &str) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.gates
            .borrow_mut()
            .insert(method.to_string(), Rc::clone(&gate));
        gate
    }

    pub fn recover(&self, method: &str) {
        self.state.borrow_mut().failures.remove(method);
    }

    pub fn stored(&self) -> U256 {
        self.state.borrow().stored
    }

    /// Third `personal_sign` param of the last sign request
    pub fn last_passphrase(&self) -> Option<String> {
        self.state.borrow().last_passphrase.clone()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.borrow().requests.clone()
    }

    pub fn request_count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|m| *m == method)
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Push an event to every listener registered for its kind
    pub fn emit(&self, event: ProviderEvent) {
        for (kind, listener) in self.listeners.borrow().values() {
            if *kind == event.kind() {
                listener(event.clone());
            }
        }
    }

    fn handle(&self, method: &str, params: &Value) -> Result<Value, ProviderError> {
        let mut state = self.state.borrow_mut();
        match method {
            "eth_accounts" => {
                if state.authorized {
                    Ok(json!(accounts_of(&state)))
                } else {
                    Ok(json!([]))
                }
            }
            "eth_requestAccounts" => {
                state.authorized = true;
                Ok(json!(accounts_of(&state)))
            }
            "eth_getBalance" => {
                let address = parse_address(&params[0])?;
                let balance = state
                    .balances
                    .get(&address)
                    .cloned()
                    .unwrap_or_else(|| "0x0".to_string());
                Ok(json!(balance))
            }
            "eth_chainId" => Ok(json!(state.chain_id)),
            "personal_sign" => {
                let data = parse_data(&params[0])?;
                let signer_address = parse_address(&params[1])?;
                let signer = state
                    .signers
                    .iter()
                    .find(|signer| signer.address() == signer_address)
                    .ok_or_else(|| ProviderError::new(4100, "unknown account"))?
                    .clone();
                state.last_passphrase = params[2].as_str().map(str::to_string);
                let signature = signer
                    .sign_message_sync(&data)
                    .map_err(|e| ProviderError::internal(e.to_string()))?;
                Ok(json!(hex::encode_prefixed(signature.as_bytes())))
            }
            "eth_call" => {
                let to = parse_address(&params[0]["to"])?;
                if to != state.contract {
                    return Ok(json!("0x"));
                }
                let data = parse_data(&params[0]["data"])?;
                if !data.starts_with(&StorageNode::retrieveCall::SELECTOR) {
                    return Err(ProviderError::internal("execution reverted"));
                }
                Ok(json!(hex::encode_prefixed(state.stored.abi_encode())))
            }
            "eth_sendTransaction" => {
                let data = parse_data(&params[0]["data"])?;
                let call = StorageNode::storeCall::abi_decode(&data)
                    .map_err(|_| ProviderError::internal("execution reverted"))?;
                state.stored = call.num;
                state.tx_count += 1;
                let hash = keccak256(state.tx_count.to_be_bytes());
                Ok(json!(hash.to_string()))
            }
            other => Err(ProviderError::new(4200, format!("unsupported method {other}"))),
        }
    }
}

fn accounts_of(state: &MockState) -> Vec<String> {
    state
        .signers
        .iter()
        .map(|signer| signer.address().to_checksum(None))
        .collect()
}

fn parse_address(value: &Value) -> Result<Address, ProviderError> {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ProviderError::new(-32602, format!("invalid address param {value}")))
}

fn parse_data(value: &Value) -> Result<Vec<u8>, ProviderError> {
    value
        .as_str()
        .and_then(|raw| hex::decode(raw).ok())
        .ok_or_else(|| ProviderError::new(-32602, format!("invalid data param {value}")))
}

#[async_trait(?Send)]
impl Eip1193Provider for MockProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.state.borrow_mut().requests.push(method.to_string());
        let gate = self.gates.borrow_mut().remove(method);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(error) = self.state.borrow().failures.get(method) {
            return Err(error.clone());
        }
        self.handle(method, &params)
    }

    fn on(&self, kind: ProviderEventKind, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, (kind, listener));
        id
    }

    fn remove_listener(&self, _kind: ProviderEventKind, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }

    fn is_metamask(&self) -> bool {
        self.metamask
    }
}

/// Yield until `condition` holds
pub async fn wait_until(condition: impl Fn() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}

/// Probe that hands out a fixed provider (or none)
pub struct StaticProbe {
    provider: Option<Rc<MockProvider>>,
    probes: Cell<usize>,
}

impl StaticProbe {
    pub fn with(provider: &Rc<MockProvider>) -> Self {
        Self {
            provider: Some(Rc::clone(provider)),
            probes: Cell::new(0),
        }
    }

    pub fn empty() -> Self {
        Self {
            provider: None,
            probes: Cell::new(0),
        }
    }

    pub fn probes(&self) -> usize {
        self.probes.get()
    }
}

#[async_trait(?Send)]
impl ProviderProbe for StaticProbe {
    type Provider = MockProvider;

    async fn probe(&self, _silent: bool) -> Option<Rc<MockProvider>> {
        self.probes.set(self.probes.get() + 1);
        self.provider.clone()
    }
}

/// Notifier that keeps every notification for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.borrow().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.seen.borrow().iter().map(|n| n.title.clone()).collect()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.borrow().last().cloned()
    }

    pub fn errors(&self) -> usize {
        self.seen.borrow().iter().filter(|n| n.is_error()).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}

pub struct Harness {
    pub session: WalletOrchestrator<MockProvider>,
    pub provider: Rc<MockProvider>,
    pub notifier: Rc<RecordingNotifier>,
}

/// Orchestrator with a discovered (not yet connected) mock provider
pub async fn discovered(config: SessionConfig, provider: MockProvider) -> Harness {
    let provider = Rc::new(provider);
    let notifier = Rc::new(RecordingNotifier::default());
    let session = WalletOrchestrator::new(config, Rc::clone(&notifier) as Rc<dyn Notifier>)
        .expect("Config should be valid in test");
    session.get_provider(&StaticProbe::with(&provider)).await;
    Harness {
        session,
        provider,
        notifier,
    }
}

/// Orchestrator connected as account 0 holding 1.5 ether on Sepolia
pub async fn connected(config: SessionConfig) -> Harness {
    let provider = MockProvider::new(2);
    provider.set_balance(0, ONE_AND_A_HALF_ETH);
    let harness = discovered(config, provider).await;
    harness
        .session
        .connect()
        .await
        .expect("Connect should succeed in test");
    harness
}
