//! # Connection Orchestrator
//!
//! Owns the process-wide session state and drives everything that changes
//! it: discovery at mount, the user-initiated connect handshake, wallet
//! refreshes and provider events. It also fronts the signing and contract
//! flows, resolving the provider handle and the active account for them.
//!
//! Every provider failure is caught here and turned into the error banner or
//! a notification. Nothing retries on its own.
//!
//! ## Ordering
//!
//! Inside one operation steps are sequenced: the balance fetch starts only
//! once the account list is known. Across operations there is no ordering.
//! A `connect()` in flight and an `accountsChanged` event may both write the
//! session, and the last write wins.

use std::rc::Rc;

use alloy_primitives::{Address, TxHash, U256};
use once_cell::unsync::OnceCell;
use parking_lot::RwLock;
use shared::{Availability, SessionSnapshot};

use crate::config::{ChainChangePolicy, SessionConfig};
use crate::error::{Result, SessionError};
use crate::services::contract::StorageContract;
use crate::services::discovery::{discover, ProviderProbe};
use crate::services::notify::Notifier;
use crate::services::provider::{Eip1193Provider, ProviderEvent, ProviderExt};
use crate::session::contract::ContractFlow;
use crate::session::events::EventSubscriptionManager;
use crate::session::signing::{SignatureResult, SigningFlow};
use crate::state::connection::{ConnectionPhase, ConnectionState};
use crate::state::session::{Session, SessionCommand, SessionStore};
use crate::utils::format::{format_balance_with, format_chain_as_num};

pub struct WalletOrchestrator<P: Eip1193Provider> {
    config: SessionConfig,
    availability: RwLock<Availability>,
    provider: OnceCell<Rc<P>>,
    store: SessionStore,
    connection: ConnectionState,
    events: EventSubscriptionManager<P>,
    signing: SigningFlow,
    contract: ContractFlow,
}

impl<P: Eip1193Provider> WalletOrchestrator<P> {
    /// Build a session for `config`, rejecting configurations that fail [`SessionConfig::validate`]
    pub fn new(config: SessionConfig, notifier: Rc<dyn Notifier>) -> Result<Self> {
        config.validate()?;
        let signing = SigningFlow::new(Rc::clone(&notifier), config.sign_passphrase.clone());
        let contract = ContractFlow::new(StorageContract::new(config.contract_address), notifier);
        Ok(Self {
            config,
            availability: RwLock::new(Availability::Unknown),
            provider: OnceCell::new(),
            store: SessionStore::new(),
            connection: ConnectionState::new(),
            events: EventSubscriptionManager::new(),
            signing,
            contract,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn availability(&self) -> Availability {
        *self.availability.read()
    }

    /// The discovered provider, or `ProviderUnavailable`
    pub fn provider(&self) -> Result<&Rc<P>> {
        self.provider.get().ok_or(SessionError::ProviderUnavailable)
    }

    pub fn session(&self) -> Session {
        self.store.snapshot()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn events(&self) -> &EventSubscriptionManager<P> {
        &self.events
    }

    pub fn signing(&self) -> &SigningFlow {
        &self.signing
    }

    pub fn contract(&self) -> &ContractFlow {
        &self.contract
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.connection.phase(self.store.is_connected())
    }

    /// Whether a `connect()` is waiting on the wallet
    pub fn is_connecting(&self) -> bool {
        self.connection.is_connecting()
    }

    /// Whether a connect button should be offered: MetaMask present and no account yet
    pub fn can_connect(&self) -> bool {
        self.provider
            .get()
            .is_some_and(|provider| provider.is_metamask())
            && !self.store.is_connected()
    }

    /// Hide the error banner
    pub fn dismiss_error(&self) {
        self.connection.clear_error();
    }

    /// Discover the provider, load already-authorized accounts and subscribe to events.
    ///
    /// Runs once; later calls return the recorded availability.
    pub async fn get_provider<D>(&self, probe: &D) -> Availability
    where
        D: ProviderProbe<Provider = P>,
    {
        if self.availability() != Availability::Unknown {
            return self.availability();
        }

        let discovery = discover(probe, true).await;
        let availability = discovery.availability();
        *self.availability.write() = availability;

        let Some(provider) = discovery.into_provider() else {
            return availability;
        };
        let provider = Rc::clone(self.provider.get_or_init(|| provider));

        match provider.accounts().await {
            Ok(accounts) if !accounts.is_empty() => {
                log::info!("[CONNECT] Restoring {} authorized account(s)", accounts.len());
                if let Err(e) = self.refresh_wallet(&accounts).await {
                    self.connection.set_error(e.user_message());
                }
            }
            Ok(_) => log::debug!("[CONNECT] No authorized accounts yet"),
            Err(e) => {
                log::warn!("[CONNECT] eth_accounts failed: {e}");
                self.connection.set_error(e.user_message());
            }
        }

        self.events.subscribe(provider);
        availability
    }

    /// Ask the user to authorize an account, then load its wallet state
    pub async fn connect(&self) -> Result<()> {
        let provider = Rc::clone(self.provider()?);
        let _connecting = self.connection.begin_connecting();
        log::info!("[CONNECT] Requesting account access");

        let accounts = match provider.request_accounts().await {
            Ok(accounts) => accounts,
            Err(e) => {
                log::warn!("[CONNECT] eth_requestAccounts rejected: {e}");
                self.connection.set_error(e.user_message());
                return Err(e);
            }
        };

        self.connection.clear_error();
        if let Err(e) = self.refresh_wallet(&accounts).await {
            self.connection.set_error(e.user_message());
            return Err(e);
        }
        log::info!("[CONNECT] Connected as {}", accounts.first().map(String::as_str).unwrap_or("-"));
        Ok(())
    }

    /// Fetch balance and chain id for `accounts[0]` and write the whole session.
    ///
    /// An empty list resets the session.
    pub async fn refresh_wallet(&self, accounts: &[String]) -> Result<()> {
        let Some(active) = accounts.first() else {
            self.store.apply(SessionCommand::Reset);
            return Ok(());
        };
        let provider = self.provider()?;

        let raw_balance = provider.balance(active).await?;
        let balance = format_balance_with(
            &raw_balance,
            self.config.native_decimals,
            self.config.display_precision,
        )?;
        let chain_id = provider.chain_id().await?;

        self.store.apply(SessionCommand::Replace(Session {
            accounts: accounts.to_vec(),
            balance,
            chain_id,
        }));
        Ok(())
    }

    /// React to one provider event
    pub async fn handle_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) if accounts.is_empty() => {
                log::info!("[EVENTS] Accounts cleared, session ended");
                self.store.apply(SessionCommand::Reset);
            }
            ProviderEvent::AccountsChanged(accounts) => {
                log::info!("[EVENTS] Active account is now {}", accounts[0]);
                if let Err(e) = self.refresh_wallet(&accounts).await {
                    log::warn!("[EVENTS] Refresh after accountsChanged failed: {e}");
                    self.connection.set_error(e.user_message());
                }
            }
            ProviderEvent::ChainChanged(chain_id) => {
                log::info!("[EVENTS] Chain changed to {chain_id}");
                self.store.apply(SessionCommand::SetChainId(chain_id));
                if self.config.chain_change_policy == ChainChangePolicy::RefreshWallet {
                    let accounts = self.store.accounts();
                    if !accounts.is_empty() {
                        if let Err(e) = self.refresh_wallet(&accounts).await {
                            log::warn!("[EVENTS] Refresh after chainChanged failed: {e}");
                            self.connection.set_error(e.user_message());
                        }
                    }
                }
            }
        }
    }

    /// Handle every event already queued; returns how many were handled
    pub async fn process_pending_events(&self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.events().try_recv() {
            self.handle_event(event).await;
            handled += 1;
        }
        handled
    }

    /// Handle events as they arrive until the queue closes
    pub async fn run_event_loop(&self) {
        while let Ok(event) = self.events.events().recv().await {
            self.handle_event(event).await;
        }
        log::debug!("[EVENTS] Event loop stopped");
    }

    /// Remove provider listeners and stop the event loop
    pub fn teardown(&self) {
        if self.events.unsubscribe() {
            log::info!("[EVENTS] Unsubscribed from provider events");
        }
        self.events.events().close();
    }

    /// Active signer parsed as an address
    pub fn active_signer(&self) -> Result<Address> {
        let account = self.store.active_account().ok_or(SessionError::NotConnected)?;
        account
            .parse()
            .map_err(|e| SessionError::InvalidResponse(format!("account {account:?}: {e}")))
    }

    /// Sign `message` with the active account
    pub async fn sign(&self, message: &str) -> Result<SignatureResult> {
        let provider = Rc::clone(self.provider()?);
        let signer = self.active_signer()?;
        self.signing.sign(provider.as_ref(), message, signer).await
    }

    /// Sign whatever is in the message input field
    pub async fn sign_input(&self) -> Result<SignatureResult> {
        let message = self.signing.message_input();
        self.sign(&message).await
    }

    pub fn verify(&self, message: &str, signature: &str, claimed_signer: &str) -> bool {
        self.signing.verify(message, signature, claimed_signer)
    }

    /// Store `value` from the active account
    pub async fn store_value(&self, value: U256) -> Result<TxHash> {
        let provider = Rc::clone(self.provider()?);
        let from = self.active_signer()?;
        self.contract.store_value(provider.as_ref(), from, value).await
    }

    /// Store the number typed into the store input field
    pub async fn store_input(&self) -> Result<TxHash> {
        let value = self.contract.validated_store_input()?;
        self.store_value(value).await
    }

    /// Store a value typed by the caller (decimal or `0x` hex)
    pub async fn store_text(&self, raw: &str) -> Result<TxHash> {
        let value = self.contract.validate_store_value(raw)?;
        self.store_value(value).await
    }

    pub async fn retrieve_value(&self) -> Result<U256> {
        let provider = Rc::clone(self.provider()?);
        self.contract.retrieve_value(provider.as_ref()).await
    }

    /// Serializable view for the UI
    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.store.snapshot();
        SessionSnapshot {
            provider: self.availability(),
            can_connect: self.can_connect(),
            connecting: self.connection.is_connecting(),
            chain_id_numeric: format_chain_as_num(&session.chain_id),
            accounts: session.accounts,
            balance: session.balance,
            chain_id: session.chain_id,
            error: self.connection.error_message(),
            signing: self.signing.snapshot(),
            contract: self.contract.snapshot(),
        }
    }
}

impl<P: Eip1193Provider> Drop for WalletOrchestrator<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
