//! # dApp Wallet Session - Library Root
//!
//! Browser-resident session manager for an injected Ethereum wallet
//! (MetaMask or any EIP-1193 provider). It discovers the provider, keeps the
//! connected account, balance and chain in sync with wallet events, signs and
//! verifies messages, and drives a minimal `Storage` contract.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  page (JS)  ──►  bindings::WalletSession  (wasm32)     │
//! ├────────────────────────────────────────────────────────┤
//! │  session::WalletOrchestrator                           │
//! │    ├── state::SessionStore      accounts/balance/chain │
//! │    ├── state::ConnectionState   connecting + error     │
//! │    ├── session::events          provider listeners     │
//! │    ├── session::signing         personal_sign + verify │
//! │    └── session::contract        store / retrieve       │
//! ├────────────────────────────────────────────────────────┤
//! │  services::Eip1193Provider   (window.ethereum / mock)  │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The core is target independent; only `bindings` and `services::browser`
//! need `wasm32`. Everything else is exercised natively against an in-memory
//! provider.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use dapp_session::{LogNotifier, SessionConfig};
//!
//! let config = SessionConfig::default();
//! assert!(config.validate().is_ok());
//! let _notifier = Rc::new(LogNotifier);
//! ```

pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod bindings;

pub use config::{ChainChangePolicy, SessionConfig};
pub use error::{ProviderError, Result, SessionError};
pub use services::{Eip1193Provider, LogNotifier, Notifier, ProviderEvent, ProviderProbe};
pub use session::WalletOrchestrator;
pub use state::{ConnectionPhase, Session};

#[cfg(target_arch = "wasm32")]
pub use bindings::WalletSession;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();
}
