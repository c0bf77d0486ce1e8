//! # Session Flows
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            WalletOrchestrator                │
//! │  discovery · connect · refresh · events      │
//! ├───────────────┬──────────────┬───────────────┤
//! │ SigningFlow   │ ContractFlow │ Subscriptions │
//! └───────┬───────┴──────┬───────┴───────┬───────┘
//!         │              │               │
//!         └──────────────┼───────────────┘
//!                        ▼
//!               Eip1193Provider
//! ```

pub mod contract;
pub mod events;
pub mod orchestrator;
pub mod signing;

pub use contract::{CallStatus, ContractCallRequest, ContractFlow};
pub use events::{EventSubscriptionManager, Subscription};
pub use orchestrator::WalletOrchestrator;
pub use signing::{
    recover_signer, verify_signature, SignatureResult, SigningFlow, SigningRequest,
    VerificationRequest,
};
