//! # Services Module
//!
//! Boundaries to the outside world. Nothing here holds session state.
//!
//! ```text
//! services/
//! ├── provider.rs   - EIP-1193 trait and typed request helpers
//! ├── discovery.rs  - Injected provider detection
//! ├── contract.rs   - Storage contract ABI calls
//! ├── notify.rs     - User notification sink
//! └── browser.rs    - window.ethereum binding (wasm32 only)
//! ```

pub mod contract;
pub mod discovery;
pub mod notify;
pub mod provider;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use contract::StorageContract;
pub use discovery::{discover, Discovery, ProviderProbe};
pub use notify::{LogNotifier, Notifier};
pub use provider::{Eip1193Provider, ProviderEvent, ProviderEventKind, ProviderExt};
