//! Application constants

use alloy_primitives::{address, Address};

/// Default `Storage` contract deployment
pub const STORAGE_CONTRACT_ADDRESS: Address = address!("d9145CCE52D386f254917e481eB44e9943F39138");

/// Decimals between wei and ether
pub const NATIVE_DECIMALS: u8 = 18;

/// Decimal places shown for balances
pub const DEFAULT_DISPLAY_PRECISION: u8 = 2;

/// Grace period for providers that inject after page load (MetaMask detect-provider uses 3s)
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u32 = 3000;

// EIP-1193 methods
pub const ETH_ACCOUNTS: &str = "eth_accounts";
pub const ETH_REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
pub const ETH_GET_BALANCE: &str = "eth_getBalance";
pub const ETH_CHAIN_ID: &str = "eth_chainId";
pub const PERSONAL_SIGN: &str = "personal_sign";
pub const ETH_CALL: &str = "eth_call";
pub const ETH_SEND_TRANSACTION: &str = "eth_sendTransaction";

pub const LATEST_BLOCK: &str = "latest";

// EIP-1193 events
pub const ACCOUNTS_CHANGED: &str = "accountsChanged";
pub const CHAIN_CHANGED: &str = "chainChanged";
