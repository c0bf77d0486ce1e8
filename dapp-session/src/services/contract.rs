//! # Storage Contract Binding
//!
//! ABI for the single contract the session talks to, and the two calls made
//! against it. Encoding goes through `alloy-sol-types`; transport goes through
//! the injected provider (`eth_call` / `eth_sendTransaction`).

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::{sol, SolCall, SolValue};

use crate::error::{Result, SessionError};
use crate::services::provider::{Eip1193Provider, ProviderExt};

sol! {
    /// Minimal value store: one `uint256` slot
    interface IStorage {
        function store(uint256 num) external;
        function retrieve() external view returns (uint256);
    }
}

/// Handle on a deployed `Storage` contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageContract {
    address: Address,
}

impl StorageContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Send `store(value)` from `from`; resolves with the transaction hash
    pub async fn store<P>(&self, provider: &P, from: Address, value: U256) -> Result<TxHash>
    where
        P: Eip1193Provider + ?Sized,
    {
        let calldata = IStorage::storeCall { num: value }.abi_encode();
        provider.send_transaction(from, self.address, &calldata).await
    }

    /// Read the stored value with `eth_call`
    pub async fn retrieve<P>(&self, provider: &P) -> Result<U256>
    where
        P: Eip1193Provider + ?Sized,
    {
        let calldata = IStorage::retrieveCall {}.abi_encode();
        let output = provider.call(self.address, &calldata).await?;
        if output.is_empty() {
            return Err(SessionError::RequestFailed(format!(
                "no contract code at {}",
                self.address
            )));
        }
        U256::abi_decode(&output)
            .map_err(|e| SessionError::InvalidResponse(format!("retrieve() output: {e}")))
    }
}
