//! # Error Types
//!
//! [`ProviderError`] is the raw shape an EIP-1193 provider rejects with
//! (`{ code, message }`). Everything the session core returns is a
//! [`SessionError`]; provider rejections convert by code, so a user
//! declining a prompt (code `4001`) becomes [`SessionError::UserRejected`]
//! and anything else becomes [`SessionError::RequestFailed`].
//!
//! None of these are fatal. Callers turn them into error flags or
//! notifications and the user recovers by retrying.
//!
//! ```rust
//! use dapp_session::error::{ProviderError, SessionError};
//!
//! let rejected: SessionError = ProviderError::new(4001, "User denied").into();
//! assert!(matches!(rejected, SessionError::UserRejected(_)));
//! assert_eq!(rejected.user_message(), "User denied");
//! ```

use thiserror::Error;

/// EIP-1193 code for "the user rejected the request"
pub const USER_REJECTED_CODE: i64 = 4001;

/// Error returned by an EIP-1193 `request` call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("provider error {code}: {message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The user declined the request
    pub fn user_rejected(message: impl Into<String>) -> Self {
        Self::new(USER_REJECTED_CODE, message)
    }

    /// Internal JSON-RPC error, used for reverts and transport failures
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(-32603, message)
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_CODE
    }
}

/// Session core error covering every failure the orchestrator surfaces.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No injected provider. Normally reported as an availability flag;
    /// returned only when an operation needs the provider anyway.
    #[error("No injected wallet provider found")]
    ProviderUnavailable,

    /// An operation needs an active account and the session is empty
    #[error("Wallet is not connected")]
    NotConnected,

    /// The user declined a connect or sign prompt
    #[error("{0}")]
    UserRejected(String),

    /// A provider or contract call failed (network, revert, unsupported method)
    #[error("{0}")]
    RequestFailed(String),

    /// The provider answered with something that does not parse
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    /// A signature could not be parsed or recovered
    #[error("Signature error: {0}")]
    Signature(String),

    /// User input that cannot be sent (e.g. a non-numeric store value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SessionError {
    /// Message suitable for an error banner or toast body.
    ///
    /// Provider-originated failures keep the provider's wording verbatim.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, SessionError::UserRejected(_))
    }
}

impl From<ProviderError> for SessionError {
    fn from(err: ProviderError) -> Self {
        if err.is_user_rejection() {
            SessionError::UserRejected(err.message)
        } else {
            SessionError::RequestFailed(err.message)
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::InvalidResponse(err.to_string())
    }
}

impl From<alloy_primitives::SignatureError> for SessionError {
    fn from(err: alloy_primitives::SignatureError) -> Self {
        SessionError::Signature(err.to_string())
    }
}

/// Convenience type alias for `Result<T, SessionError>`.
pub type Result<T> = std::result::Result<T, SessionError>;
