//! # Signing & Verification
//!
//! A message is signed in its canonical hash form: the keccak256 digest of
//! its UTF-8 bytes is handed to `personal_sign`, which the wallet wraps in the
//! EIP-191 personal-message prefix before signing. Verification repeats the
//! same two hashing steps locally and recovers the signer with secp256k1.
//!
//! Verification never touches the session; it only reports.

use std::rc::Rc;

use alloy_primitives::{keccak256, Address, Signature, B256};
use parking_lot::RwLock;
use shared::{Notification, SigningSnapshot};

use crate::error::Result;
use crate::services::notify::Notifier;
use crate::services::provider::{Eip1193Provider, ProviderExt};
use crate::state::flags::PendingFlag;

/// Canonical hash of a user message
pub fn message_digest(message: &str) -> B256 {
    keccak256(message.as_bytes())
}

/// Recover the address that produced `signature` over `message`
pub fn recover_signer(message: &str, signature: &str) -> Result<Address> {
    let signature: Signature = signature.trim().parse()?;
    let digest = message_digest(message);
    Ok(signature.recover_address_from_msg(digest)?)
}

/// Whether `signature` over `message` was made by `claimed_signer`.
///
/// Malformed signatures and addresses are simply invalid.
pub fn verify_signature(message: &str, signature: &str, claimed_signer: &str) -> bool {
    let Ok(claimed) = claimed_signer.trim().parse::<Address>() else {
        log::debug!("[SIGN] Claimed signer {claimed_signer:?} is not an address");
        return false;
    };
    match recover_signer(message, signature) {
        Ok(recovered) => recovered == claimed,
        Err(e) => {
            log::debug!("[SIGN] Recovery failed: {e}");
            false
        }
    }
}

/// One sign operation's input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningRequest {
    pub message: String,
    pub digest: B256,
}

impl SigningRequest {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let digest = message_digest(&message);
        Self { message, digest }
    }
}

/// A signature to check against the address that supposedly produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub message: String,
    pub signature: String,
    pub claimed_signer: String,
}

impl VerificationRequest {
    pub fn new(
        message: impl Into<String>,
        signature: impl Into<String>,
        claimed_signer: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            signature: signature.into(),
            claimed_signer: claimed_signer.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        verify_signature(&self.message, &self.signature, &self.claimed_signer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureResult {
    /// 0x-prefixed 65-byte signature as returned by the wallet
    pub signature: String,
}

#[derive(Debug, Default)]
struct SigningState {
    message_input: String,
    signature: Option<String>,
}

pub struct SigningFlow {
    notifier: Rc<dyn Notifier>,
    passphrase: String,
    loading: PendingFlag,
    state: RwLock<SigningState>,
}

impl SigningFlow {
    pub fn new(notifier: Rc<dyn Notifier>, passphrase: impl Into<String>) -> Self {
        Self {
            notifier,
            passphrase: passphrase.into(),
            loading: PendingFlag::new(),
            state: RwLock::new(SigningState::default()),
        }
    }

    pub fn set_message_input(&self, message: impl Into<String>) {
        self.state.write().message_input = message.into();
    }

    pub fn message_input(&self) -> String {
        self.state.read().message_input.clone()
    }

    /// Last signature produced, kept for display until the next one
    pub fn signature(&self) -> Option<String> {
        self.state.read().signature.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_pending()
    }

    pub fn snapshot(&self) -> SigningSnapshot {
        let state = self.state.read();
        SigningSnapshot {
            is_loading: self.loading.is_pending(),
            message_input: state.message_input.clone(),
            signature: state.signature.clone(),
        }
    }

    /// Ask the wallet to sign `message` as `signer`
    pub async fn sign<P>(&self, provider: &P, message: &str, signer: Address) -> Result<SignatureResult>
    where
        P: Eip1193Provider + ?Sized,
    {
        let _loading = self.loading.begin();
        let request = SigningRequest::new(message);
        log::info!("[SIGN] Requesting personal_sign from {signer} over {}", request.digest);

        match provider
            .personal_sign(request.digest.as_slice(), signer, &self.passphrase)
            .await
        {
            Ok(signature) => {
                {
                    let mut state = self.state.write();
                    state.signature = Some(signature.clone());
                    state.message_input.clear();
                }
                self.notifier
                    .notify(Notification::success("Message signed", signature.clone()));
                Ok(SignatureResult { signature })
            }
            Err(e) => {
                log::warn!("[SIGN] personal_sign failed: {e}");
                self.notifier
                    .notify(Notification::error("Signing failed", e.user_message()));
                Err(e)
            }
        }
    }

    /// Check `signature` against `claimed_signer` and notify the outcome
    pub fn verify(&self, message: &str, signature: &str, claimed_signer: &str) -> bool {
        self.verify_request(&VerificationRequest::new(message, signature, claimed_signer))
    }

    pub fn verify_request(&self, request: &VerificationRequest) -> bool {
        let valid = request.is_valid();
        let signer = &request.claimed_signer;
        if valid {
            log::info!("[SIGN] Signature verified for {signer}");
            self.notifier
                .notify(Notification::success("Signature verified", format!("Signed by {signer}")));
        } else {
            log::info!("[SIGN] Signature does not match {signer}");
            self.notifier.notify(Notification::error(
                "Verification failed",
                format!("Signature was not produced by {signer}"),
            ));
        }
        valid
    }
}
