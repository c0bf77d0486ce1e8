//! # Signing Tests
//!
//! personal_sign over the keccak digest and local signer recovery.

mod common;

use alloy_primitives::keccak256;
use common::*;
use dapp_session::error::ProviderError;
use dapp_session::session::{recover_signer, verify_signature};
use dapp_session::{SessionConfig, SessionError};
use shared::Severity;

#[tokio::test]
async fn test_sign_then_verify() {
    // Arrange
    let h = connected(SessionConfig::default()).await;
    let signer = h.provider.accounts()[0].clone();

    // Act
    let signed = h.session.sign("hello").await.expect("Signing should succeed in test");

    // Assert
    assert!(verify_signature("hello", &signed.signature, &signer));
    assert!(h.session.verify("hello", &signed.signature, &signer));
    assert_eq!(
        recover_signer("hello", &signed.signature).unwrap(),
        h.provider.address(0)
    );
    assert_eq!(h.session.signing().signature(), Some(signed.signature.clone()));
    assert_eq!(h.notifier.titles(), vec!["Message signed", "Signature verified"]);
}

#[tokio::test]
async fn test_loading_while_signature_prompt_is_open() {
    // Arrange
    let h = connected(SessionConfig::default()).await;
    let prompt = h.provider.gate("personal_sign");

    // Act
    let (result, ()) = tokio::join!(h.session.sign("hello"), async {
        wait_until(|| h.provider.request_count("personal_sign") == 1).await;

        // Assert (mid-flight)
        assert!(h.session.signing().is_loading());
        assert!(h.session.snapshot().signing.is_loading);
        prompt.notify_one();
    });

    // Assert
    result.expect("Signing should succeed in test");
    assert!(!h.session.signing().is_loading());
}

#[tokio::test]
async fn test_wallet_signs_the_digest() {
    let h = connected(SessionConfig::default()).await;

    let signed = h.session.sign("hello").await.unwrap();

    // Same bytes the wallet would produce for personal_sign(keccak256("hello"))
    assert_eq!(signed.signature, h.provider.sign_digest_with(0, "hello"));
    assert_ne!(keccak256(b"hello"), keccak256(b"hello2"));
}

#[tokio::test]
async fn test_verify_rejects_other_message() {
    let h = connected(SessionConfig::default()).await;
    let signer = h.provider.accounts()[0].clone();
    let signed = h.session.sign("hello").await.unwrap();

    assert!(!h.session.verify("hello2", &signed.signature, &signer));
    assert_eq!(h.notifier.last().unwrap().severity, Severity::Error);
}

#[tokio::test]
async fn test_verify_rejects_other_signer() {
    let h = connected(SessionConfig::default()).await;
    let other = h.provider.accounts()[1].clone();
    let signed = h.session.sign("hello").await.unwrap();

    assert!(!verify_signature("hello", &signed.signature, &other));
}

#[tokio::test]
async fn test_verify_signature_from_other_account() {
    let h = connected(SessionConfig::default()).await;
    let signature = h.provider.sign_digest_with(1, "gm");

    assert!(verify_signature("gm", &signature, &h.provider.accounts()[1]));
    assert!(!verify_signature("gm", &signature, &h.provider.accounts()[0]));
}

#[tokio::test]
async fn test_verify_is_case_insensitive_on_address() {
    let h = connected(SessionConfig::default()).await;
    let signed = h.session.sign("hello").await.unwrap();
    let lower = h.provider.accounts()[0].to_lowercase();

    assert!(verify_signature("hello", &signed.signature, &lower));
}

#[tokio::test]
async fn test_verify_malformed_signature() {
    let h = connected(SessionConfig::default()).await;
    let signer = h.provider.accounts()[0].clone();

    assert!(!h.session.verify("hello", "0x1234", &signer));
    assert!(matches!(
        recover_signer("hello", "0x1234"),
        Err(SessionError::Signature(_))
    ));
    assert!(h.session.session().is_connected(), "verification never touches the session");
}

#[tokio::test]
async fn test_sign_input_clears_message_on_success() {
    // Arrange
    let h = connected(SessionConfig::default()).await;
    h.session.signing().set_message_input("sign me");

    // Act
    let signed = h.session.sign_input().await.expect("Signing should succeed in test");

    // Assert
    assert_eq!(h.session.signing().message_input(), "");
    assert!(!h.session.signing().is_loading());
    assert!(verify_signature("sign me", &signed.signature, &h.provider.accounts()[0]));
}

#[tokio::test]
async fn test_sign_rejected_keeps_input() {
    // Arrange
    let h = connected(SessionConfig::default()).await;
    h.provider.fail("personal_sign", ProviderError::user_rejected("User denied message signature"));
    h.session.signing().set_message_input("sign me");

    // Act
    let result = h.session.sign_input().await;

    // Assert
    assert!(matches!(result, Err(SessionError::UserRejected(_))));
    assert_eq!(h.session.signing().message_input(), "sign me");
    assert!(!h.session.signing().is_loading(), "loading is cleared on failure");
    assert_eq!(h.session.signing().signature(), None);

    let last = h.notifier.last().unwrap();
    assert_eq!(last.title, "Signing failed");
    assert_eq!(last.message, "User denied message signature");
}

#[tokio::test]
async fn test_sign_requires_connection() {
    let h = discovered(SessionConfig::default(), MockProvider::new(1)).await;

    assert_eq!(h.session.sign("hello").await, Err(SessionError::NotConnected));
    assert_eq!(h.provider.request_count("personal_sign"), 0);
}

#[tokio::test]
async fn test_passphrase_is_forwarded() {
    let config = SessionConfig {
        sign_passphrase: "Example password".to_string(),
        ..Default::default()
    };
    let h = connected(config).await;

    let signed = h.session.sign("hello").await.unwrap();

    assert_eq!(h.provider.last_passphrase(), Some("Example password".to_string()));
    assert!(verify_signature("hello", &signed.signature, &h.provider.accounts()[0]));
}
