//! JavaScript facade
//!
//! The page owns rendering; it drives the session through [`WalletSession`]
//! and reads state back as a plain object from `snapshot()`. Async methods
//! return promises that reject with the user-facing error message.

use std::rc::Rc;
use std::sync::Once;

use serde::Serialize;
use shared::Notification;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::services::browser::{BrowserProvider, WindowProbe};
use crate::services::notify::{LogNotifier, Notifier};
use crate::session::orchestrator::WalletOrchestrator;

static LOGGER: Once = Once::new();

/// Forwards notifications to a page callback, falling back to the log
struct JsNotifier {
    callback: js_sys::Function,
}

impl Notifier for JsNotifier {
    fn notify(&self, notification: Notification) {
        let payload = match to_js(&notification) {
            Ok(payload) => payload,
            Err(_) => return LogNotifier.notify(notification),
        };
        if let Err(e) = self.callback.call1(&JsValue::NULL, &payload) {
            log::warn!("[NOTIFY] Notification callback threw: {e:?}");
            LogNotifier.notify(notification);
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()).into())
}

fn js_error(err: SessionError) -> JsValue {
    JsError::new(&err.user_message()).into()
}

#[wasm_bindgen]
pub struct WalletSession {
    inner: Rc<WalletOrchestrator<BrowserProvider>>,
}

#[wasm_bindgen]
impl WalletSession {
    /// `config` may be `undefined`; missing fields take their defaults.
    /// `on_notify` receives `{ severity, title, message }` objects.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, on_notify: Option<js_sys::Function>) -> Result<WalletSession, JsValue> {
        let config: SessionConfig = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
        };

        let level = config.log_level_filter();
        LOGGER.call_once(|| wasm_logger::init(wasm_logger::Config::new(level)));

        let notifier: Rc<dyn Notifier> = match on_notify {
            Some(callback) => Rc::new(JsNotifier { callback }),
            None => Rc::new(LogNotifier),
        };
        log::info!("[CONNECT] Wallet session created for contract {}", config.contract_address);

        Ok(Self {
            inner: Rc::new(WalletOrchestrator::new(config, notifier).map_err(js_error)?),
        })
    }

    /// Discover the provider, restore authorized accounts and start listening for events
    pub fn init(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let probe = WindowProbe::new(inner.config().discovery_timeout_ms);
            inner.get_provider(&probe).await;

            let events = Rc::clone(&inner);
            spawn_local(async move { events.run_event_loop().await });

            to_js(&inner.snapshot())
        })
    }

    pub fn connect(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            inner.connect().await.map_err(js_error)?;
            to_js(&inner.snapshot())
        })
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }

    #[wasm_bindgen(js_name = canConnect)]
    pub fn can_connect(&self) -> bool {
        self.inner.can_connect()
    }

    #[wasm_bindgen(js_name = setMessageInput)]
    pub fn set_message_input(&self, message: String) {
        self.inner.signing().set_message_input(message);
    }

    /// Sign `message`, or the message input when omitted
    pub fn sign(&self, message: Option<String>) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let result = match message {
                Some(message) => inner.sign(&message).await,
                None => inner.sign_input().await,
            };
            result
                .map(|signed| JsValue::from_str(&signed.signature))
                .map_err(js_error)
        })
    }

    pub fn verify(&self, message: &str, signature: &str, claimed_signer: &str) -> bool {
        self.inner.verify(message, signature, claimed_signer)
    }

    #[wasm_bindgen(js_name = setStoreInput)]
    pub fn set_store_input(&self, input: String) {
        self.inner.contract().set_store_input(input);
    }

    /// Store `value` (decimal string), or the store input when omitted.
    /// Resolves with the transaction hash.
    #[wasm_bindgen(js_name = storeValue)]
    pub fn store_value(&self, value: Option<String>) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let hash = match value {
                Some(raw) => inner.store_text(&raw).await,
                None => inner.store_input().await,
            };
            hash.map(|hash| JsValue::from_str(&hash.to_string()))
                .map_err(js_error)
        })
    }

    /// Resolves with the stored value as a decimal string
    #[wasm_bindgen(js_name = retrieveValue)]
    pub fn retrieve_value(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            inner
                .retrieve_value()
                .await
                .map(|value| JsValue::from_str(&value.to_string()))
                .map_err(js_error)
        })
    }

    #[wasm_bindgen(js_name = dismissError)]
    pub fn dismiss_error(&self) {
        self.inner.dismiss_error();
    }

    /// Remove provider listeners and stop the event loop
    pub fn teardown(&self) {
        self.inner.teardown();
    }
}
