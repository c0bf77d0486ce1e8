//! `window.ethereum` binding
//!
//! [`BrowserProvider`] adapts the injected EIP-1193 object to
//! [`Eip1193Provider`]. Requests go through `request({ method, params })` and
//! the returned promise; rejections are read back as `{ code, message }`.
//! Listener closures are owned here so `removeListener` can be handed the
//! exact same function object.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::ProviderError;
use crate::services::discovery::ProviderProbe;
use crate::services::provider::{
    parse_accounts, Eip1193Provider, EventListener, ListenerId, ProviderEvent, ProviderEventKind,
};

#[wasm_bindgen]
extern "C" {
    /// The injected provider object
    #[derive(Debug, Clone)]
    pub type EthereumProvider;

    #[wasm_bindgen(method, catch)]
    fn request(this: &EthereumProvider, args: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn on(this: &EthereumProvider, event: &str, listener: &js_sys::Function) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeListener)]
    fn remove_listener(
        this: &EthereumProvider,
        event: &str,
        listener: &js_sys::Function,
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method, getter, js_name = isMetaMask)]
    fn is_metamask(this: &EthereumProvider) -> Option<bool>;
}

type JsListener = Closure<dyn Fn(JsValue)>;

pub struct BrowserProvider {
    inner: EthereumProvider,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, JsListener>>,
}

impl BrowserProvider {
    pub fn new(inner: EthereumProvider) -> Self {
        Self {
            inner,
            next_id: Cell::new(0),
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// `window.ethereum`, if something has been injected
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let ethereum = js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()?;
        if ethereum.is_null() || ethereum.is_undefined() {
            return None;
        }
        Some(Self::new(ethereum.unchecked_into()))
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for BrowserProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let args = json!({ "method": method, "params": params })
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| ProviderError::internal(format!("failed to encode {method} request: {e}")))?;

        let promise = self.inner.request(&args).map_err(provider_error)?;
        let result = JsFuture::from(promise).await.map_err(provider_error)?;

        if result.is_undefined() {
            return Ok(Value::Null);
        }
        serde_wasm_bindgen::from_value(result)
            .map_err(|e| ProviderError::internal(format!("failed to decode {method} response: {e}")))
    }

    fn on(&self, kind: ProviderEventKind, listener: EventListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let callback = Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| {
            match decode_event(kind, value) {
                Some(event) => listener(event),
                None => log::warn!("[EVENTS] Ignoring malformed {} payload", kind.name()),
            }
        });
        if let Err(e) = self.inner.on(kind.name(), callback.as_ref().unchecked_ref()) {
            log::error!("[EVENTS] Failed to register {} listener: {e:?}", kind.name());
        }
        self.listeners.borrow_mut().insert(id, callback);
        id
    }

    fn remove_listener(&self, kind: ProviderEventKind, id: ListenerId) {
        let Some(callback) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = self
            .inner
            .remove_listener(kind.name(), callback.as_ref().unchecked_ref())
        {
            log::warn!("[EVENTS] Failed to remove {} listener: {e:?}", kind.name());
        }
    }

    fn is_metamask(&self) -> bool {
        self.inner.is_metamask().unwrap_or(false)
    }
}

fn decode_event(kind: ProviderEventKind, value: JsValue) -> Option<ProviderEvent> {
    match kind {
        ProviderEventKind::AccountsChanged => {
            let raw: Value = serde_wasm_bindgen::from_value(value).ok()?;
            parse_accounts(raw).ok().map(ProviderEvent::AccountsChanged)
        }
        ProviderEventKind::ChainChanged => value.as_string().map(ProviderEvent::ChainChanged),
    }
}

/// Read `{ code, message }` off a rejection value
fn provider_error(value: JsValue) -> ProviderError {
    let code = js_sys::Reflect::get(&value, &JsValue::from_str("code"))
        .ok()
        .and_then(|code| code.as_f64())
        .map(|code| code as i64);
    let message = js_sys::Reflect::get(&value, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string());

    match (code, message) {
        (Some(code), Some(message)) => ProviderError::new(code, message),
        (None, Some(message)) => ProviderError::internal(message),
        (code, None) => ProviderError::new(
            code.unwrap_or(-32603),
            value.as_string().unwrap_or_else(|| format!("{value:?}")),
        ),
    }
}

/// Looks for `window.ethereum`, giving late injection one grace period
#[derive(Debug, Clone, Copy)]
pub struct WindowProbe {
    pub timeout_ms: u32,
}

impl WindowProbe {
    pub fn new(timeout_ms: u32) -> Self {
        Self { timeout_ms }
    }
}

#[async_trait(?Send)]
impl ProviderProbe for WindowProbe {
    type Provider = BrowserProvider;

    async fn probe(&self, silent: bool) -> Option<Rc<BrowserProvider>> {
        if let Some(provider) = BrowserProvider::from_window() {
            return Some(Rc::new(provider));
        }
        if !silent {
            log::info!("[DISCOVERY] window.ethereum not injected yet, waiting {}ms", self.timeout_ms);
        }
        gloo_timers::future::TimeoutFuture::new(self.timeout_ms).await;
        BrowserProvider::from_window().map(Rc::new)
    }
}
