//! # Provider Event Subscriptions
//!
//! Provider events arrive as synchronous callbacks, but reacting to them
//! (a balance fetch) is async. Listeners therefore only forward each
//! [`ProviderEvent`] into a channel; the orchestrator drains it.
//!
//! [`Subscription`] is the scoped handle for the two registered listeners.
//! Dropping it removes them from the provider, so teardown never leaks a
//! listener. [`EventSubscriptionManager`] holds at most one subscription,
//! which makes `subscribe` idempotent.

use std::rc::Rc;

use async_channel::{Receiver, Sender};
use parking_lot::Mutex;

use crate::services::provider::{Eip1193Provider, ListenerId, ProviderEvent, ProviderEventKind};

/// Registered `accountsChanged` / `chainChanged` listeners on one provider
pub struct Subscription<P: Eip1193Provider> {
    provider: Rc<P>,
    listeners: Vec<(ProviderEventKind, ListenerId)>,
}

impl<P: Eip1193Provider> Subscription<P> {
    fn register(provider: Rc<P>, sender: &Sender<ProviderEvent>) -> Self {
        let listeners = [ProviderEventKind::AccountsChanged, ProviderEventKind::ChainChanged]
            .into_iter()
            .map(|kind| {
                let sender = sender.clone();
                let id = provider.on(
                    kind,
                    Box::new(move |event| {
                        log::debug!("[EVENTS] {} received", event.kind().name());
                        if sender.try_send(event).is_err() {
                            log::debug!("[EVENTS] Session dropped, event discarded");
                        }
                    }),
                );
                (kind, id)
            })
            .collect();

        Self { provider, listeners }
    }
}

impl<P: Eip1193Provider> Drop for Subscription<P> {
    fn drop(&mut self) {
        for (kind, id) in self.listeners.drain(..) {
            self.provider.remove_listener(kind, id);
        }
        log::debug!("[EVENTS] Provider listeners removed");
    }
}

/// Owns the session's single provider subscription and its event queue
pub struct EventSubscriptionManager<P: Eip1193Provider> {
    active: Mutex<Option<Subscription<P>>>,
    sender: Sender<ProviderEvent>,
    receiver: Receiver<ProviderEvent>,
}

impl<P: Eip1193Provider> EventSubscriptionManager<P> {
    pub fn new() -> Self {
        let (sender, receiver) = async_channel::unbounded();
        Self {
            active: Mutex::new(None),
            sender,
            receiver,
        }
    }

    /// Register listeners on `provider`.
    ///
    /// Returns `false` without registering anything if already subscribed.
    pub fn subscribe(&self, provider: Rc<P>) -> bool {
        let mut active = self.active.lock();
        if active.is_some() {
            log::debug!("[EVENTS] Already subscribed");
            return false;
        }
        *active = Some(Subscription::register(provider, &self.sender));
        log::info!("[EVENTS] Subscribed to accountsChanged and chainChanged");
        true
    }

    /// Release the subscription, removing both listeners
    pub fn unsubscribe(&self) -> bool {
        self.active.lock().take().is_some()
    }

    pub fn is_subscribed(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Queue of events forwarded by the listeners
    pub fn events(&self) -> &Receiver<ProviderEvent> {
        &self.receiver
    }
}

impl<P: Eip1193Provider> Default for EventSubscriptionManager<P> {
    fn default() -> Self {
        Self::new()
    }
}
