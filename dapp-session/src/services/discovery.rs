//! Provider discovery
//!
//! Probes for an injected provider without prompting the user. Absence is a
//! normal outcome, never an error.

use std::rc::Rc;

use async_trait::async_trait;
use shared::Availability;

use crate::services::provider::Eip1193Provider;

/// Something that can look for an injected provider
#[async_trait(?Send)]
pub trait ProviderProbe {
    type Provider: Eip1193Provider;

    /// Look for a provider; `silent` suppresses user-visible console noise
    async fn probe(&self, silent: bool) -> Option<Rc<Self::Provider>>;
}

/// Result of a discovery run
pub struct Discovery<P> {
    provider: Option<Rc<P>>,
}

impl<P> Discovery<P> {
    pub fn availability(&self) -> Availability {
        if self.provider.is_some() {
            Availability::Present
        } else {
            Availability::Absent
        }
    }

    pub fn provider(&self) -> Option<&Rc<P>> {
        self.provider.as_ref()
    }

    pub fn into_provider(self) -> Option<Rc<P>> {
        self.provider
    }
}

/// Run `probe` once and classify the outcome
pub async fn discover<D: ProviderProbe>(probe: &D, silent: bool) -> Discovery<D::Provider> {
    let provider = probe.probe(silent).await;
    match provider {
        Some(_) => log::info!("[DISCOVERY] Injected provider found"),
        None if silent => log::debug!("[DISCOVERY] No injected provider"),
        None => log::warn!("[DISCOVERY] Unable to detect window.ethereum"),
    }
    Discovery { provider }
}
