//! Third-party verification fallback, consulted only when SMTP is inconclusive.
//!
//! Providers are queried one at a time in a fixed order. Any failure of a
//! provider (transport, status, body, timeout) is logged and treated as
//! inconclusive; the first conclusive answer wins.

mod error;
mod provider;
mod signal;

use std::sync::Arc;
use std::time::Duration;

pub use error::FallbackError;
pub use provider::{HttpProvider, Provider, ProviderKind};
pub use signal::{DeliverableSignal, ProviderResult};

/// Outcome of running the whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Conclusive { provider: String, deliverable: bool },
    Exhausted,
}

#[derive(Clone)]
pub struct FallbackChain {
    providers: Vec<Arc<dyn Provider>>,
    timeout: Duration,
}

impl FallbackChain {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        Self {
            providers,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Presets in [`ProviderKind::CHAIN_ORDER`] for which a key is present.
    pub fn from_keys<F>(client: reqwest::Client, mut key_for: F) -> Self
    where
        F: FnMut(ProviderKind) -> Option<String>,
    {
        let providers = ProviderKind::CHAIN_ORDER
            .into_iter()
            .filter_map(|kind| {
                let key = key_for(kind).filter(|k| !k.trim().is_empty());
                if key.is_none() {
                    tracing::debug!(provider = %kind, "no API key configured, provider skipped");
                }
                key.map(|k| Arc::new(HttpProvider::new(kind, k, client.clone())) as Arc<dyn Provider>)
            })
            .collect();
        Self::new(providers)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub async fn verify(&self, address: &str) -> ChainOutcome {
        for provider in &self.providers {
            let name = provider.name();
            let result = match tokio::time::timeout(self.timeout, provider.check(address)).await {
                Ok(result) => result,
                Err(_) => Err(FallbackError::Timeout {
                    provider: name.to_string(),
                }),
            };
            match result {
                Ok(ProviderResult {
                    conclusive: true,
                    deliverable: Some(deliverable),
                }) => {
                    tracing::debug!(%address, provider = name, deliverable, "fallback conclusive");
                    return ChainOutcome::Conclusive {
                        provider: name.to_string(),
                        deliverable,
                    };
                }
                Ok(_) => tracing::debug!(%address, provider = name, "fallback inconclusive"),
                Err(err) => tracing::warn!(%address, error = %err, "fallback provider failed"),
            }
        }
        ChainOutcome::Exhausted
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}
