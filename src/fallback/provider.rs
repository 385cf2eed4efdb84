use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde_json::Value;

use super::{DeliverableSignal, FallbackError, ProviderResult};

/// A third-party deliverability service.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self, address: &str) -> Result<ProviderResult, FallbackError>;
}

/// Built-in provider presets, in chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Hunter,
    ZeroBounce,
    AbstractApi,
}

impl ProviderKind {
    pub const CHAIN_ORDER: [ProviderKind; 3] = [Self::Hunter, Self::ZeroBounce, Self::AbstractApi];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hunter => "Hunter",
            Self::ZeroBounce => "ZeroBounce",
            Self::AbstractApi => "AbstractApi",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Hunter => "https://api.hunter.io/v2/email-verifier",
            Self::ZeroBounce => "https://api.zerobounce.net/v2/validate",
            Self::AbstractApi => "https://emailvalidation.abstractapi.com/v1/",
        }
    }

    pub fn signal(self) -> DeliverableSignal {
        match self {
            Self::Hunter => DeliverableSignal {
                pointer: "/data/result",
                deliverable: &["deliverable"],
                undeliverable: &["undeliverable"],
            },
            Self::ZeroBounce => DeliverableSignal {
                pointer: "/status",
                deliverable: &["valid"],
                undeliverable: &["invalid"],
            },
            Self::AbstractApi => DeliverableSignal {
                pointer: "/deliverability",
                deliverable: &["DELIVERABLE"],
                undeliverable: &["UNDELIVERABLE"],
            },
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CHAIN_ORDER
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown provider '{s}'"))
    }
}

/// `GET endpoint?email=..&api_key=..`, answer read through a [`DeliverableSignal`].
#[derive(Clone)]
pub struct HttpProvider {
    kind: ProviderKind,
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(kind: ProviderKind, api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            kind,
            endpoint: kind.endpoint().to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Point the preset at another base URL (staging, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn check(&self, address: &str) -> Result<ProviderResult, FallbackError> {
        let provider = self.kind.name().to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("email", address), ("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FallbackError::http(&provider, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FallbackError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FallbackError::http(&provider, source))?;
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|source| FallbackError::Body { provider, source })?;
        Ok(self.kind.signal().read(&body))
    }
}
