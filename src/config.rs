//! Runtime configuration for the worker and front services.
//!
//! Values are injected by the caller (the binary reads flags and
//! `MAILPROBE_*` environment variables); nothing here reads the environment.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::disposable::DisposableFilter;
use crate::front::DEFAULT_RESPONSE_TIMEOUT;
use crate::fallback::{FallbackChain, ProviderKind};
use crate::mx::{LookupMx, build_resolver};
use crate::pipeline::Pipeline;
use crate::smtp_verify::{SmtpProbeOptions, SmtpProber};
use crate::stream::BatchOptions;
use crate::transport::ProxyConfig;
use crate::validator::SyntaxMode;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// DNS resolver timeout.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(5);

/// API keys for the fallback providers. Missing keys drop the provider.
#[derive(Clone, Default)]
pub struct ProviderKeys {
    pub hunter: Option<String>,
    pub zerobounce: Option<String>,
    pub abstract_api: Option<String>,
}

impl ProviderKeys {
    pub fn key_for(&self, kind: ProviderKind) -> Option<String> {
        match kind {
            ProviderKind::Hunter => self.hunter.clone(),
            ProviderKind::ZeroBounce => self.zerobounce.clone(),
            ProviderKind::AbstractApi => self.abstract_api.clone(),
        }
    }

    pub fn chain(&self, client: reqwest::Client) -> FallbackChain {
        FallbackChain::from_keys(client, |kind| self.key_for(kind))
    }
}

impl fmt::Debug for ProviderKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mask = |k: &Option<String>| k.as_ref().map(|_| "***");
        f.debug_struct("ProviderKeys")
            .field("hunter", &mask(&self.hunter))
            .field("zerobounce", &mask(&self.zerobounce))
            .field("abstract_api", &mask(&self.abstract_api))
            .finish()
    }
}

/// Verification worker settings.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    pub syntax: SyntaxMode,
    /// Run the disposable check in the worker too.
    pub filter_disposable: bool,
    pub disposable_extra: Vec<String>,
    pub smtp: SmtpProbeOptions,
    pub batch: BatchOptions,
    pub providers: ProviderKeys,
    /// Used when a request carries no proxy fields.
    pub default_proxy: Option<ProxyConfig>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            syntax: SyntaxMode::default(),
            filter_disposable: false,
            disposable_extra: Vec::new(),
            smtp: SmtpProbeOptions::default(),
            batch: BatchOptions::default(),
            providers: ProviderKeys::default(),
            default_proxy: None,
        }
    }
}

impl ServiceConfig {
    pub fn disposable_filter(&self) -> DisposableFilter {
        DisposableFilter::builtin().with_extra(&self.disposable_extra)
    }

    /// Standard stage order with the given resolver and HTTP client.
    pub fn pipeline_with(&self, resolver: Arc<dyn LookupMx>, client: reqwest::Client) -> Pipeline {
        let mut builder = Pipeline::builder().syntax(self.syntax);
        if self.filter_disposable {
            builder = builder.disposable(self.disposable_filter());
        }
        builder
            .resolver(resolver)
            .smtp(SmtpProber::new(self.smtp.clone()))
            .fallback(self.providers.chain(client))
            .build()
    }

    /// Pipeline backed by the system resolver.
    pub fn pipeline(&self, client: reqwest::Client) -> Pipeline {
        self.pipeline_with(Arc::new(build_resolver(DNS_TIMEOUT)), client)
    }
}

/// Load-balancing front settings.
#[derive(Debug, Clone)]
pub struct FrontConfig {
    pub bind: String,
    /// Worker base URLs, e.g. `http://10.0.0.5:8000`.
    pub workers: Vec<String>,
    /// Malformed addresses are answered by the front, never forwarded.
    pub syntax: SyntaxMode,
    pub disposable_extra: Vec<String>,
    /// Wait for a worker's response headers before failing over.
    pub worker_timeout: Duration,
    pub default_proxy: Option<ProxyConfig>,
}

impl Default for FrontConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            workers: Vec::new(),
            syntax: SyntaxMode::default(),
            disposable_extra: Vec::new(),
            worker_timeout: DEFAULT_RESPONSE_TIMEOUT,
            default_proxy: None,
        }
    }
}

impl FrontConfig {
    pub fn disposable_filter(&self) -> DisposableFilter {
        DisposableFilter::builtin().with_extra(&self.disposable_extra)
    }
}

/// Split a comma separated list, dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mx::MxHost;
    use crate::mx::tests::StubResolver;

    #[test]
    fn list_splitting_ignores_blanks() {
        assert_eq!(split_list(" a.com, ,b.com,"), ["a.com", "b.com"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn keys_are_masked_in_debug() {
        let keys = ProviderKeys {
            hunter: Some("secret-hunter".into()),
            ..ProviderKeys::default()
        };
        let dbg = format!("{keys:?}");
        assert!(!dbg.contains("secret-hunter"));
        assert!(dbg.contains("***"));
    }

    #[test]
    fn keys_select_providers_in_chain_order() {
        let keys = ProviderKeys {
            hunter: None,
            zerobounce: Some("z".into()),
            abstract_api: Some("a".into()),
        };
        let chain = keys.chain(reqwest::Client::new());
        assert_eq!(chain.provider_names(), ["ZeroBounce", "AbstractApi"]);
    }

    #[test]
    fn worker_pipeline_honours_disposable_flag() {
        let resolver = || Arc::new(StubResolver::fixed(vec![MxHost::new(1, "mx")])) as Arc<dyn LookupMx>;
        let mut config = ServiceConfig::default();
        let names = config.pipeline_with(resolver(), reqwest::Client::new()).stage_names();
        assert_eq!(names, ["syntax", "domain", "smtp"]);

        config.filter_disposable = true;
        config.providers.hunter = Some("k".into());
        let names = config.pipeline_with(resolver(), reqwest::Client::new()).stage_names();
        assert_eq!(names, ["syntax", "disposable", "domain", "smtp", "fallback"]);
    }
}
