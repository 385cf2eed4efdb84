use std::time::Duration;

use async_trait::async_trait;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
};

use super::{MxError, MxHost, MxStatus};

/// Source of MX records. Implemented for the tokio resolver; tests plug in stubs.
#[async_trait]
pub trait LookupMx: Send + Sync {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxHost>, ResolveError>;
}

/// System resolver configuration with a per-query timeout. Falls back to the
/// library defaults when the system configuration cannot be read.
pub fn build_resolver(timeout: Duration) -> TokioAsyncResolver {
    let (config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf() {
        Ok(pair) => pair,
        Err(err) => {
            tracing::warn!(error = %err, "system resolver config unavailable, using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };
    opts.timeout = timeout;
    opts.attempts = 1;
    TokioAsyncResolver::tokio(config, opts)
}

/// Lookup MX records for `domain` with the given resolver.
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxStatus`] contains the deduplicated hosts sorted by ascending preference.
pub async fn resolve_mx<R>(resolver: &R, domain: &str) -> Result<MxStatus, MxError>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let mut hosts = resolver.lookup_mx(&ascii).await.map_err(|err| MxError::lookup(&ascii, err))?;

    hosts.retain(|h| !h.hostname.is_empty());
    hosts.sort();
    hosts.dedup();

    if hosts.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(hosts))
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, MxError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(MxError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(MxError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

#[async_trait]
impl LookupMx for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxHost>, ResolveError> {
        let lookup = match self.mx_lookup(domain).await {
            Ok(lookup) => lookup,
            Err(err) if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        Ok(lookup
            .iter()
            .map(|mx| MxHost::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}
