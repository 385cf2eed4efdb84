use std::sync::Arc;

use async_trait::async_trait;

use super::{ProbeContext, Stage, StageOutcome};
use crate::candidate::Candidate;
use crate::disposable::DisposableFilter;
use crate::fallback::{ChainOutcome, FallbackChain};
use crate::mx::{LookupMx, resolve_mx};
use crate::smtp_verify::{SmtpOutcome, SmtpProber};
use crate::validator::{SyntaxMode, validate_syntax};
use crate::verdict::{Status, StatusCode};

pub struct SyntaxStage {
    mode: SyntaxMode,
}

impl SyntaxStage {
    pub fn new(mode: SyntaxMode) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl Stage for SyntaxStage {
    fn name(&self) -> &'static str {
        "syntax"
    }

    async fn run(&self, candidate: &Candidate, _ctx: &mut ProbeContext) -> StageOutcome {
        let report = validate_syntax(&candidate.address, self.mode);
        if report.ok {
            StageOutcome::Continue
        } else {
            tracing::debug!(address = %candidate.address, reasons = ?report.reasons, "syntax rejected");
            StageOutcome::terminal(StatusCode::InvalidSyntax)
        }
    }
}

pub struct DisposableStage {
    filter: DisposableFilter,
}

impl DisposableStage {
    pub fn new(filter: DisposableFilter) -> Self {
        Self { filter }
    }
}

#[async_trait]
impl Stage for DisposableStage {
    fn name(&self) -> &'static str {
        "disposable"
    }

    async fn run(&self, candidate: &Candidate, _ctx: &mut ProbeContext) -> StageOutcome {
        if self.filter.is_disposable(&candidate.domain) {
            StageOutcome::terminal(StatusCode::InvalidDisposable)
        } else {
            StageOutcome::Continue
        }
    }
}

/// MX lookup. Lookup errors count as "no domain", like an empty answer.
pub struct DomainStage {
    resolver: Arc<dyn LookupMx>,
}

impl DomainStage {
    pub fn new(resolver: Arc<dyn LookupMx>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Stage for DomainStage {
    fn name(&self) -> &'static str {
        "domain"
    }

    async fn run(&self, candidate: &Candidate, ctx: &mut ProbeContext) -> StageOutcome {
        match resolve_mx(self.resolver.as_ref(), &candidate.domain).await {
            Ok(status) if !status.hosts().is_empty() => {
                ctx.mx_hosts = status.into_hosts();
                StageOutcome::Continue
            }
            Ok(_) => {
                tracing::debug!(domain = %candidate.domain, "no MX records");
                StageOutcome::terminal(StatusCode::InvalidDomain)
            }
            Err(err) => {
                tracing::warn!(domain = %candidate.domain, error = %err, "MX lookup failed");
                StageOutcome::terminal(StatusCode::InvalidDomain)
            }
        }
    }
}

pub struct SmtpStage {
    prober: SmtpProber,
}

impl SmtpStage {
    pub fn new(prober: SmtpProber) -> Self {
        Self { prober }
    }
}

#[async_trait]
impl Stage for SmtpStage {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn run(&self, candidate: &Candidate, ctx: &mut ProbeContext) -> StageOutcome {
        let connector = ctx.connector.clone();
        let report = self
            .prober
            .probe(candidate, &ctx.mx_hosts, connector.as_ref())
            .await;
        ctx.smtp = Some(report.outcome);
        match report.outcome {
            SmtpOutcome::Valid => StageOutcome::terminal(StatusCode::Valid),
            SmtpOutcome::Invalid => StageOutcome::terminal(StatusCode::Invalid),
            SmtpOutcome::Unknown => StageOutcome::Continue,
        }
    }
}

pub struct FallbackStage {
    chain: FallbackChain,
}

impl FallbackStage {
    pub fn new(chain: FallbackChain) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl Stage for FallbackStage {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn run(&self, candidate: &Candidate, _ctx: &mut ProbeContext) -> StageOutcome {
        match self.chain.verify(&candidate.address).await {
            ChainOutcome::Conclusive {
                provider,
                deliverable,
            } => {
                let code = if deliverable {
                    StatusCode::Valid
                } else {
                    StatusCode::Invalid
                };
                StageOutcome::Terminal(Status::from_provider(code, provider))
            }
            ChainOutcome::Exhausted => StageOutcome::terminal(StatusCode::FallbackFailed),
        }
    }
}
