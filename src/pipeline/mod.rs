//! Verification pipeline: an ordered list of stages, each of which either
//! settles the candidate or hands it on.
//!
//! The standard order is syntax, disposable (optional), domain, SMTP and
//! fallback. [`PipelineBuilder`] assembles it; [`Pipeline::new`] accepts any
//! order, which tests use to isolate a stage.

mod stages;

use std::sync::Arc;

use async_trait::async_trait;

pub use stages::{DisposableStage, DomainStage, FallbackStage, SmtpStage, SyntaxStage};

use crate::candidate::Candidate;
use crate::disposable::DisposableFilter;
use crate::fallback::FallbackChain;
use crate::mx::{LookupMx, MxHost};
use crate::smtp_verify::{SmtpOutcome, SmtpProber};
use crate::transport::Connector;
use crate::validator::SyntaxMode;
use crate::verdict::{Status, StatusCode, Verdict};

/// Result of running one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    Terminal(Status),
}

impl StageOutcome {
    pub fn terminal(code: StatusCode) -> Self {
        Self::Terminal(Status::new(code))
    }
}

/// State carried between stages for one candidate.
pub struct ProbeContext {
    /// Request-scoped connection factory (direct or SOCKS5).
    pub connector: Arc<dyn Connector>,
    /// Filled by the domain stage, in ascending preference.
    pub mx_hosts: Vec<MxHost>,
    pub smtp: Option<SmtpOutcome>,
}

impl ProbeContext {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            mx_hosts: Vec::new(),
            smtp: None,
        }
    }
}

#[async_trait]
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, candidate: &Candidate, ctx: &mut ProbeContext) -> StageOutcome;
}

#[derive(Clone)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Arc<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs stages in order until one is terminal. A candidate that passes
    /// every stage ends up `Unknown`.
    pub async fn evaluate(&self, candidate: &Candidate, connector: Arc<dyn Connector>) -> Verdict {
        let mut ctx = ProbeContext::new(connector);
        for stage in &self.stages {
            if let StageOutcome::Terminal(status) = stage.run(candidate, &mut ctx).await {
                tracing::debug!(
                    address = %candidate.address,
                    stage = stage.name(),
                    status = %status.code,
                    "terminal verdict"
                );
                return Verdict::new(candidate, status);
            }
        }
        Verdict::new(candidate, StatusCode::Unknown)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Assembles the standard stage order. Stages left unset are skipped.
#[derive(Default)]
pub struct PipelineBuilder {
    syntax: Option<SyntaxMode>,
    disposable: Option<DisposableFilter>,
    resolver: Option<Arc<dyn LookupMx>>,
    smtp: Option<SmtpProber>,
    fallback: Option<FallbackChain>,
}

impl PipelineBuilder {
    pub fn syntax(mut self, mode: SyntaxMode) -> Self {
        self.syntax = Some(mode);
        self
    }

    pub fn disposable(mut self, filter: DisposableFilter) -> Self {
        self.disposable = Some(filter);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn LookupMx>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn smtp(mut self, prober: SmtpProber) -> Self {
        self.smtp = Some(prober);
        self
    }

    /// An empty chain is left out, so an inconclusive SMTP probe stays `Unknown`.
    pub fn fallback(mut self, chain: FallbackChain) -> Self {
        self.fallback = (!chain.is_empty()).then_some(chain);
        self
    }

    pub fn build(self) -> Pipeline {
        let mut stages: Vec<Arc<dyn Stage>> = Vec::new();
        if let Some(mode) = self.syntax {
            stages.push(Arc::new(SyntaxStage::new(mode)));
        }
        if let Some(filter) = self.disposable {
            stages.push(Arc::new(DisposableStage::new(filter)));
        }
        if let Some(resolver) = self.resolver {
            stages.push(Arc::new(DomainStage::new(resolver)));
        }
        if let Some(prober) = self.smtp {
            stages.push(Arc::new(SmtpStage::new(prober)));
        }
        if let Some(chain) = self.fallback {
            stages.push(Arc::new(FallbackStage::new(chain)));
        }
        Pipeline::new(stages)
    }
}
