//! Batch runner: evaluates candidates with bounded concurrency and yields
//! verdicts in input order.

pub mod sse;

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use tokio::time::Instant;

use crate::candidate::Candidate;
use crate::pipeline::Pipeline;
use crate::transport::Connector;
use crate::verdict::{StatusCode, Verdict};

pub use sse::{SseDecoder, encode_event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Candidates evaluated at once; 1 is strictly sequential.
    pub concurrency: usize,
    /// Minimum gap between two consecutive events.
    pub pacing: Duration,
    /// Bound on one candidate's whole pipeline run.
    pub candidate_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            pacing: Duration::from_millis(250),
            candidate_timeout: Duration::from_secs(60),
        }
    }
}

/// Stream of one verdict per candidate, same order as `candidates`.
///
/// Dropping the stream drops the in-flight evaluations with it.
pub fn verdict_stream(
    pipeline: Arc<Pipeline>,
    candidates: Vec<Candidate>,
    connector: Arc<dyn Connector>,
    options: BatchOptions,
) -> BoxStream<'static, Verdict> {
    tracing::info!(
        candidates = candidates.len(),
        concurrency = options.concurrency,
        via = %connector.describe(),
        "batch started"
    );
    let timeout = options.candidate_timeout;
    let verdicts = stream::iter(candidates)
        .map(move |candidate| {
            let pipeline = pipeline.clone();
            let connector = connector.clone();
            async move { evaluate_bounded(&pipeline, candidate, connector, timeout).await }
        })
        .buffered(options.concurrency.max(1));
    paced(verdicts, options.pacing)
}

async fn evaluate_bounded(
    pipeline: &Pipeline,
    candidate: Candidate,
    connector: Arc<dyn Connector>,
    timeout: Duration,
) -> Verdict {
    match tokio::time::timeout(timeout, pipeline.evaluate(&candidate, connector)).await {
        Ok(verdict) => verdict,
        Err(_) => {
            tracing::warn!(
                address = %candidate.address,
                seconds = timeout.as_secs(),
                "candidate timed out"
            );
            Verdict::new(&candidate, StatusCode::Unknown)
        }
    }
}

/// Holds each event until `pacing` has elapsed since the previous one.
/// Time spent waiting on the inner stream counts toward the gap.
pub fn paced<S, T>(inner: S, pacing: Duration) -> BoxStream<'static, T>
where
    S: futures::Stream<Item = T> + Send + 'static,
    T: Send + 'static,
{
    if pacing.is_zero() {
        return inner.boxed();
    }
    let mut last: Option<Instant> = None;
    inner
        .then(move |item| {
            let now = Instant::now();
            let emit_at = last.map_or(now, |previous| (previous + pacing).max(now));
            last = Some(emit_at);
            async move {
                tokio::time::sleep_until(emit_at).await;
                item
            }
        })
        .boxed()
}
