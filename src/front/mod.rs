//! Load-balancing front: answers malformed and disposable addresses itself
//! and relays the rest to a verification worker.

mod error;

use std::time::Duration;

use futures::stream::{self, BoxStream, StreamExt};
use rand::seq::SliceRandom;

pub use error::FrontError;

use crate::candidate::Candidate;
use crate::disposable::DisposableFilter;
use crate::stream::SseDecoder;
use crate::transport::ProxyConfig;
use crate::validator::{SyntaxMode, validate_syntax};
use crate::verdict::{StatusCode, Verdict, VerdictEvent};

/// Time a worker gets to answer with its response headers.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Answer what needs no network call: bad syntax first, then disposable
/// domains. Local verdicts keep input order.
pub fn split_local(
    candidates: Vec<Candidate>,
    mode: SyntaxMode,
    filter: &DisposableFilter,
) -> (Vec<Verdict>, Vec<Candidate>) {
    let mut verdicts = Vec::new();
    let mut remaining = Vec::new();
    for candidate in candidates {
        if !validate_syntax(&candidate.address, mode).ok {
            verdicts.push(Verdict::new(&candidate, StatusCode::InvalidSyntax));
        } else if filter.is_disposable(&candidate.domain) {
            verdicts.push(Verdict::new(&candidate, StatusCode::InvalidDisposable));
        } else {
            remaining.push(candidate);
        }
    }
    (verdicts, remaining)
}

/// Re-encode candidates as the single-column body a worker accepts.
pub fn encode_batch(candidates: &[Candidate]) -> Result<String, FrontError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    for candidate in candidates {
        writer.write_record([candidate.address.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| FrontError::Encode(err.into_error().into()))?;
    // uniquement des &str en entrée, donc de l'UTF-8 en sortie
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Static list of worker base URLs.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: Vec<String>,
    client: reqwest::Client,
    response_timeout: Duration,
}

impl WorkerPool {
    pub fn new<I, S>(workers: I, client: reqwest::Client) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let workers = workers
            .into_iter()
            .map(|w| w.into().trim().trim_end_matches('/').to_string())
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            workers,
            client,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }

    /// Bounds the wait for response headers only; the event stream that
    /// follows may last as long as the batch.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    /// POST the batch to `/verify` on workers in random order until one
    /// accepts it.
    pub async fn dispatch(
        &self,
        body: String,
        proxy: Option<&ProxyConfig>,
    ) -> Result<reqwest::Response, FrontError> {
        if self.workers.is_empty() {
            return Err(FrontError::NoWorkers);
        }
        let mut order: Vec<&String> = self.workers.iter().collect();
        order.shuffle(&mut rand::thread_rng());
        let query = proxy.map(ProxyConfig::to_fields).unwrap_or_default();

        let mut last = None;
        for worker in order {
            match self.post(worker, body.clone(), &query).await {
                Ok(response) => {
                    tracing::info!(%worker, "batch dispatched");
                    return Ok(response);
                }
                Err(err) => {
                    tracing::warn!(%worker, error = %err, "worker failed, trying next");
                    last = Some(err);
                }
            }
        }
        // la liste n'est pas vide, `last` est donc renseigné
        let last = last.unwrap_or(FrontError::NoWorkers);
        Err(FrontError::AllFailed {
            attempts: self.workers.len(),
            last: Box::new(last),
        })
    }

    async fn post(
        &self,
        worker: &str,
        body: String,
        query: &crate::transport::ProxyFields,
    ) -> Result<reqwest::Response, FrontError> {
        let request = self
            .client
            .post(format!("{worker}/verify"))
            .query(query)
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(body)
            .send();
        let response = tokio::time::timeout(self.response_timeout, request)
            .await
            .map_err(|_| FrontError::Timeout {
                worker: worker.to_string(),
                timeout: self.response_timeout,
            })?
            .map_err(|err| FrontError::unreachable(worker, err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FrontError::Status {
                worker: worker.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Decode a worker's event stream. A transport error ends the stream.
pub fn relay(response: reqwest::Response) -> BoxStream<'static, VerdictEvent> {
    // sans la query : elle porte les identifiants du proxy
    let mut base = response.url().clone();
    base.set_query(None);
    let url = base.to_string();
    let chunks = Box::pin(response.bytes_stream());
    stream::unfold(
        (chunks, Some(SseDecoder::new()), url),
        |(mut chunks, mut decoder, url)| async move {
            let current = decoder.as_mut()?;
            match chunks.next().await {
                Some(Ok(bytes)) => {
                    let events = current.push(&bytes);
                    Some((stream::iter(events), (chunks, decoder, url)))
                }
                Some(Err(err)) => {
                    let err = err.without_url();
                    tracing::warn!(worker = %url, error = %err, "worker stream broke off");
                    None
                }
                None => {
                    let tail = decoder.take().and_then(SseDecoder::finish);
                    Some((stream::iter(tail.into_iter().collect::<Vec<_>>()), (chunks, None, url)))
                }
            }
        },
    )
    .flatten()
    .boxed()
}

/// Front tier: local split, worker dispatch, merged stream.
#[derive(Debug, Clone)]
pub struct Front {
    pool: WorkerPool,
    syntax: SyntaxMode,
    filter: DisposableFilter,
}

impl Front {
    pub fn new(pool: WorkerPool, syntax: SyntaxMode, filter: DisposableFilter) -> Self {
        Self {
            pool,
            syntax,
            filter,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Local verdicts first, then the worker's verdicts in its order.
    /// Fails before streaming anything if no worker takes the batch.
    pub async fn verify(
        &self,
        candidates: Vec<Candidate>,
        proxy: Option<&ProxyConfig>,
    ) -> Result<BoxStream<'static, VerdictEvent>, FrontError> {
        let (answered, remaining) = split_local(candidates, self.syntax, &self.filter);
        tracing::info!(
            local = answered.len(),
            forwarded = remaining.len(),
            "front batch split"
        );
        let local = stream::iter(answered.iter().map(Verdict::to_event).collect::<Vec<_>>());
        if remaining.is_empty() {
            return Ok(local.boxed());
        }
        let response = self.pool.dispatch(encode_batch(&remaining)?, proxy).await?;
        Ok(local.chain(relay(response)).boxed())
    }
}
