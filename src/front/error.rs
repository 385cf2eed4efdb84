use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrontError {
    #[error("no worker configured")]
    NoWorkers,
    #[error("worker {worker} unreachable: {source}")]
    Unreachable {
        worker: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("worker {worker} sent no response within {timeout:?}")]
    Timeout { worker: String, timeout: Duration },
    #[error("worker {worker} answered HTTP {status}")]
    Status { worker: String, status: u16 },
    #[error("all {attempts} workers failed, last error: {last}")]
    AllFailed {
        attempts: usize,
        #[source]
        last: Box<FrontError>,
    },
    #[error("could not encode forwarded batch: {0}")]
    Encode(#[from] csv::Error),
}

impl FrontError {
    /// Keeps the worker base URL only: the request query carries the
    /// proxy credentials.
    pub(crate) fn unreachable(worker: &str, source: reqwest::Error) -> Self {
        Self::Unreachable {
            worker: worker.to_string(),
            source: source.without_url(),
        }
    }
}
