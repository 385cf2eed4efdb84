use thiserror::Error;

/// Errors raised before a batch starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no upload supplied")]
    Missing,
    #[error("upload is not valid UTF-8: {source}")]
    Undecodable {
        #[source]
        source: std::str::Utf8Error,
    },
    #[error("malformed list at line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },
}

impl InputError {
    pub(crate) fn csv(source: csv::Error) -> Self {
        let line = source.position().map(|p| p.line()).unwrap_or(0);
        Self::Csv { line, source }
    }
}
