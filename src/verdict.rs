//! Verdicts produced by the pipeline and their wire representation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;

/// Terminal classification of a candidate address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    InvalidSyntax,
    InvalidDisposable,
    InvalidDomain,
    Valid,
    Invalid,
    Unknown,
    FallbackFailed,
}

impl StatusCode {
    pub const ALL: [StatusCode; 7] = [
        Self::InvalidSyntax,
        Self::InvalidDisposable,
        Self::InvalidDomain,
        Self::Valid,
        Self::Invalid,
        Self::Unknown,
        Self::FallbackFailed,
    ];

    /// Human label used on the wire when no provider is attached.
    pub fn label(self) -> &'static str {
        match self {
            Self::InvalidSyntax => "Invalid Syntax",
            Self::InvalidDisposable => "Invalid (Disposable)",
            Self::InvalidDomain => "Invalid Domain",
            Self::Valid => "Valid",
            Self::Invalid => "Invalid",
            Self::Unknown => "Unknown",
            Self::FallbackFailed => "Fallback Failed",
        }
    }

    pub fn is_deliverable(self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status plus the fallback provider that produced it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: StatusCode,
    pub source: Option<String>,
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Self { code, source: None }
    }

    pub fn from_provider(code: StatusCode, provider: impl Into<String>) -> Self {
        Self {
            code,
            source: Some(provider.into()),
        }
    }
}

impl From<StatusCode> for Status {
    fn from(code: StatusCode) -> Self {
        Self::new(code)
    }
}

/// Exactly one per non-blank input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub address: String,
    pub status: StatusCode,
    pub source: Option<String>,
}

impl Verdict {
    pub fn new(candidate: &Candidate, status: impl Into<Status>) -> Self {
        let Status { code, source } = status.into();
        Self {
            address: candidate.address.clone(),
            status: code,
            source,
        }
    }

    /// Rendered status string, e.g. `Valid (Hunter)`.
    pub fn status_text(&self) -> String {
        match (&self.source, self.status) {
            (Some(provider), StatusCode::Valid | StatusCode::Invalid) => {
                format!("{} ({provider})", self.status.label())
            }
            _ => self.status.label().to_string(),
        }
    }

    pub fn to_event(&self) -> VerdictEvent {
        VerdictEvent {
            email: self.address.clone(),
            status: self.status_text(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.address, self.status_text())
    }
}

/// JSON payload of one streamed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictEvent {
    pub email: String,
    pub status: String,
}

impl From<&Verdict> for VerdictEvent {
    fn from(verdict: &Verdict) -> Self {
        verdict.to_event()
    }
}
