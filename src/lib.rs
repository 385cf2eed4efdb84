#![forbid(unsafe_code)]
//! mailprobe : vérification de délivrabilité e-mail en flux
//! (syntaxe, jetables, MX, sonde SMTP, fournisseurs HTTP de repli).

pub mod candidate;
pub mod config;
pub mod disposable;
pub mod fallback;
pub mod front;
pub mod mx;
pub mod pipeline;
pub mod server;
pub mod smtp_verify;
pub mod stream;
pub mod transport;
pub mod validator;
pub mod verdict;

#[cfg(test)]
mod testutil;

pub use candidate::{Candidate, InputError, read_candidates};
pub use config::{FrontConfig, ProviderKeys, ServiceConfig};
pub use disposable::DisposableFilter;
pub use fallback::{ChainOutcome, FallbackChain, ProviderKind};
pub use front::{Front, FrontError, WorkerPool};
pub use mx::{LookupMx, MxError, MxHost, MxStatus, resolve_mx};
pub use pipeline::{Pipeline, PipelineBuilder, Stage, StageOutcome};
pub use smtp_verify::{SmtpOutcome, SmtpProbeOptions, SmtpProber};
pub use stream::{BatchOptions, verdict_stream};
pub use transport::{Connector, ProxyConfig, TransportError, test_proxy};
pub use validator::{SyntaxMode, validate_syntax};
pub use verdict::{StatusCode, Verdict, VerdictEvent};
