//! SMTP recipient-existence probing.
//!
//! [`SmtpProber::probe`] executes a minimal SMTP dialogue (greeting, EHLO,
//! MAIL FROM, RCPT TO, QUIT) against ranked MX hosts through a caller-supplied
//! [`Connector`](crate::transport::Connector) and classifies the RCPT reply.
//! No message is ever sent.

mod error;
mod options;
mod probe;
mod session;
mod types;

pub use error::SmtpProbeError;
pub use options::SmtpProbeOptions;
pub use probe::SmtpProber;
pub use session::SmtpReply;
pub use types::{REJECT_CODES, SmtpOutcome, SmtpProbeReport, classify_rcpt};
