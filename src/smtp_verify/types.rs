use std::fmt;

/// Classification of the RCPT outcome across all tried hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpOutcome {
    Valid,
    Invalid,
    /// No host gave a conclusive answer. Expected, not an error.
    Unknown,
}

impl SmtpOutcome {
    pub fn is_conclusive(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

impl fmt::Display for SmtpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid => f.write_str("Valid"),
            Self::Invalid => f.write_str("Invalid"),
            Self::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Codes that mean the mailbox will not accept mail.
pub const REJECT_CODES: [u16; 6] = [451, 452, 550, 551, 552, 553];

/// `250` → Valid, reject set → Invalid, anything else is inconclusive.
pub fn classify_rcpt(code: u16) -> Option<SmtpOutcome> {
    match code {
        250 => Some(SmtpOutcome::Valid),
        c if REJECT_CODES.contains(&c) => Some(SmtpOutcome::Invalid),
        _ => None,
    }
}

/// Final report produced by [`SmtpProber::probe`](super::SmtpProber::probe).
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpProbeReport {
    pub outcome: SmtpOutcome,
    pub hosts_tried: Vec<String>,
    pub transcript: Vec<String>,
}

impl SmtpProbeReport {
    pub fn new(outcome: SmtpOutcome, hosts_tried: Vec<String>, transcript: Vec<String>) -> Self {
        Self {
            outcome,
            hosts_tried,
            transcript,
        }
    }
}
