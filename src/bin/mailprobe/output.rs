use std::io::Write;

use anyhow::Result;
use mailprobe::stream::encode_event;
use mailprobe::{StatusCode, Verdict};

use crate::args::Format;

pub fn write_verdict(out: &mut impl Write, format: Format, verdict: &Verdict) -> Result<()> {
    match format {
        Format::Human => {
            let tag = match verdict.status {
                StatusCode::Valid => "[OK]     ",
                StatusCode::Unknown | StatusCode::FallbackFailed => "[UNKNOWN]",
                _ => "[INVALID]",
            };
            writeln!(out, "{tag} {} :: {}", verdict.address, verdict.status_text())?;
        }
        Format::Ndjson => {
            writeln!(out, "{}", serde_json::to_string(&verdict.to_event())?)?;
        }
        Format::Sse => write!(out, "{}", encode_event(&verdict.to_event()))?,
    }
    // une ligne à la fois : le lot peut durer longtemps
    out.flush()?;
    Ok(())
}

/// Tally printed on stderr after a `check` run.
#[derive(Debug, Default)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub unknown: usize,
}

impl Summary {
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict.status {
            StatusCode::Valid => self.valid += 1,
            StatusCode::Unknown | StatusCode::FallbackFailed => self.unknown += 1,
            _ => self.invalid += 1,
        }
    }

    pub fn all_valid(&self) -> bool {
        self.valid == self.total
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} checked: {} valid, {} invalid, {} unknown",
            self.total, self.valid, self.invalid, self.unknown
        )
    }
}
