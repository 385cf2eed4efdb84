use std::time::Duration;

/// Configuration knobs for [`SmtpProber`](super::SmtpProber).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub port: u16,
    pub helo_domain: String,
    pub mail_from: String,
    /// Bound on connect + whole dialogue, per host.
    pub timeout: Duration,
    /// `None` tries every MX host.
    pub max_hosts: Option<usize>,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: "localhost".to_string(),
            mail_from: "test@example.com".to_string(),
            timeout: Duration::from_secs(10),
            max_hosts: None,
        }
    }
}

impl SmtpProbeOptions {
    pub fn helo_name(&self) -> &str {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() { "localhost" } else { trimmed }
    }

    pub fn envelope(&self) -> String {
        if self.mail_from.trim().is_empty() {
            "MAIL FROM:<>".to_string()
        } else {
            format!("MAIL FROM:<{}>", self.mail_from.trim())
        }
    }

    pub(crate) fn host_limit(&self) -> usize {
        self.max_hosts.unwrap_or(usize::MAX).max(1)
    }
}
