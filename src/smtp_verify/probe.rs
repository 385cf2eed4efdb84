use std::time::Duration;

use tokio::time::Instant;

use crate::candidate::Candidate;
use crate::mx::MxHost;
use crate::smtp_verify::error::SmtpProbeError;
use crate::smtp_verify::options::SmtpProbeOptions;
use crate::smtp_verify::session::SmtpSession;
use crate::smtp_verify::types::{SmtpOutcome, SmtpProbeReport, classify_rcpt};
use crate::transport::Connector;

/// Runs the RCPT handshake against ranked MX hosts.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: SmtpProbeOptions,
}

impl SmtpProber {
    pub fn new(options: SmtpProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SmtpProbeOptions {
        &self.options
    }

    /// Try hosts in ascending preference; stop at the first conclusive code.
    pub async fn probe(
        &self,
        candidate: &Candidate,
        hosts: &[MxHost],
        connector: &dyn Connector,
    ) -> SmtpProbeReport {
        let mut ordered: Vec<&MxHost> = hosts.iter().collect();
        ordered.sort_by_key(|h| h.preference);

        let mut hosts_tried = Vec::new();
        let mut transcript = Vec::new();

        for host in ordered.into_iter().take(self.options.host_limit()) {
            hosts_tried.push(host.hostname.clone());
            let attempt =
                probe_host(&host.hostname, &candidate.address, &self.options, connector).await;

            match attempt {
                Ok(host_report) => {
                    transcript.extend(host_report.transcript);
                    match host_report.rcpt_code.and_then(classify_rcpt) {
                        Some(outcome) => {
                            tracing::debug!(
                                address = %candidate.address,
                                host = %host.hostname,
                                %outcome,
                                "SMTP probe conclusive"
                            );
                            return SmtpProbeReport::new(outcome, hosts_tried, transcript);
                        }
                        None => tracing::debug!(
                            address = %candidate.address,
                            host = %host.hostname,
                            code = ?host_report.rcpt_code,
                            "SMTP reply inconclusive, trying next host"
                        ),
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        address = %candidate.address,
                        host = %host.hostname,
                        error = %err,
                        "SMTP probe failed, trying next host"
                    );
                    transcript.push(format!("[{}] ! error: {err}", host.hostname));
                }
            }
        }

        SmtpProbeReport::new(SmtpOutcome::Unknown, hosts_tried, transcript)
    }
}

fn timeout_error(host: &str, timeout: Duration) -> SmtpProbeError {
    SmtpProbeError::Timeout {
        host: host.to_string(),
        seconds: timeout.as_secs(),
    }
}

/// Upper bound on the closing QUIT exchange, separate from the handshake.
const QUIT_TIMEOUT: Duration = Duration::from_secs(2);

struct HostReport {
    /// `None` when the dialogue stopped before RCPT.
    rcpt_code: Option<u16>,
    transcript: Vec<String>,
}

async fn probe_host(
    host: &str,
    address: &str,
    options: &SmtpProbeOptions,
    connector: &dyn Connector,
) -> Result<HostReport, SmtpProbeError> {
    let deadline = Instant::now() + options.timeout;
    let stream = tokio::time::timeout_at(deadline, connector.connect(host, options.port))
        .await
        .map_err(|_| timeout_error(host, options.timeout))??;
    let mut session = SmtpSession::new(host, stream);

    // le code RCPT est acquis avant QUIT : un QUIT bloqué ne doit pas le perdre
    let rcpt_code = tokio::time::timeout_at(deadline, dialogue(&mut session, address, options))
        .await
        .map_err(|_| timeout_error(host, options.timeout))??;
    Ok(finish(session, rcpt_code, options.timeout.min(QUIT_TIMEOUT)).await)
}

/// Greeting through RCPT. `None` when the dialogue stopped before RCPT.
async fn dialogue(
    session: &mut SmtpSession,
    address: &str,
    options: &SmtpProbeOptions,
) -> Result<Option<u16>, SmtpProbeError> {
    let banner = session.read_banner().await?;
    if !banner.is_positive_completion() {
        return Ok(None);
    }

    let helo = options.helo_name();
    let ehlo = session.send_command(&format!("EHLO {helo}")).await?;
    if !ehlo.is_positive_completion() {
        let fallback = session.send_command(&format!("HELO {helo}")).await?;
        if !fallback.is_positive_completion() {
            return Ok(None);
        }
    }

    let mail_reply = session.send_command(&options.envelope()).await?;
    if !mail_reply.is_positive_completion() {
        return Ok(None);
    }

    let rcpt = session.send_command(&format!("RCPT TO:<{address}>")).await?;
    if rcpt.is_transient_failure() {
        session.record("!", "temporary failure (greylisting or policy)");
    }
    Ok(Some(rcpt.code))
}

async fn finish(
    mut session: SmtpSession,
    rcpt_code: Option<u16>,
    quit_timeout: Duration,
) -> HostReport {
    if tokio::time::timeout(quit_timeout, session.quit()).await.is_err() {
        session.record("!", "no reply to QUIT");
    }
    for line in &session.transcript {
        tracing::trace!("{line}");
    }
    HostReport {
        rcpt_code,
        transcript: std::mem::take(&mut session.transcript),
    }
}
