use std::io;

use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::smtp_verify::error::SmtpProbeError;
use crate::transport::BoxedStream;

#[derive(Debug, Clone)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }
}

pub struct SmtpSession {
    host: String,
    stream: BoxedStream,
    buffer: Vec<u8>,
    pub transcript: Vec<String>,
}

impl SmtpSession {
    pub fn new(host: &str, stream: BoxedStream) -> Self {
        Self {
            host: host.to_string(),
            stream,
            buffer: Vec::new(),
            transcript: Vec::new(),
        }
    }

    pub fn record(&mut self, direction: &str, message: &str) {
        self.transcript
            .push(format!("[{}] {direction}: {message}", self.host));
    }

    pub async fn read_banner(&mut self) -> Result<SmtpReply, SmtpProbeError> {
        let reply = self.read_reply().await?;
        self.record_reply(&reply);
        Ok(reply)
    }

    pub async fn send_command(&mut self, command: &str) -> Result<SmtpReply, SmtpProbeError> {
        self.record("C", command);
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.stream
            .write_all(&data)
            .await
            .map_err(SmtpProbeError::io)?;
        self.stream.flush().await.map_err(SmtpProbeError::io)?;
        let reply = self.read_reply().await?;
        self.record_reply(&reply);
        Ok(reply)
    }

    /// Best effort: the verdict is already decided when this runs.
    pub async fn quit(&mut self) {
        if let Err(err) = self.send_command("QUIT").await {
            self.record("!", &format!("QUIT failed: {err}"));
        }
        let _ = self.stream.shutdown().await;
    }

    async fn read_reply(&mut self) -> Result<SmtpReply, SmtpProbeError> {
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let line = self.read_line().await?;
            if line.len() < 3 {
                return Err(SmtpProbeError::protocol(format!("invalid reply: {line}")));
            }
            let parsed_code = line
                .get(..3)
                .and_then(|c| c.parse::<u16>().ok())
                .ok_or_else(|| SmtpProbeError::protocol(format!("invalid code in line: {line}")))?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(SmtpProbeError::protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let is_last = line.as_bytes().get(3) != Some(&b'-');
            lines.push(line.get(4..).unwrap_or_default().to_string());
            if is_last {
                break;
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or(0),
            lines,
        })
    }

    async fn read_line(&mut self) -> Result<String, SmtpProbeError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                if line.ends_with(b"\r\n") {
                    line.truncate(line.len() - 2);
                } else {
                    line.truncate(line.len() - 1);
                }
                return String::from_utf8(line)
                    .map_err(|err| SmtpProbeError::protocol(format!("utf8 error: {err}")));
            }

            let mut buf = [0u8; 512];
            let read = self.stream.read(&mut buf).await.map_err(SmtpProbeError::io)?;
            if read == 0 {
                return Err(SmtpProbeError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }

    fn record_reply(&mut self, reply: &SmtpReply) {
        if reply.lines.is_empty() {
            self.record("S", &format!("{}", reply.code));
        } else {
            for line in reply.lines.clone() {
                self.record("S", &format!("{} {}", reply.code, line));
            }
        }
    }
}
