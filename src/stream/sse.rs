//! `text/event-stream` framing for verdict events.

use crate::verdict::VerdictEvent;

pub const CONTENT_TYPE: &str = "text/event-stream";

/// `data: {json}\n\n`
pub fn encode_event(event: &VerdictEvent) -> String {
    // la sérialisation d'une struct de deux String ne peut pas échouer
    let json = serde_json::to_string(event).unwrap_or_default();
    format!("data: {json}\n\n")
}

/// Incremental decoder for a worker's event stream.
///
/// Bytes may arrive split anywhere, including inside a UTF-8 sequence.
/// Frames whose data is not a verdict event are logged and dropped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<VerdictEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some((end, sep)) = find_frame_end(&self.buf) {
            let frame: Vec<u8> = self.buf.drain(..end + sep).take(end).collect();
            if let Some(event) = parse_frame(&frame) {
                events.push(event);
            }
        }
        events
    }

    /// Parses whatever is left once the stream has ended.
    pub fn finish(mut self) -> Option<VerdictEvent> {
        let rest = std::mem::take(&mut self.buf);
        parse_frame(&rest)
    }
}

fn find_frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_frame(frame: &[u8]) -> Option<VerdictEvent> {
    let text = match std::str::from_utf8(frame) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "dropping non UTF-8 event frame");
            return None;
        }
    };
    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|d| d.strip_prefix(' ').unwrap_or(d))
        .collect();
    if data.is_empty() {
        // commentaires / keep-alive
        return None;
    }
    match serde_json::from_str(&data.join("\n")) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(error = %err, frame = %text, "dropping malformed event frame");
            None
        }
    }
}
