//! Address normalizer: turns an uploaded single-column list into candidates.

mod error;

pub use error::InputError;

/// One trimmed input line, split into local part and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub raw: String,
    pub address: String,
    pub local_part: String,
    pub domain: String,
}

impl Candidate {
    /// Returns `None` for blank lines.
    pub fn parse(raw: &str) -> Option<Self> {
        let address = raw.trim();
        if address.is_empty() {
            return None;
        }
        // le domaine est tout ce qui suit le premier '@'
        let (local_part, domain) = address.split_once('@').unwrap_or(("", ""));
        Some(Self {
            raw: raw.to_string(),
            address: address.to_string(),
            local_part: local_part.to_string(),
            domain: domain.to_ascii_lowercase(),
        })
    }
}

/// Decode an uploaded body and normalize every non-blank first column.
pub fn read_candidates(body: &[u8]) -> Result<Vec<Candidate>, InputError> {
    if body.is_empty() {
        return Err(InputError::Missing);
    }
    let text =
        std::str::from_utf8(body).map_err(|source| InputError::Undecodable { source })?;
    read_candidates_str(text)
}

pub fn read_candidates_str(text: &str) -> Result<Vec<Candidate>, InputError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record.map_err(InputError::csv)?;
        if let Some(candidate) = record.get(0).and_then(Candidate::parse) {
            out.push(candidate);
        }
    }
    Ok(out)
}
