use serde::{Deserialize, Serialize};

/// Which rule set the syntax stage applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyntaxMode {
    /// `word@word.tld` shape only.
    #[default]
    Permissive,
    /// Shape plus RFC 5321 lengths, IDNA and label rules.
    Strict,
}

impl std::str::FromStr for SyntaxMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" | "relaxed" => Ok(Self::Permissive),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown syntax mode '{other}' (permissive|strict)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyntaxReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl SyntaxReport {
    pub(crate) fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            ok: reasons.is_empty(),
            reasons,
        }
    }
}
