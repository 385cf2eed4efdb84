use serde_json::Value;

/// Transient answer of one provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderResult {
    pub conclusive: bool,
    pub deliverable: Option<bool>,
}

impl ProviderResult {
    pub fn deliverable(value: bool) -> Self {
        Self {
            conclusive: true,
            deliverable: Some(value),
        }
    }

    pub fn inconclusive() -> Self {
        Self {
            conclusive: false,
            deliverable: None,
        }
    }
}

/// Where the boolean-ish deliverability answer lives in a provider's JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverableSignal {
    /// JSON pointer, e.g. `/data/result`.
    pub pointer: &'static str,
    pub deliverable: &'static [&'static str],
    pub undeliverable: &'static [&'static str],
}

impl DeliverableSignal {
    pub fn read(&self, body: &Value) -> ProviderResult {
        match body.pointer(self.pointer) {
            Some(Value::Bool(b)) => ProviderResult::deliverable(*b),
            Some(Value::String(s)) => {
                let s = s.trim();
                if self.deliverable.iter().any(|v| v.eq_ignore_ascii_case(s)) {
                    ProviderResult::deliverable(true)
                } else if self.undeliverable.iter().any(|v| v.eq_ignore_ascii_case(s)) {
                    ProviderResult::deliverable(false)
                } else {
                    ProviderResult::inconclusive()
                }
            }
            _ => ProviderResult::inconclusive(),
        }
    }
}
