use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MxHost {
    pub preference: u16,
    pub hostname: String,
}

impl MxHost {
    pub fn new(preference: u16, hostname: impl Into<String>) -> Self {
        Self {
            preference,
            hostname: hostname.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MxStatus {
    Records(Vec<MxHost>),
    NoRecords,
}

impl MxStatus {
    pub fn hosts(&self) -> &[MxHost] {
        match self {
            Self::Records(hosts) => hosts.as_slice(),
            Self::NoRecords => &[],
        }
    }

    pub fn into_hosts(self) -> Vec<MxHost> {
        match self {
            Self::Records(hosts) => hosts,
            Self::NoRecords => Vec::new(),
        }
    }
}
