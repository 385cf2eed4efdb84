use std::fmt;

use serde::{Deserialize, Serialize};

use super::TransportError;

/// SOCKS5 relay settings, scoped to one batch.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Parse `host:port`. Empty credentials are treated as absent.
    pub fn parse(
        address: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, TransportError> {
        let trimmed = address.trim();
        let (host, port) = trimmed
            .rsplit_once(':')
            .ok_or_else(|| TransportError::invalid_proxy(trimmed, "expected host:port"))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(TransportError::invalid_proxy(trimmed, "host is empty"));
        }
        let port = port
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or_else(|| TransportError::invalid_proxy(trimmed, "port must be 1..=65535"))?;
        Ok(Self {
            host: host.to_string(),
            port,
            username: non_empty(username),
            password: non_empty(password),
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Back to request fields, for forwarding to a worker.
    pub fn to_fields(&self) -> ProxyFields {
        ProxyFields {
            proxy: Some(self.address()),
            proxy_user: self.username.clone(),
            proxy_pass: self.password.clone(),
        }
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref().unwrap_or("")))
    }
}

// ne jamais afficher le mot de passe dans les logs
impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl fmt::Debug for ProxyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFields")
            .field("proxy", &self.proxy)
            .field("proxy_user", &self.proxy_user)
            .field("proxy_pass", &self.proxy_pass.as_ref().map(|_| "***"))
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Proxy fields as they arrive on a request (query string or JSON).
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProxyFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    #[serde(default, alias = "proxyUser", skip_serializing_if = "Option::is_none")]
    pub proxy_user: Option<String>,
    #[serde(default, alias = "proxyPass", skip_serializing_if = "Option::is_none")]
    pub proxy_pass: Option<String>,
}

impl ProxyFields {
    /// `Ok(None)` when no proxy address was supplied.
    pub fn into_config(self) -> Result<Option<ProxyConfig>, TransportError> {
        match self.proxy.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(address) => ProxyConfig::parse(
                address,
                self.proxy_user.as_deref(),
                self.proxy_pass.as_deref(),
            )
            .map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_and_port() {
        let cfg = ProxyConfig::parse(" 10.0.0.1:1080 ", None, None).unwrap();
        assert_eq!(cfg.host, "10.0.0.1");
        assert_eq!(cfg.port, 1080);
        assert!(cfg.credentials().is_none());
    }

    #[test]
    fn bracketed_ipv6() {
        let cfg = ProxyConfig::parse("[::1]:9050", Some("u"), Some("p")).unwrap();
        assert_eq!(cfg.host, "::1");
        assert_eq!(cfg.credentials(), Some(("u", "p")));
    }

    #[test]
    fn rejects_missing_or_bad_port() {
        assert!(ProxyConfig::parse("proxy.local", None, None).is_err());
        assert!(ProxyConfig::parse("proxy.local:0", None, None).is_err());
        assert!(ProxyConfig::parse("proxy.local:http", None, None).is_err());
        assert!(ProxyConfig::parse(":1080", None, None).is_err());
    }

    #[test]
    fn empty_credentials_are_absent() {
        let cfg = ProxyConfig::parse("p:1", Some("  "), Some("")).unwrap();
        assert_eq!(cfg.username, None);
        assert_eq!(cfg.password, None);
    }

    #[test]
    fn debug_hides_password() {
        let cfg = ProxyConfig::parse("p:1", Some("user"), Some("hunter2")).unwrap();
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("***"));
    }

    #[test]
    fn fields_without_address_mean_no_proxy() {
        let fields = ProxyFields {
            proxy: Some(" ".into()),
            ..ProxyFields::default()
        };
        assert!(fields.into_config().unwrap().is_none());
    }

    #[test]
    fn fields_accept_camel_case_json() {
        let fields: ProxyFields = serde_json::from_str(
            r#"{"proxy":"relay:1080","proxyUser":"u","proxyPass":"p"}"#,
        )
        .unwrap();
        let cfg = fields.into_config().unwrap().unwrap();
        assert_eq!(cfg.credentials(), Some(("u", "p")));
    }

    #[test]
    fn forwarded_fields_use_snake_case_names() {
        let cfg = ProxyConfig::parse("relay:1080", Some("u"), None).unwrap();
        let query = serde_json::to_value(cfg.to_fields()).unwrap();
        assert_eq!(query, serde_json::json!({"proxy": "relay:1080", "proxy_user": "u"}));
    }
}
