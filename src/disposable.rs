//! Known throwaway-mail domains.

use std::collections::HashSet;

use phf::phf_set;

const BUILTIN: phf::Set<&'static str> = phf_set! {
    "mailinator.com",
    "10minutemail.com",
    "10minutemail.net",
    "guerrillamail.com",
    "guerrillamail.net",
    "guerrillamail.org",
    "sharklasers.com",
    "grr.la",
    "tempmail.com",
    "temp-mail.org",
    "tempmail.net",
    "throwawaymail.com",
    "yopmail.com",
    "yopmail.net",
    "getnada.com",
    "nada.email",
    "trashmail.com",
    "trashmail.de",
    "dispostable.com",
    "maildrop.cc",
    "mintemail.com",
    "mohmal.com",
    "fakeinbox.com",
    "mailnesia.com",
    "mailcatch.com",
    "spamgourmet.com",
    "emailondeck.com",
    "moakt.com",
    "tempr.email",
    "discard.email",
    "burnermail.io",
    "mytemp.email",
};

/// Membership test against the built-in set plus operator-supplied extras.
#[derive(Debug, Clone, Default)]
pub struct DisposableFilter {
    extra: HashSet<String>,
}

impl DisposableFilter {
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra.extend(
            domains
                .into_iter()
                .map(|d| normalize(d.as_ref()))
                .filter(|d| !d.is_empty()),
        );
        self
    }

    /// Matches the domain itself or any parent domain (`x.mailinator.com`).
    pub fn is_disposable(&self, domain: &str) -> bool {
        let domain = normalize(domain);
        if domain.is_empty() {
            return false;
        }
        let mut rest = domain.as_str();
        loop {
            if self.contains(rest) {
                return true;
            }
            match rest.split_once('.') {
                Some((_, parent)) if parent.contains('.') => rest = parent,
                _ => return false,
            }
        }
    }

    fn contains(&self, domain: &str) -> bool {
        BUILTIN.contains(domain) || self.extra.contains(domain)
    }
}

fn normalize(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}
