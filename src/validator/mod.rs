//! Syntax stage: cheap, local format checks run before any network call.

mod domain;
mod local;
mod types;

use std::sync::LazyLock;

use regex::Regex;

pub use types::{SyntaxMode, SyntaxReport};

use domain::check_domain;
use local::check_local;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("static pattern compiles")
});

/// Permissive shape check (`word@word.tld`).
pub fn is_valid_syntax(address: &str) -> bool {
    EMAIL_SHAPE.is_match(address)
}

pub fn validate_syntax(address: &str, mode: SyntaxMode) -> SyntaxReport {
    let input = address.trim();
    let mut reasons = Vec::new();

    if !is_valid_syntax(input) {
        reasons.push("does not match user@domain.tld shape".to_string());
        if matches!(mode, SyntaxMode::Permissive) {
            return SyntaxReport::from_reasons(reasons);
        }
    }

    if matches!(mode, SyntaxMode::Strict) {
        // longueur totale (RFC 5321: 254 max avec @)
        if input.len() > 254 {
            reasons.push(format!("total length {} > 254", input.len()));
        }
        match input.split_once('@') {
            Some((local, domain)) if !domain.contains('@') => {
                check_local(local, &mut reasons);
                check_domain(domain, &mut reasons);
            }
            _ => reasons.push("must contain exactly one '@'".to_string()),
        }
    }

    SyntaxReport::from_reasons(reasons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = validate_syntax("alice@example.com", SyntaxMode::Permissive);
        assert!(r.ok, "{:?}", r.reasons);
        let r = validate_syntax("alice@example.com", SyntaxMode::Strict);
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn rejects_plain_word() {
        assert!(!is_valid_syntax("not-an-email"));
        assert!(!validate_syntax("not-an-email", SyntaxMode::Permissive).ok);
    }

    #[test]
    fn rejects_double_at() {
        assert!(!validate_syntax("a@@b.com", SyntaxMode::Permissive).ok);
        assert!(!validate_syntax("a@b@c.com", SyntaxMode::Strict).ok);
    }

    #[test]
    fn permissive_tolerates_what_strict_refuses() {
        let addr = "a..b@example.com";
        assert!(validate_syntax(addr, SyntaxMode::Permissive).ok);
        let strict = validate_syntax(addr, SyntaxMode::Strict);
        assert!(!strict.ok);
        assert!(strict.reasons.iter().any(|r| r.contains("dots")));
    }

    #[test]
    fn strict_reports_long_labels() {
        let addr = format!("user@{}.com", "a".repeat(70));
        let report = validate_syntax(&addr, SyntaxMode::Strict);
        assert!(!report.ok);
        assert!(report.reasons.iter().any(|r| r.contains("> 63")));
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("STRICT".parse::<SyntaxMode>(), Ok(SyntaxMode::Strict));
        assert_eq!("permissive".parse::<SyntaxMode>(), Ok(SyntaxMode::Permissive));
        assert!("loose".parse::<SyntaxMode>().is_err());
    }

    proptest! {
        #[test]
        fn strings_without_at_never_pass(s in "[^@]{0,40}") {
            prop_assert!(!validate_syntax(&s, SyntaxMode::Permissive).ok);
            prop_assert!(!validate_syntax(&s, SyntaxMode::Strict).ok);
        }

        #[test]
        fn simple_shapes_always_pass(local in "[a-z0-9]{1,20}", host in "[a-z0-9]{1,20}", tld in "[a-z]{2,6}") {
            let addr = format!("{local}@{host}.{tld}");
            prop_assert!(validate_syntax(&addr, SyntaxMode::Permissive).ok);
            prop_assert!(validate_syntax(&addr, SyntaxMode::Strict).ok);
        }
    }
}
