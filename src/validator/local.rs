/// Règles strictes: atext ASCII + '.' non initial/terminal, pas de ".."
pub(crate) fn check_local(local: &str, reasons: &mut Vec<String>) {
    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        reasons.push("local part has misplaced dots".to_string());
    }
    if !local.chars().all(is_atext) {
        reasons.push("local part has invalid chars".to_string());
    }
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '.'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reasons(local: &str) -> Vec<String> {
        let mut out = Vec::new();
        check_local(local, &mut out);
        out
    }

    #[test]
    fn strict_dots() {
        assert!(!reasons(".abc").is_empty());
        assert!(!reasons("abc.").is_empty());
        assert!(!reasons("a..b").is_empty());
        assert!(reasons("a.b").is_empty());
    }

    #[test]
    fn length_limit() {
        assert!(reasons(&"a".repeat(64)).is_empty());
        assert!(!reasons(&"a".repeat(65)).is_empty());
    }
}
