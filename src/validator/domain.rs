/// Strict-mode domain rules, checked on the IDNA (ASCII) form.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) {
    let Ok(ascii) = idna::domain_to_ascii(domain.trim_end_matches('.')) else {
        reasons.push(format!("domain '{domain}' is not IDNA-convertible"));
        return;
    };
    if ascii.is_empty() {
        reasons.push("domain is empty".to_string());
        return;
    }
    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }

    let labels: Vec<&str> = ascii.split('.').collect();
    if labels.len() < 2 {
        reasons.push("domain needs a dot before the TLD".to_string());
    }
    for label in &labels {
        reasons.extend(label_problem(label));
    }
    // un TLD purement numérique désigne une IP, pas un domaine
    let tld = labels.last().copied().unwrap_or_default();
    if !tld.is_empty() && tld.bytes().all(|b| b.is_ascii_digit()) {
        reasons.push(format!("TLD '{tld}' is numeric"));
    }
}

fn label_problem(label: &str) -> Option<String> {
    if label.is_empty() {
        return Some("domain has an empty label".to_string());
    }
    if label.len() > 63 {
        return Some(format!("label '{label}' is {} chars (> 63)", label.len()));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Some(format!("label '{label}' starts or ends with '-'"));
    }
    label
        .bytes()
        .find(|b| !(b.is_ascii_alphanumeric() || *b == b'-'))
        .map(|b| format!("label '{label}' contains '{}'", b as char))
}
