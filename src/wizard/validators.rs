//! Input validators and normalizers.
//!
//! All functions here are total and pure — no network or state access.
//! They are used only as gates inside the orchestrator's submit path.

use std::sync::OnceLock;

use regex::Regex;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?\d{7,15}$").unwrap())
}

fn time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap())
}

/// Syntactic email check. Server-side uniqueness/deliverability is not
/// this crate's concern.
pub fn validate_email(input: &str) -> bool {
    email_re().is_match(input.trim())
}

/// Syntactic phone check: 7–15 digits after stripping spaces and hyphens,
/// with an optional leading `+`.
pub fn validate_phone(input: &str) -> bool {
    let stripped = strip_phone(input);
    phone_re().is_match(&stripped)
}

/// `HH:MM` 24-hour time check, used by the opening-hours form.
pub fn validate_time(input: &str) -> bool {
    time_re().is_match(input.trim())
}

/// A country's phone numbering convention.
///
/// Nigerian numbering is the default market; other markets only need a
/// different prefix pair.
#[derive(Debug, Clone)]
pub struct PhoneScheme {
    /// Prefix that marks a locally-formatted number, e.g. `0`.
    pub local_prefix: String,
    /// Canonical international prefix prepended to local numbers, e.g. `+234`.
    pub international_prefix: String,
}

impl PhoneScheme {
    /// Nigerian numbering: local `0…` numbers gain a `+234` prefix.
    pub fn nigeria() -> Self {
        Self {
            local_prefix: "0".to_string(),
            international_prefix: "+234".to_string(),
        }
    }
}

/// Normalize a phone number under the given scheme.
///
/// Spaces and hyphens are stripped. A locally-formatted number gets the
/// canonical international prefix prepended; an already-international
/// number passes through unchanged.
pub fn normalize_phone(input: &str, scheme: &PhoneScheme) -> String {
    let stripped = strip_phone(input);
    if stripped.starts_with('+') {
        stripped
    } else if stripped.starts_with(&scheme.local_prefix) {
        format!("{}{}", scheme.international_prefix, stripped)
    } else {
        stripped
    }
}

fn strip_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Derive a subdomain slug from a store name.
///
/// Lower-cases, strips characters outside `[a-z0-9\s-]`, collapses
/// whitespace runs to single hyphens, collapses repeated hyphens, and
/// trims leading/trailing hyphens. Reapplied verbatim when the user edits
/// the subdomain directly.
pub fn slugify_subdomain(name: &str) -> String {
    let filtered: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = filtered.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    for c in hyphenated.chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}
