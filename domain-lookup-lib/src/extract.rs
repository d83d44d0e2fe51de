//! Pulling domain names out of comma-separated text.
//!
//! Used to turn exports (CSV dumps, registrar listings) into the
//! one-domain-per-line files the lookup CLI reads.

use regex::Regex;

lazy_static::lazy_static! {
    /// Lowercase LDH labels joined by hyphens, one dot, an alphabetic TLD.
    static ref DOMAIN_PATTERN: Regex =
        Regex::new(r"^([a-z0-9]+(-[a-z0-9]+)*)+\.[a-z]{2,}$").expect("domain pattern is valid");
}

/// Return the first comma-separated field of `line` that looks like a domain.
pub fn find_domain(line: &str) -> Option<&str> {
    line.split(',').find(|field| is_domain_like(field))
}

/// Whether `text` matches the second-level domain pattern exactly.
pub fn is_domain_like(text: &str) -> bool {
    DOMAIN_PATTERN.is_match(text)
}
