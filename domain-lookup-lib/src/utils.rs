//! Helpers for turning raw domain strings into RDAP queries.
//!
//! Domains are never normalized: case and whitespace pass through untouched,
//! and characters are not percent-encoded when building the query URL.

/// Separator between domain labels.
const LABEL_SEPARATOR: char = '.';

/// Path segment joining an RDAP base URL and the queried domain.
const DOMAIN_PATH: &str = "/domain/";

/// Return the top-level label of `domain`: everything after the last dot.
///
/// A domain without dots is its own label; an empty domain, or one ending in
/// a dot, yields an empty label that no directory entry will match.
pub fn top_level_label(domain: &str) -> &str {
    domain
        .rsplit(LABEL_SEPARATOR)
        .next()
        .unwrap_or_default()
}

/// Build the RDAP domain query URL for `domain` under `endpoint`.
///
/// Bootstrap base URLs usually end in `/`. Trailing slashes are trimmed before
/// `/domain/` is appended, so an IANA base URL yields `.../v1/domain/x.com`
/// rather than the `.../v1//domain/x.com` a plain `{base}/domain/{name}` join
/// would send.
pub fn rdap_domain_url(endpoint: &str, domain: &str) -> String {
    format!(
        "{}{}{}",
        endpoint.trim_end_matches('/'),
        DOMAIN_PATH,
        domain
    )
}
