//! Core data types for bulk domain lookups.
//!
//! This module defines the per-domain outcome handed to result sinks and the
//! runtime configuration of the lookup engine.

use serde::Serialize;
use std::time::Duration;

/// Default number of lookups allowed in flight at once.
pub const DEFAULT_CONCURRENCY: usize = 256;

/// IANA-published RDAP bootstrap file for DNS registrations.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://data.iana.org/rdap/dns.json";

/// Default request timeout when fetching the bootstrap document.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Classification of a single domain lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// The RDAP server answered with a 2xx status
    Registered,

    /// The RDAP server answered 404
    Unregistered,

    /// The RDAP server answered with a 5xx status
    ServerError,

    /// No RDAP server is known for the domain's top-level label
    NoProvider,

    /// The request could not be completed (connect, TLS, body read, bad URL)
    TransportError,

    /// Any other status (3xx, 4xx other than 404, ...)
    UnknownStatus,
}

impl LookupStatus {
    /// Fixed message for this status.
    ///
    /// `TransportError` has no fixed text; its outcomes carry the underlying
    /// error message instead.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            LookupStatus::Registered => Some("Registered"),
            LookupStatus::Unregistered => Some("Unregistered"),
            LookupStatus::ServerError => Some("RDAP server error"),
            LookupStatus::NoProvider => Some("No RDAP server found"),
            LookupStatus::TransportError => None,
            LookupStatus::UnknownStatus => Some("Unknown error"),
        }
    }
}

impl std::fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LookupStatus::Registered => "registered",
            LookupStatus::Unregistered => "unregistered",
            LookupStatus::ServerError => "server_error",
            LookupStatus::NoProvider => "no_provider",
            LookupStatus::TransportError => "transport_error",
            LookupStatus::UnknownStatus => "unknown_status",
        };
        f.write_str(name)
    }
}

/// Result of looking up one domain.
///
/// Exactly one outcome is produced per domain fed to the dispatcher, whether
/// the lookup succeeded or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupOutcome {
    /// The domain exactly as it was supplied
    pub domain: String,

    /// How the domain was classified
    pub status: LookupStatus,

    /// Human-readable message, the second column of the CSV output
    pub message: String,
}

impl LookupOutcome {
    /// Create an outcome carrying the fixed message of `status`.
    ///
    /// Transport failures have no fixed message and are built with
    /// [`LookupOutcome::transport_error`].
    pub fn new<D: Into<String>>(domain: D, status: LookupStatus) -> Self {
        debug_assert_ne!(status, LookupStatus::TransportError);
        Self {
            domain: domain.into(),
            status,
            message: status.message().unwrap_or_default().to_string(),
        }
    }

    /// Create a transport failure outcome with the underlying error text.
    pub fn transport_error<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self {
            domain: domain.into(),
            status: LookupStatus::TransportError,
            message: message.into(),
        }
    }

    /// Render as a `domain,message` line without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{},{}", self.domain, self.message)
    }
}

/// Runtime configuration of the lookup engine.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Maximum number of lookups in flight at once (at least 1)
    pub concurrency: usize,

    /// Where to fetch the RDAP bootstrap document from
    pub bootstrap_url: String,

    /// Request timeout for the bootstrap fetch only; lookups have none
    pub bootstrap_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
        }
    }
}

impl LookupConfig {
    /// Set the concurrency limit. Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the bootstrap document URL.
    pub fn with_bootstrap_url<U: Into<String>>(mut self, url: U) -> Self {
        self.bootstrap_url = url.into();
        self
    }

    /// Set the bootstrap fetch timeout.
    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }
}
