//! RDAP (Registration Data Access Protocol) queries.
//!
//! Registration status is inferred from the HTTP status alone: a 404 from
//! the registry's RDAP server is taken to mean the domain is not registered.
//! That holds for registries like Verisign but is not guaranteed by RDAP in
//! general. Response bodies are drained and discarded.

use crate::error::LookupError;
use crate::types::{LookupOutcome, LookupStatus};
use crate::utils::rdap_domain_url;
use reqwest::StatusCode;

/// RDAP client issuing one GET per domain.
///
/// No request timeout is configured and redirects are not followed, so a 3xx
/// answer is classified as-is.
#[derive(Clone)]
pub struct RdapClient {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
}

impl RdapClient {
    /// Create a new RDAP client.
    pub fn new() -> Result<Self, LookupError> {
        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                LookupError::network_with_source("Failed to create RDAP HTTP client", e.to_string())
            })?;

        Ok(Self { http_client })
    }

    /// Query `endpoint` for `domain` and classify the answer.
    ///
    /// Never fails: transport problems become a `TransportError` outcome
    /// carrying the error text.
    pub async fn query(&self, endpoint: &str, domain: &str) -> LookupOutcome {
        let url = rdap_domain_url(endpoint, domain);
        tracing::debug!(%domain, %url, "Sending RDAP request");

        let response = match self.http_client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%domain, error = %e, "RDAP request failed");
                return LookupOutcome::transport_error(domain, e.to_string());
            }
        };

        let status = response.status();

        // Drain the body so the connection can be reused.
        if let Err(e) = response.bytes().await {
            tracing::debug!(%domain, error = %e, "Failed to read RDAP response body");
            return LookupOutcome::transport_error(domain, e.to_string());
        }

        let classified = classify_status(status);
        tracing::debug!(%domain, status = status.as_u16(), outcome = %classified, "RDAP response");
        LookupOutcome::new(domain, classified)
    }
}

/// Map an RDAP response status to a lookup classification.
pub fn classify_status(status: StatusCode) -> LookupStatus {
    if status.is_success() {
        LookupStatus::Registered
    } else if status == StatusCode::NOT_FOUND {
        LookupStatus::Unregistered
    } else if status.is_server_error() {
        LookupStatus::ServerError
    } else {
        LookupStatus::UnknownStatus
    }
}
