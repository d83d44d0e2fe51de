//! Single-domain lookup against the registry directory.
//!
//! This module provides the `DomainChecker` that performs one lookup task:
//! pick the RDAP server for the domain's top-level label and classify the
//! server's answer.

use crate::concurrent::DomainLookup;
use crate::error::LookupError;
use crate::protocols::{RdapClient, RegistryDirectory};
use crate::types::{LookupOutcome, LookupStatus};
use crate::utils::top_level_label;
use std::future::Future;
use std::sync::Arc;

/// Classifies domains using the RDAP servers listed in a registry directory.
///
/// # Example
///
/// ```rust,no_run
/// use domain_lookup_lib::{DomainChecker, RegistryDirectory};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let directory = RegistryDirectory::from_entries([
///         ("com", vec!["https://rdap.verisign.com/com/v1/"]),
///     ]);
///     let checker = DomainChecker::new(Arc::new(directory))?;
///     let outcome = checker.check_domain("example.com").await;
///     println!("{}", outcome.to_line());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DomainChecker {
    /// Label → RDAP endpoints, shared read-only with every task
    directory: Arc<RegistryDirectory>,
    /// RDAP client used for every query
    rdap_client: RdapClient,
}

impl DomainChecker {
    /// Create a checker over `directory`.
    pub fn new(directory: Arc<RegistryDirectory>) -> Result<Self, LookupError> {
        Ok(Self {
            directory,
            rdap_client: RdapClient::new()?,
        })
    }

    /// Look up a single domain.
    ///
    /// Only the first endpoint listed for the label is queried; there is no
    /// fallback to the others. Labels without an endpoint yield `NoProvider`
    /// without touching the network.
    pub async fn check_domain(&self, domain: &str) -> LookupOutcome {
        let label = top_level_label(domain);

        let Some(endpoint) = self
            .directory
            .lookup(label)
            .and_then(|endpoints| endpoints.first())
        else {
            tracing::debug!(%domain, %label, "No RDAP server for label");
            return LookupOutcome::new(domain, LookupStatus::NoProvider);
        };

        self.rdap_client.query(endpoint, domain).await
    }
}

impl DomainLookup for DomainChecker {
    fn lookup(&self, domain: String) -> impl Future<Output = LookupOutcome> + Send {
        async move { self.check_domain(&domain).await }
    }
}
