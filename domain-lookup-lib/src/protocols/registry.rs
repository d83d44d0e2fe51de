//! Registry directory built from the IANA RDAP bootstrap document.
//!
//! The bootstrap file maps top-level labels to the base URLs of the RDAP
//! services authoritative for them:
//!
//! ```json
//! {
//!   "description": "RDAP bootstrap file for Domain Name System registrations",
//!   "publication": "2022-12-08T18:00:02Z",
//!   "services": [
//!     [["uz"], ["http://cctld.uz:9000/"]]
//!   ]
//! }
//! ```
//!
//! The directory is built once at startup and never mutated afterwards, so
//! lookup tasks share it through an `Arc` without any locking.

use crate::error::LookupError;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Raw shape of the bootstrap document.
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapDocument {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub publication: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Each service should be a `[labels, urls]` pair
    #[serde(default)]
    pub services: Vec<Vec<Vec<String>>>,
}

/// Immutable mapping from top-level label to RDAP endpoint base URLs.
#[derive(Debug, Clone, Default)]
pub struct RegistryDirectory {
    endpoints: HashMap<String, Vec<String>>,
}

impl RegistryDirectory {
    /// Build the directory from a parsed bootstrap document.
    ///
    /// Fails on an empty service list and on any service that is not exactly
    /// a two-element tuple; a partial directory would silently misroute
    /// lookups. When a label appears in several services the later one wins.
    pub fn from_document(document: &BootstrapDocument) -> Result<Self, LookupError> {
        if document.services.is_empty() {
            return Err(LookupError::EmptyRegistry);
        }

        let mut endpoints = HashMap::new();
        for (index, service) in document.services.iter().enumerate() {
            let [labels, urls] = service.as_slice() else {
                return Err(LookupError::MalformedService {
                    index,
                    elements: service.len(),
                });
            };

            for label in labels {
                endpoints.insert(label.clone(), urls.clone());
            }
        }

        tracing::info!(
            labels = endpoints.len(),
            services = document.services.len(),
            publication = document.publication.as_deref().unwrap_or("-"),
            "Built RDAP registry directory"
        );

        Ok(Self { endpoints })
    }

    /// Parse a bootstrap document from JSON text and build the directory.
    pub fn from_json(json: &str) -> Result<Self, LookupError> {
        let document: BootstrapDocument = serde_json::from_str(json)?;
        Self::from_document(&document)
    }

    /// Build a directory directly from label/endpoint pairs.
    pub fn from_entries<I, L, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, Vec<U>)>,
        L: Into<String>,
        U: Into<String>,
    {
        let endpoints = entries
            .into_iter()
            .map(|(label, urls)| (label.into(), urls.into_iter().map(Into::into).collect()))
            .collect();
        Self { endpoints }
    }

    /// Fetch the bootstrap document over HTTP and build the directory.
    ///
    /// A non-2xx response, a transport failure or an unparseable body all
    /// abort the build.
    pub async fn fetch(url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                LookupError::network_with_source("Failed to create HTTP client", e.to_string())
            })?;

        tracing::debug!(%url, "Fetching RDAP bootstrap document");

        let response = client.get(url).send().await.map_err(|e| {
            LookupError::bootstrap(url, format!("Failed to fetch bootstrap registry: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(LookupError::bootstrap(
                url,
                format!("Bootstrap registry returned HTTP {}", response.status()),
            ));
        }

        let body = response.text().await.map_err(|e| {
            LookupError::bootstrap(url, format!("Failed to read bootstrap registry: {}", e))
        })?;

        Self::from_json(&body)
    }

    /// Endpoints registered for `label`, matched exactly and case-sensitively.
    pub fn lookup(&self, label: &str) -> Option<&[String]> {
        self.endpoints.get(label).map(Vec::as_slice)
    }

    /// Number of labels in the directory.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// All known labels, sorted.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_builds_union() {
        let json = r#"{
            "description": "RDAP bootstrap file for Domain Name System registrations",
            "publication": "2022-12-08T18:00:02Z",
            "services": [
                [["com", "net"], ["https://rdap.verisign.com/com/v1/"]],
                [["uz"], ["http://cctld.uz:9000/"]]
            ]
        }"#;

        let directory = RegistryDirectory::from_json(json).unwrap();
        assert_eq!(directory.len(), 3);
        assert_eq!(
            directory.lookup("com"),
            Some(&["https://rdap.verisign.com/com/v1/".to_string()][..])
        );
        assert_eq!(directory.lookup("uz").unwrap()[0], "http://cctld.uz:9000/");
        assert_eq!(directory.labels(), vec!["com", "net", "uz"]);
    }

    #[test]
    fn test_later_service_overwrites_label() {
        let json = r#"{"services": [
            [["com"], ["http://first"]],
            [["com"], ["http://second", "http://third"]]
        ]}"#;

        let directory = RegistryDirectory::from_json(json).unwrap();
        assert_eq!(
            directory.lookup("com").unwrap(),
            &["http://second".to_string(), "http://third".to_string()]
        );
    }

    #[test]
    fn test_three_element_service_is_rejected() {
        let json = r#"{"services": [
            [["com"], ["http://r1"]],
            [["org"], ["http://r2"], ["extra"]]
        ]}"#;

        let err = RegistryDirectory::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            LookupError::MalformedService {
                index: 1,
                elements: 3
            }
        ));
    }

    #[test]
    fn test_single_element_service_is_rejected() {
        let json = r#"{"services": [[["com"]]]}"#;
        assert!(matches!(
            RegistryDirectory::from_json(json),
            Err(LookupError::MalformedService { elements: 1, .. })
        ));
    }

    #[test]
    fn test_empty_services_is_rejected() {
        assert!(matches!(
            RegistryDirectory::from_json(r#"{"services": []}"#),
            Err(LookupError::EmptyRegistry)
        ));
        assert!(matches!(
            RegistryDirectory::from_json(r#"{"description": "no services"}"#),
            Err(LookupError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            RegistryDirectory::from_json("not json"),
            Err(LookupError::Parse { .. })
        ));
        assert!(matches!(
            RegistryDirectory::from_json(r#"{"services": [[["com"], [42]]]}"#),
            Err(LookupError::Parse { .. })
        ));
    }

    #[test]
    fn test_minimal_document_is_accepted() {
        let directory =
            tokio_test::assert_ok!(RegistryDirectory::from_json(r#"{"services": [[[], []]]}"#));
        assert!(directory.is_empty());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let directory = RegistryDirectory::from_entries([("com", vec!["http://r1"])]);
        assert!(directory.lookup("com").is_some());
        assert!(directory.lookup("COM").is_none());
        assert!(directory.lookup("").is_none());
    }
}
