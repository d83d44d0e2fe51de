//! # Domain Lookup Library
//!
//! Bulk registration lookups over RDAP with a global concurrency cap.
//!
//! A [`RegistryDirectory`] is built once from the IANA RDAP bootstrap
//! document. A [`Dispatcher`] drains a work queue of domains, runs at most
//! `concurrency` lookups at a time and emits exactly one [`LookupOutcome`]
//! per domain, in completion order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_lookup_lib::{Dispatcher, DomainChecker, LookupConfig, RegistryDirectory};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = LookupConfig::default();
//!     let directory =
//!         RegistryDirectory::fetch(&config.bootstrap_url, config.bootstrap_timeout).await?;
//!     let checker = DomainChecker::new(Arc::new(directory))?;
//!     let dispatcher = Dispatcher::new(checker, config.concurrency);
//!
//!     let domains = vec!["example.com".to_string(), "example.xx".to_string()];
//!     for outcome in dispatcher.lookup_all(domains).await {
//!         println!("{}", outcome.to_line());
//!     }
//!     Ok(())
//! }
//! ```

pub use checker::DomainChecker;
pub use concurrent::{work_queue, Dispatcher, DomainLookup};
pub use config::{
    load_env_config, parse_timeout_string, resolve_config, ConfigManager, DefaultsConfig,
    EnvConfig, FileConfig,
};
pub use error::LookupError;
pub use protocols::{classify_status, BootstrapDocument, RdapClient, RegistryDirectory};
pub use types::{
    LookupConfig, LookupOutcome, LookupStatus, DEFAULT_BOOTSTRAP_TIMEOUT, DEFAULT_BOOTSTRAP_URL,
    DEFAULT_CONCURRENCY,
};
pub use utils::{rdap_domain_url, top_level_label};

/// Domain extraction from comma-separated text
pub mod extract;

mod checker;
mod concurrent;
mod config;
mod error;
mod protocols;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, LookupError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
