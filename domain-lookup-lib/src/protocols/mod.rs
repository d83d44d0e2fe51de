//! Protocol implementations for domain lookups.
//!
//! This module contains the RDAP query client and the registry directory
//! built from the IANA bootstrap document.

/// RDAP (Registration Data Access Protocol) implementation
pub mod rdap;

/// Registry directory built from the RDAP bootstrap document
pub mod registry;

pub use rdap::{classify_status, RdapClient};
pub use registry::{BootstrapDocument, RegistryDirectory};
