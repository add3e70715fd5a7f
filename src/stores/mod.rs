//! Contains traits and implementations for objects that persist user
//! credentials and transaction ledgers.
//!
//! The traits are the seam between the domain operations and the flat-file
//! records this application ships with: an implementer can swap in a real
//! transactional store without touching calling code.

mod credentials;
mod ledgers;

pub use credentials::{CredentialStore, JsonCredentialStore};
pub use ledgers::{CsvLedgerStore, LedgerStore};
