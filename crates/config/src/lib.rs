//! Config store for GLR Manager.
//!
//! Owns the single [`Config`](glr_model::Config) instance of the process.
//! Loading never fails: a missing or unreadable `config.json` yields defaults,
//! and the document is always rewritten with the current schema version.
//! Changes go through [`ConfigStore::scoped`] or [`ConfigStore::update`],
//! which persist when the scope ends.

mod error;
pub mod paths;
mod store;

pub use error::ConfigError;
pub use store::{ConfigGuard, ConfigStore, LOADER_MARKER};
