//! Profile store for GLR Manager.
//!
//! Profiles live as `<name>.json` documents in a single directory. The
//! [`ProfileManager`] rebuilds its in-memory index from that directory at
//! startup and is the only source of truth for which profiles exist while
//! the process runs.
//!
//! A corrupt document is logged and skipped; it never prevents the other
//! profiles from loading.

pub mod error;
pub mod manager;

pub use error::ProfileError;
pub use manager::{DEFAULT_PROFILE, ProfileManager, SkippedProfile};
