//! Catalog queries against the Steam store (or SteamDB).
//!
//! Search result pages and DLC recommendation fragments are scraped into
//! [`Game`](glr_model::Game) records. Every public query returns a
//! [`QueryOutcome`] instead of an error: the catalog is a convenience
//! feature and a failed request must never take the caller down with it.

pub mod client;
pub mod error;
pub mod filter;
pub mod parse;
pub mod types;

pub use client::Catalog;
pub use error::{CatalogError, CatalogFailure, FailureKind};
pub use types::{AppRef, CatalogSource, QueryOutcome};
