//! Domain types for catalog queries.

use glr_model::Game;

use crate::error::CatalogFailure;

/// Where search queries are sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// Steam store search, with DLC expansion.
    #[default]
    Store,
    /// SteamDB search table. No DLC expansion.
    SteamDb,
}

impl CatalogSource {
    /// Picks the source from the `use_steamdb` preference.
    pub fn from_preference(use_steamdb: bool) -> Self {
        if use_steamdb {
            CatalogSource::SteamDb
        } else {
            CatalogSource::Store
        }
    }
}

/// Result of a catalog query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Found(Vec<Game>),
    Failed(CatalogFailure),
}

impl QueryOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, QueryOutcome::Found(_))
    }

    /// Returns the games when the query succeeded.
    pub fn games(&self) -> Option<&[Game]> {
        match self {
            QueryOutcome::Found(games) => Some(games),
            QueryOutcome::Failed(_) => None,
        }
    }

    /// Returns the failure when the query failed.
    pub fn failure(&self) -> Option<&CatalogFailure> {
        match self {
            QueryOutcome::Found(_) => None,
            QueryOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<Vec<Game>, CatalogFailure> {
        match self {
            QueryOutcome::Found(games) => Ok(games),
            QueryOutcome::Failed(failure) => Err(failure),
        }
    }
}

/// App id and URL slug extracted from a store page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    pub app_id: String,
    pub slug: String,
}

impl AppRef {
    /// Extracts `{app_id, slug}` from a `…/app/{id}/{slug}/…` store URL.
    ///
    /// Returns `None` for bundle (`/sub/…`) URLs and app URLs without a
    /// slug segment.
    pub fn from_store_url(url: &str) -> Option<Self> {
        let (_, rest) = url.split_once("app/")?;
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let mut segments = rest.split('/');

        let app_id = segments.next()?.trim();
        let slug = segments.next()?.trim();
        if app_id.is_empty() || slug.is_empty() || !app_id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            app_id: app_id.to_string(),
            slug: slug.to_string(),
        })
    }
}
