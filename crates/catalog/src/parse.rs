//! HTML extraction for store search pages, DLC fragments and SteamDB tables.

use glr_model::{Game, GameKind};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::CatalogError;
use crate::filter;

/// Markers served by Cloudflare-style interstitials.
const CHALLENGE_MARKERS: &[&str] = &[
    "just a moment",
    "cf-challenge",
    "cf-browser-verification",
    "attention required",
    "checking your browser",
];

/// Markers that indicate a CAPTCHA regardless of status.
const CAPTCHA_MARKERS: &[&str] = &["g-recaptcha", "h-captcha", "captcha-delivery"];

/// An accepted store search row.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRow {
    pub game: Game,
    /// Store page URL of the row, used for DLC expansion.
    pub href: String,
}

fn selector(css: &str) -> Result<Selector, CatalogError> {
    Selector::parse(css).map_err(|e| CatalogError::Parse(format!("selector {css:?}: {e}")))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts matching rows from a store search results page.
///
/// Rows without an app id, with a comma-separated id list (bundles) or
/// whose title does not contain `query` are skipped.
pub fn parse_search_results(html: &str, query: &str) -> Result<Vec<SearchRow>, CatalogError> {
    let document = Html::parse_document(html);
    let row_sel = selector("a.search_result_row")?;
    let title_sel = selector("span.title")?;

    let mut rows = Vec::new();
    for row in document.select(&row_sel) {
        let Some(app_id) = row.value().attr("data-ds-appid") else {
            continue;
        };
        if app_id.contains(',') {
            debug!(app_id, "skipping multi-app row");
            continue;
        }
        let Some(title) = row.select(&title_sel).next().map(text_of) else {
            continue;
        };
        if !filter::title_matches(&title, query) {
            continue;
        }
        let Ok(game) = Game::new(app_id, &title, GameKind::Game) else {
            continue;
        };
        let href = row.value().attr("href").unwrap_or_default().to_string();
        rows.push(SearchRow { game, href });
    }
    Ok(rows)
}

/// Extracts DLC entries from a recommendations fragment.
pub fn parse_dlc_recommendations(fragment: &str) -> Result<Vec<Game>, CatalogError> {
    let document = Html::parse_fragment(fragment);
    let block_sel = selector("div.recommendation")?;
    let link_sel = selector("a[data-ds-appid]")?;
    let name_sel = selector("span.color_created")?;

    let mut games = Vec::new();
    for block in document.select(&block_sel) {
        let id = block
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("data-ds-appid"));
        let name = block.select(&name_sel).next().map(text_of);
        let (Some(id), Some(name)) = (id, name) else {
            continue;
        };
        if let Ok(game) = Game::new(id, &name, GameKind::Dlc) {
            games.push(game);
        }
    }
    Ok(games)
}

/// Extracts app rows from a SteamDB search table.
///
/// Only `Game` and `DLC` rows are kept.
pub fn parse_steamdb_results(html: &str) -> Result<Vec<Game>, CatalogError> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr.app")?;
    let cell_sel = selector("td")?;

    let mut games = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).take(3).map(text_of).collect();
        let [id, kind, name] = cells.as_slice() else {
            continue;
        };
        let Ok(kind) = kind.parse::<GameKind>() else {
            debug!(id = %id, kind = %kind, "skipping steamdb row");
            continue;
        };
        if let Ok(game) = Game::new(id.as_str(), name.as_str(), kind) {
            games.push(game);
        }
    }
    Ok(games)
}

/// Whether a response is an anti-bot interstitial instead of real content.
pub fn is_challenge(status: u16, body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    if CAPTCHA_MARKERS.iter().any(|m| body.contains(m)) {
        return true;
    }
    matches!(status, 403 | 429 | 503) && CHALLENGE_MARKERS.iter().any(|m| body.contains(m))
}
