//! Async catalog client.

use glr_model::Game;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogFailure};
use crate::parse;
use crate::types::{AppRef, CatalogSource, QueryOutcome};

const STORE_URL: &str = "https://store.steampowered.com";
const STEAMDB_URL: &str = "https://steamdb.info";
const USER_AGENT: &str = concat!("GLR-Manager/", env!("CARGO_PKG_VERSION"));

/// Rows requested per store search page.
const SEARCH_PAGE_SIZE: &str = "25";
/// Recommendations requested per DLC page.
const DLC_PAGE_SIZE: &str = "64";
/// Store category filter for games.
const CATEGORY_GAMES: &str = "998";

#[derive(Deserialize)]
struct DlcResponse {
    results_html: String,
}

/// Steam store / SteamDB client.
pub struct Catalog {
    http: reqwest::Client,
    source: CatalogSource,
    store_url: String,
    steamdb_url: String,
}

impl Catalog {
    /// Creates a client that searches `source`.
    pub fn new(source: CatalogSource) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            source,
            store_url: STORE_URL.to_string(),
            steamdb_url: STEAMDB_URL.to_string(),
        })
    }

    /// Points both sources at a local server (for testing).
    #[cfg(test)]
    pub(crate) fn with_base_urls(mut self, store: String, steamdb: String) -> Self {
        self.store_url = store;
        self.steamdb_url = steamdb;
        self
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Searches the configured source for `query`.
    ///
    /// On the store source every matching game is followed by its DLC.
    pub async fn search(&self, query: &str) -> QueryOutcome {
        let result = match self.source {
            CatalogSource::Store => self.search_store(query).await,
            CatalogSource::SteamDb => self.search_steamdb(query).await,
        };
        match result {
            Ok(games) => {
                info!(query, source = ?self.source, count = games.len(), "catalog search finished");
                QueryOutcome::Found(games)
            }
            Err(e) => failed(e, "catalog search failed"),
        }
    }

    /// Lists the DLC of the app behind a store page URL.
    ///
    /// URLs without an `app/{id}/{slug}` segment yield an empty list
    /// without touching the network.
    pub async fn list_dlc(&self, store_url: &str) -> QueryOutcome {
        match self.fetch_dlc(store_url).await {
            Ok(games) => QueryOutcome::Found(games),
            Err(e) => failed(e, "DLC listing failed"),
        }
    }

    async fn search_store(&self, query: &str) -> Result<Vec<Game>, CatalogError> {
        let url = format!("{}/search/results", self.store_url);
        let params = [
            ("term", query),
            ("count", SEARCH_PAGE_SIZE),
            ("start", "0"),
            ("category1", CATEGORY_GAMES),
        ];
        let html = self.get_text(&url, &params).await?;

        let mut games = Vec::new();
        for row in parse::parse_search_results(&html, query)? {
            let dlc = self.fetch_dlc(&row.href).await?;
            games.push(row.game);
            games.extend(dlc);
        }
        Ok(games)
    }

    async fn search_steamdb(&self, query: &str) -> Result<Vec<Game>, CatalogError> {
        let url = format!("{}/search/", self.steamdb_url);
        let params = [("a", "app"), ("q", query), ("type", "-1"), ("category", "0")];
        let html = self.get_text(&url, &params).await?;
        parse::parse_steamdb_results(&html)
    }

    async fn fetch_dlc(&self, store_url: &str) -> Result<Vec<Game>, CatalogError> {
        let Some(app) = AppRef::from_store_url(store_url) else {
            debug!(url = store_url, "no app segment, skipping DLC lookup");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/dlc/{}/{}/ajaxgetfilteredrecommendations",
            self.store_url, app.app_id, app.slug
        );
        let params = [("sort", "newreleases"), ("count", DLC_PAGE_SIZE), ("start", "0")];
        let body = self.get_text(&url, &params).await?;
        let response: DlcResponse = serde_json::from_str(&body)?;

        let games = parse::parse_dlc_recommendations(&response.results_html)?;
        debug!(app_id = %app.app_id, count = games.len(), "DLC fetched");
        Ok(games)
    }

    /// GETs `url` and returns the body, rejecting error statuses and
    /// challenge pages.
    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String, CatalogError> {
        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if parse::is_challenge(status.as_u16(), &body) {
            return Err(CatalogError::Challenge {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(body)
    }
}

fn failed(err: CatalogError, message: &str) -> QueryOutcome {
    let failure = CatalogFailure::from(err);
    warn!(kind = %failure.kind, detail = %failure.detail, "{message}");
    QueryOutcome::Failed(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use glr_model::GameKind;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// A canned response for requests whose path starts with `prefix`.
    struct Route {
        prefix: &'static str,
        status: u16,
        body: String,
    }

    fn route(prefix: &'static str, status: u16, body: impl Into<String>) -> Route {
        Route {
            prefix,
            status,
            body: body.into(),
        }
    }

    /// Starts a mock HTTP server answering from `routes`.
    ///
    /// Returns the base URL and the request targets seen so far. Unrouted
    /// paths get a 404.
    async fn mock_server(routes: Vec<Route>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = vec![0u8; 8192];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let target = request
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(target.clone());

                let (status, body) = routes
                    .iter()
                    .find(|r| target.starts_with(r.prefix))
                    .map(|r| (r.status, r.body.as_str()))
                    .unwrap_or((404, "not found"));
                let resp = format!(
                    "HTTP/1.1 {status} Mock\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(resp.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (url, hits)
    }

    fn store_catalog(url: &str) -> Catalog {
        Catalog::new(CatalogSource::Store)
            .unwrap()
            .with_base_urls(url.to_string(), url.to_string())
    }

    fn search_page() -> String {
        r#"<html><body>
          <a href="https://store.steampowered.com/app/620/Portal_2/?snr=1" data-ds-appid="620" class="search_result_row"><span class="title">Portal 2</span></a>
          <a href="https://store.steampowered.com/sub/7932/" data-ds-appid="400,620" class="search_result_row"><span class="title">Portal Bundle</span></a>
          <a href="https://store.steampowered.com/sub/1234/" data-ds-appid="400" class="search_result_row"><span class="title">Portal</span></a>
        </body></html>"#
            .to_string()
    }

    fn dlc_json() -> String {
        let fragment = r#"<div class="recommendation"><a data-ds-appid="323180"><span class="color_created">Portal 2 Sixense</span></a></div><div class="recommendation"><a data-ds-appid="323170"><span class="color_created">Portal 2 Soundtrack</span></a></div>"#;
        serde_json::json!({"success": 1, "results_html": fragment}).to_string()
    }

    #[tokio::test]
    async fn search_appends_dlc_after_parent() {
        let (url, hits) = mock_server(vec![
            route("/search/results", 200, search_page()),
            route("/dlc/620/Portal_2/ajaxgetfilteredrecommendations", 200, dlc_json()),
        ])
        .await;

        let outcome = store_catalog(&url).search("portal").await;
        let games = outcome.into_result().unwrap();
        let listed: Vec<_> = games.iter().map(|g| (g.id.as_str(), g.kind)).collect();
        assert_eq!(
            listed,
            [
                ("620", GameKind::Game),
                ("323180", GameKind::Dlc),
                ("323170", GameKind::Dlc),
                ("400", GameKind::Game),
            ]
        );

        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].contains("term=portal"));
        assert!(hits[0].contains("count=25"));
        assert!(hits[0].contains("category1=998"));
        assert!(hits[1].contains("sort=newreleases"));
        assert!(hits[1].contains("count=64"));
    }

    #[tokio::test]
    async fn list_dlc_for_bundle_url_skips_network() {
        let (url, hits) = mock_server(vec![]).await;

        let outcome = store_catalog(&url)
            .list_dlc("https://store.steampowered.com/sub/516201/")
            .await;
        assert_eq!(outcome, QueryOutcome::Found(Vec::new()));
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_dlc_parses_recommendations() {
        let (url, _hits) = mock_server(vec![route("/dlc/620/", 200, dlc_json())]).await;

        let games = store_catalog(&url)
            .list_dlc("https://store.steampowered.com/app/620/Portal_2/")
            .await
            .into_result()
            .unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[1].name, "Portal 2 Soundtrack");
    }

    #[tokio::test]
    async fn list_dlc_without_results_html_is_decode_failure() {
        let (url, _hits) = mock_server(vec![route("/dlc/", 200, r#"{"success": 2}"#)]).await;

        let outcome = store_catalog(&url)
            .list_dlc("https://store.steampowered.com/app/620/Portal_2/")
            .await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Decode);
    }

    #[tokio::test]
    async fn challenge_page_is_reported() {
        let (url, _hits) = mock_server(vec![route(
            "/search/",
            503,
            "<html><title>Just a moment...</title></html>",
        )])
        .await;

        let outcome = store_catalog(&url).search("portal").await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Challenge);
    }

    #[tokio::test]
    async fn closed_port_is_connection_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let url = format!("http://127.0.0.1:{port}");

        let outcome = store_catalog(&url).search("portal").await;
        assert_eq!(outcome.failure().unwrap().kind, FailureKind::Connection);
    }

    #[tokio::test]
    async fn dlc_failure_fails_whole_search() {
        let (url, _hits) = mock_server(vec![
            route("/search/results", 200, search_page()),
            route("/dlc/", 500, "boom"),
        ])
        .await;

        let outcome = store_catalog(&url).search("portal").await;
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Status);
        assert!(failure.detail.contains("500"));
    }

    #[tokio::test]
    async fn steamdb_source_reads_table() {
        let table = r#"<table>
            <tr class="app"><td>620</td><td>Game</td><td>Portal 2</td></tr>
            <tr class="app"><td>1</td><td>Unknown</td><td>Hidden</td></tr>
            <tr class="app"><td>323180</td><td>DLC</td><td>Portal 2 Sixense</td></tr>
        </table>"#;
        let (url, hits) = mock_server(vec![route("/search/", 200, table)]).await;

        let catalog = Catalog::new(CatalogSource::SteamDb)
            .unwrap()
            .with_base_urls(String::new(), url);
        assert_eq!(catalog.source(), CatalogSource::SteamDb);

        let games = catalog.search("portal").await.into_result().unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[1].kind, GameKind::Dlc);

        let hits = hits.lock().unwrap();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].contains("a=app"));
        assert!(hits[0].contains("q=portal"));
        assert!(hits[0].contains("type=-1"));
    }
}
