//! rscripts adapter: script search and raw content over HTTP.
//!
//! Implements the `rsb-core` search and content ports against the public
//! rscripts v2 API.

use std::time::Duration;

use async_trait::async_trait;

use rsb_core::{
    config::Config,
    errors::Error,
    ports::ScriptSearch,
    script::SearchPage,
    Result,
};

pub mod content;
pub mod schema;
#[cfg(test)]
mod test_server;

pub use content::RawContentFetcher;

use schema::ScriptsResponse;

/// Build the shared HTTP client used by both adapters.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("rsb/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::External(format!("http client build error: {e}")))
}

#[derive(Clone, Debug)]
pub struct RscriptsClient {
    http: reqwest::Client,
    api_base_url: String,
}

impl RscriptsClient {
    pub fn new(http: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        Self {
            http,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(cfg: &Config, http: reqwest::Client) -> Self {
        Self::new(http, cfg.api_base_url.clone())
    }

    pub fn scripts_url(&self) -> String {
        format!("{}/scripts", self.api_base_url)
    }

    /// Query parameters for one page of `query`, newest first.
    pub fn search_params(query: &str, page: u32) -> [(&'static str, String); 4] {
        [
            ("q", query.to_string()),
            ("page", page.to_string()),
            ("orderBy", "date".to_string()),
            ("sort", "desc".to_string()),
        ]
    }
}

#[async_trait]
impl ScriptSearch for RscriptsClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let resp = self
            .http
            .get(self.scripts_url())
            .query(&Self::search_params(query, page))
            .send()
            .await
            .map_err(|e| Error::External(format!("rscripts request error: {e}")))?;

        if !resp.status().is_success() {
            return Err(Error::ApiStatus {
                status: resp.status().as_u16(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::External(format!("rscripts body error: {e}")))?;
        let body: ScriptsResponse = serde_json::from_slice(&bytes)?;

        let page = body.into_page(page);
        tracing::debug!(
            query,
            page = page.current_page,
            max_pages = page.max_pages,
            results = page.scripts.len(),
            "rscripts search"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve_once;

    fn client(base: &str) -> RscriptsClient {
        let http = http_client(Duration::from_secs(2)).unwrap();
        RscriptsClient::new(http, format!("{base}/api/v2"))
    }

    #[test]
    fn builds_search_request() {
        let client = RscriptsClient::new(reqwest::Client::new(), "https://rscripts.net/api/v2/");
        assert_eq!(client.scripts_url(), "https://rscripts.net/api/v2/scripts");

        let req = client
            .http
            .get(client.scripts_url())
            .query(&RscriptsClient::search_params("arceus x & co", 3))
            .build()
            .unwrap();
        assert_eq!(
            req.url().as_str(),
            "https://rscripts.net/api/v2/scripts?q=arceus+x+%26+co&page=3&orderBy=date&sort=desc"
        );
    }

    #[tokio::test]
    async fn unreachable_api_is_an_error() {
        let http = http_client(Duration::from_secs(2)).unwrap();
        let client = RscriptsClient::new(http, "http://127.0.0.1:9/api/v2");
        let err = client.search("fly", 1).await.unwrap_err();
        assert!(matches!(err, Error::External(_)), "{err}");
    }

    #[tokio::test]
    async fn error_status_is_reported_as_api_status() {
        let (base, _server) = serve_once("503 Service Unavailable", "down").await;
        let err = client(&base).search("fly", 1).await.unwrap_err();
        assert!(matches!(err, Error::ApiStatus { status: 503 }), "{err}");
    }

    #[tokio::test]
    async fn empty_script_list_is_an_empty_page() {
        let (base, server) = serve_once("200 OK", r#"{"scripts":[]}"#).await;
        let page = client(&base).search("fly hub", 2).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.current_page, 2);

        let head = server.await.unwrap();
        assert!(
            head.starts_with("GET /api/v2/scripts?q=fly+hub&page=2&orderBy=date&sort=desc "),
            "{head}"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_json_error() {
        let (base, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let err = client(&base).search("fly", 1).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)), "{err}");
    }
}
