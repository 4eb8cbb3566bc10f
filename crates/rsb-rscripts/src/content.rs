use async_trait::async_trait;
use tracing::warn;

use rsb_core::{
    config::Config, ports::ContentSource, script::ContentRef, text::truncate_with_ellipsis,
};

pub const NO_CONTENT_REF: &str = "No raw script URL provided.";
pub const FETCH_FAILED: &str = "Error fetching script content.";
pub const DEFAULT_PREVIEW_LIMIT: usize = 900;

/// Fetches raw script bodies for card previews.
///
/// Every failure degrades to a fixed placeholder so a card can always render.
#[derive(Clone, Debug)]
pub struct RawContentFetcher {
    http: reqwest::Client,
    site_url: String,
    limit: usize,
}

impl RawContentFetcher {
    pub fn new(http: reqwest::Client, site_url: impl Into<String>, limit: usize) -> Self {
        Self {
            http,
            site_url: site_url.into(),
            limit,
        }
    }

    pub fn from_config(cfg: &Config, http: reqwest::Client) -> Self {
        Self::new(http, cfg.site_url.clone(), cfg.raw_preview_limit)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, String> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request error: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("status {}", resp.status()));
        }
        resp.text().await.map_err(|e| format!("body error: {e}"))
    }
}

#[async_trait]
impl ContentSource for RawContentFetcher {
    async fn fetch_preview(&self, reference: Option<&ContentRef>) -> String {
        let Some(reference) = reference else {
            return NO_CONTENT_REF.to_string();
        };
        let url = reference.resolve(&self.site_url);
        match self.fetch_text(&url).await {
            Ok(text) => truncate_with_ellipsis(&text, self.limit),
            Err(e) => {
                warn!(%url, error = %e, "failed to fetch raw script");
                FETCH_FAILED.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fetcher() -> RawContentFetcher {
        let http = crate::http_client(Duration::from_secs(2)).unwrap();
        RawContentFetcher::new(http, "http://127.0.0.1:9", DEFAULT_PREVIEW_LIMIT)
    }

    #[tokio::test]
    async fn absent_reference_yields_placeholder() {
        assert_eq!(fetcher().fetch_preview(None).await, NO_CONTENT_REF);
    }

    #[tokio::test]
    async fn failures_yield_placeholder() {
        let f = fetcher();
        let refs = [
            ContentRef::Download("abc".into()),
            ContentRef::Url("http://127.0.0.1:9/raw.lua".into()),
            ContentRef::Url("not a url".into()),
        ];
        for r in &refs {
            assert_eq!(f.fetch_preview(Some(r)).await, FETCH_FAILED, "{r:?}");
        }
    }

    #[tokio::test]
    async fn error_status_yields_placeholder() {
        let (base, _server) = crate::test_server::serve_once("404 Not Found", "gone").await;
        let r = ContentRef::Url(format!("{base}/raw.lua"));
        assert_eq!(fetcher().fetch_preview(Some(&r)).await, FETCH_FAILED);
    }

    #[tokio::test]
    async fn long_body_is_cut_to_the_preview_limit() {
        let body = "x".repeat(1_000);
        let (base, server) = crate::test_server::serve_once("200 OK", &body).await;
        let r = ContentRef::Download("abc".into());
        let http = crate::http_client(Duration::from_secs(2)).unwrap();
        let f = RawContentFetcher::new(http, base, DEFAULT_PREVIEW_LIMIT);

        let preview = f.fetch_preview(Some(&r)).await;
        assert_eq!(preview, format!("{}...", "x".repeat(900)));
        assert!(server.await.unwrap().starts_with("GET /raw/abc "));
    }
}
