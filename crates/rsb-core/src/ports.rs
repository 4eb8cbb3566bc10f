use async_trait::async_trait;

use crate::{
    script::{ContentRef, SearchPage},
    Result,
};

/// Hexagonal port for the remote script search API.
#[async_trait]
pub trait ScriptSearch: Send + Sync {
    /// Fetch one page of results for `query` (pages are 1-based).
    ///
    /// Zero matches is a successful, empty [`SearchPage`]; transport failures and
    /// non-success statuses are errors. Implementations do not retry.
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage>;
}

/// Hexagonal port for fetching the raw body a script points at.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Preview text for a card. Never fails: every failure path yields a placeholder.
    async fn fetch_preview(&self, reference: Option<&ContentRef>) -> String;
}
