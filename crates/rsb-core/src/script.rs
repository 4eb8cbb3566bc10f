//! Search results as the rest of the bot sees them.
//!
//! Adapters convert their wire shapes into these types; nothing here knows
//! about JSON field names.

/// Where the raw body of a script lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentRef {
    /// Direct URL to the raw text.
    Url(String),
    /// Opaque download id, served from `<site>/raw/<id>`.
    Download(String),
}

impl ContentRef {
    /// Pick the content reference for a script: a direct URL wins over a download id.
    pub fn from_parts(raw_url: Option<String>, download_id: Option<String>) -> Option<Self> {
        let non_blank = |s: String| if s.trim().is_empty() { None } else { Some(s) };
        raw_url
            .and_then(non_blank)
            .map(ContentRef::Url)
            .or_else(|| download_id.and_then(non_blank).map(ContentRef::Download))
    }

    pub fn resolve(&self, site_url: &str) -> String {
        match self {
            ContentRef::Url(url) => url.clone(),
            ContentRef::Download(id) => format!("{}/raw/{id}", site_url.trim_end_matches('/')),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Author {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub verified: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game {
    pub title: Option<String>,
    pub image_url: Option<String>,
}

/// One script record returned by a search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    /// HTML markup as stored by the site.
    pub description: Option<String>,
    pub author: Option<Author>,
    pub game: Option<Game>,
    pub image_url: Option<String>,

    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub dislikes: Option<i64>,

    pub paid: bool,
    pub universal: bool,
    pub key_required: bool,
    pub patched: bool,
    pub mobile_ready: bool,

    /// Creation timestamp as reported (RFC 3339 in practice).
    pub created_at: Option<String>,
    pub content: Option<ContentRef>,
}

impl Script {
    /// Path segment used for the script page: slug when present, id otherwise.
    pub fn page_key(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.trim().is_empty() => slug,
            _ => &self.id,
        }
    }
}

/// One page of search results plus the pagination metadata reported with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPage {
    pub scripts: Vec<Script>,
    pub current_page: u32,
    pub max_pages: u32,
}

impl SearchPage {
    /// The reply for a query with no matches on `page`.
    pub fn empty(page: u32) -> Self {
        Self {
            scripts: Vec::new(),
            current_page: page,
            max_pages: page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn first(&self) -> Option<&Script> {
        self.scripts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_url_wins_over_download_id() {
        let r = ContentRef::from_parts(Some("https://x/raw.lua".into()), Some("abc".into()));
        assert_eq!(r, Some(ContentRef::Url("https://x/raw.lua".into())));

        let r = ContentRef::from_parts(Some("  ".into()), Some("abc".into()));
        assert_eq!(r, Some(ContentRef::Download("abc".into())));

        assert_eq!(ContentRef::from_parts(None, Some(String::new())), None);
    }

    #[test]
    fn download_id_resolves_against_site() {
        let r = ContentRef::Download("abc123".into());
        assert_eq!(r.resolve("https://rscripts.net/"), "https://rscripts.net/raw/abc123");
        let r = ContentRef::Url("https://cdn/x.lua".into());
        assert_eq!(r.resolve("https://rscripts.net"), "https://cdn/x.lua");
    }

    #[test]
    fn page_key_falls_back_to_id() {
        let mut s = Script {
            id: "66aa".into(),
            ..Default::default()
        };
        assert_eq!(s.page_key(), "66aa");
        s.slug = Some("infinite-yield".into());
        assert_eq!(s.page_key(), "infinite-yield");
    }
}
