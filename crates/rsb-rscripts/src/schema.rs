//! Wire shapes of the rscripts v2 API (`GET /scripts`).
//!
//! Only the flat `user` object is understood. Older responses carried `user`
//! as a single-element list; such values are logged and treated as absent.

use serde::Deserialize;

use rsb_core::script::{Author, ContentRef, Game, Script, SearchPage};

/// Response from GET /scripts
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScriptsResponse {
    #[serde(default)]
    pub scripts: Option<Vec<ScriptEntry>>,
    #[serde(default)]
    pub info: Option<PageInfo>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: Option<u32>,
    pub max_pages: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub user: Option<UserField>,
    pub game: Option<GameEntry>,

    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub dislikes: Option<i64>,

    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default)]
    pub universal: Option<bool>,
    #[serde(default)]
    pub key_system: Option<bool>,
    #[serde(default)]
    pub patched: Option<bool>,
    #[serde(default)]
    pub mobile_ready: Option<bool>,

    pub created_at: Option<String>,
    pub raw_script: Option<String>,
    pub download: Option<String>,
}

/// The `user` member as it may appear on the wire.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum UserField {
    Flat(UserEntry),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct UserEntry {
    pub username: Option<String>,
    pub image: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GameEntry {
    pub title: Option<String>,
    pub imgurl: Option<String>,
}

impl ScriptsResponse {
    /// Convert into the domain page for a request of `requested_page`.
    ///
    /// Zero scripts always yields [`SearchPage::empty`], whatever `info` says.
    pub fn into_page(self, requested_page: u32) -> SearchPage {
        let scripts: Vec<Script> = self
            .scripts
            .unwrap_or_default()
            .into_iter()
            .map(ScriptEntry::into_script)
            .collect();
        if scripts.is_empty() {
            return SearchPage::empty(requested_page);
        }

        let info = self.info.unwrap_or_default();
        let current_page = info.current_page.unwrap_or(requested_page).max(1);
        SearchPage {
            scripts,
            current_page,
            max_pages: info.max_pages.unwrap_or(current_page).max(1),
        }
    }
}

impl ScriptEntry {
    pub fn into_script(self) -> Script {
        let author = match self.user {
            Some(UserField::Flat(u)) => Some(Author {
                name: u.username,
                avatar_url: u.image,
                verified: u.verified.unwrap_or(false),
            }),
            Some(UserField::Other(v)) if !v.is_null() => {
                tracing::warn!(
                    script_id = %self.id,
                    shape = %json_kind(&v),
                    "unexpected `user` shape in search response; treating author as unknown"
                );
                None
            }
            _ => None,
        };

        Script {
            content: ContentRef::from_parts(self.raw_script, self.download),
            id: self.id,
            title: self.title,
            slug: self.slug,
            description: self.description,
            author,
            game: self.game.map(|g| Game {
                title: g.title,
                image_url: g.imgurl,
            }),
            image_url: self.image,
            views: self.views,
            likes: self.likes,
            dislikes: self.dislikes,
            paid: self.paid.unwrap_or(false),
            universal: self.universal.unwrap_or(false),
            key_required: self.key_system.unwrap_or(false),
            patched: self.patched.unwrap_or(false),
            mobile_ready: self.mobile_ready.unwrap_or(false),
            created_at: self.created_at,
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
