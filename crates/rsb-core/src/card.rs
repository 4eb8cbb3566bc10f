//! Card rendering: one search result as a structured, messenger-agnostic payload.

use chrono::{DateTime, Utc};

use crate::{
    script::Script,
    text::{strip_html, truncate_with_ellipsis},
};

pub const DEFAULT_AUTHOR_ICON: &str = "https://img.getimg.ai/generated/img-u1vYyfAtK7GTe9OK1BzeH.jpeg";
pub const DEFAULT_THUMBNAIL: &str = "https://media1.tenor.com/m/j9Jhn5M1Xw0AAAAd/neuro-sama-ai.gif";
pub const CARD_COLOR: u32 = 0x0099ff;
pub const DESCRIPTION_LIMIT: usize = 200;

const NOT_AVAILABLE: &str = "N/A";

/// Base URLs used to build links on a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteLinks {
    pub site_url: String,
}

impl SiteLinks {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn script_page(&self, script: &Script) -> String {
        format!("{}/script/{}", self.site_url, script.page_key())
    }

    pub fn raw_content(&self, script: &Script) -> Option<String> {
        script.content.as_ref().map(|c| c.resolve(&self.site_url))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardAuthor {
    pub name: String,
    pub icon_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardLink {
    pub label: String,
    pub url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Code { language: String, body: String },
    Links(Vec<CardLink>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardField {
    pub name: String,
    pub value: FieldValue,
    pub inline: bool,
}

impl CardField {
    fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::Text(value.into()),
            inline: true,
        }
    }
}

/// A rendered result. Always rebuilt from scratch on a page change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub url: String,
    pub author: CardAuthor,
    pub thumbnail_url: String,
    pub description: String,
    pub fields: Vec<CardField>,
    pub footer: String,
    pub color: u32,
}

impl Card {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }
}

/// Description as shown on a card: markup stripped, capped at `limit` chars plus `...`.
pub fn card_description(raw: Option<&str>, limit: usize) -> String {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => "No description available",
    };
    truncate_with_ellipsis(&strip_html(raw), limit)
}

/// Map one script plus its fetched content to a card. Pure: no I/O.
pub fn render_card(
    script: &Script,
    content: &str,
    page: u32,
    max_pages: u32,
    links: &SiteLinks,
) -> Card {
    render_card_with_limit(script, content, page, max_pages, links, DESCRIPTION_LIMIT)
}

pub fn render_card_with_limit(
    script: &Script,
    content: &str,
    page: u32,
    max_pages: u32,
    links: &SiteLinks,
    description_limit: usize,
) -> Card {
    let author = script.author.clone().unwrap_or_default();
    let game = script.game.clone().unwrap_or_default();

    let verified = author.verified;
    let author = CardAuthor {
        name: non_blank(author.name).unwrap_or_else(|| "Unknown".to_string()),
        icon_url: non_blank(author.avatar_url).unwrap_or_else(|| DEFAULT_AUTHOR_ICON.to_string()),
    };

    let game_title = non_blank(game.title)
        .or_else(|| non_blank(script.title.clone()))
        .unwrap_or_else(|| "Universal Script".to_string());

    let thumbnail_url = non_blank(game.image_url)
        .or_else(|| non_blank(script.image_url.clone()))
        .unwrap_or_else(|| DEFAULT_THUMBNAIL.to_string());

    let page_url = links.script_page(script);

    let fields = vec![
        CardField::text("Game", game_title),
        CardField::text("Verified", flag(verified, "✔️ Verified", "❌ Not Verified")),
        CardField::text("Script Type", flag(script.paid, "Paid", "Free")),
        CardField::text("Universal", flag(script.universal, "✔️ Universal", "❌ Not Universal")),
        CardField::text("Views", counter(script.views)),
        CardField::text("Likes", counter(script.likes)),
        CardField::text("Dislikes", counter(script.dislikes)),
        CardField::text("Key", flag(script.key_required, "🔑 Requires Key", "🆓 No Key")),
        CardField::text("Patched", flag(script.patched, "❌ Patched", "✔️ Not Patched")),
        CardField::text(
            "Mobile Ready",
            flag(script.mobile_ready, "✔️ Mobile Ready", "❌ Not Mobile Ready"),
        ),
        CardField::text("Created At", created_at(script.created_at.as_deref())),
        CardField {
            name: "The Script".to_string(),
            value: FieldValue::Code {
                language: "lua".to_string(),
                body: content.to_string(),
            },
            inline: false,
        },
        CardField {
            name: "Links".to_string(),
            value: FieldValue::Links(vec![
                CardLink {
                    label: "Raw Script".to_string(),
                    url: links.raw_content(script),
                },
                CardLink {
                    label: "Script Page".to_string(),
                    url: Some(page_url.clone()),
                },
            ]),
            inline: false,
        },
    ];

    Card {
        title: non_blank(script.title.clone()).unwrap_or_else(|| "No Title".to_string()),
        url: page_url,
        author,
        thumbnail_url,
        description: card_description(script.description.as_deref(), description_limit),
        fields,
        footer: format!("Page {page} of {max_pages}"),
        color: CARD_COLOR,
    }
}

fn flag(on: bool, yes: &str, no: &str) -> String {
    let s = if on { yes } else { no };
    s.to_string()
}

fn counter(v: Option<i64>) -> String {
    v.map(|n| n.to_string()).unwrap_or_else(|| "0".to_string())
}

fn created_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.trim().is_empty()) else {
        return NOT_AVAILABLE.to_string();
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&Utc)
            .format("%Y-%m-%d %H:%M UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Author, ContentRef, Game};

    fn links() -> SiteLinks {
        SiteLinks::new("https://rscripts.net/")
    }

    fn text_field<'a>(card: &'a Card, name: &str) -> &'a str {
        match card.field(name) {
            Some(FieldValue::Text(v)) => v,
            other => panic!("field {name} is not text: {other:?}"),
        }
    }

    #[test]
    fn bare_script_falls_back_to_defaults() {
        let script = Script {
            id: "66f0".into(),
            ..Default::default()
        };
        let card = render_card(&script, "print(1)", 1, 1, &links());

        assert_eq!(card.title, "No Title");
        assert_eq!(card.url, "https://rscripts.net/script/66f0");
        assert_eq!(card.author.name, "Unknown");
        assert_eq!(card.author.icon_url, DEFAULT_AUTHOR_ICON);
        assert_eq!(card.thumbnail_url, DEFAULT_THUMBNAIL);
        assert_eq!(card.description, "No description available");
        assert_eq!(text_field(&card, "Game"), "Universal Script");
        assert_eq!(text_field(&card, "Views"), "0");
        assert_eq!(text_field(&card, "Likes"), "0");
        assert_eq!(text_field(&card, "Dislikes"), "0");
        assert_eq!(text_field(&card, "Created At"), "N/A");
        assert_eq!(text_field(&card, "Key"), "🆓 No Key");
        assert_eq!(card.footer, "Page 1 of 1");

        for f in &card.fields {
            if let FieldValue::Text(v) = &f.value {
                assert!(!v.trim().is_empty(), "field {} left blank", f.name);
            }
        }

        match card.field("Links") {
            Some(FieldValue::Links(l)) => {
                assert_eq!(l[0].url, None);
                assert_eq!(l[1].url.as_deref(), Some("https://rscripts.net/script/66f0"));
            }
            other => panic!("unexpected links field: {other:?}"),
        }
    }

    #[test]
    fn populated_script_maps_every_field() {
        let script = Script {
            id: "66f0".into(),
            title: Some("Arceus X Hub".into()),
            slug: Some("arceus-x-hub".into()),
            description: Some("<p>Best <b>hub</b></p>".into()),
            author: Some(Author {
                name: Some("dev".into()),
                avatar_url: Some("https://img/dev.png".into()),
                verified: true,
            }),
            game: Some(Game {
                title: Some("Blox Fruits".into()),
                image_url: Some("https://img/bf.png".into()),
            }),
            image_url: Some("https://img/script.png".into()),
            views: Some(1200),
            likes: Some(40),
            dislikes: Some(2),
            paid: true,
            universal: false,
            key_required: true,
            patched: false,
            mobile_ready: true,
            created_at: Some("2024-05-01T13:45:10.000Z".into()),
            content: Some(ContentRef::Download("abc".into())),
        };
        let card = render_card(&script, "loadstring()", 2, 5, &links());

        assert_eq!(card.title, "Arceus X Hub");
        assert_eq!(card.url, "https://rscripts.net/script/arceus-x-hub");
        assert_eq!(card.author.name, "dev");
        assert_eq!(card.thumbnail_url, "https://img/bf.png");
        assert_eq!(card.description, "Best hub");
        assert_eq!(text_field(&card, "Game"), "Blox Fruits");
        assert_eq!(text_field(&card, "Verified"), "✔️ Verified");
        assert_eq!(text_field(&card, "Script Type"), "Paid");
        assert_eq!(text_field(&card, "Views"), "1200");
        assert_eq!(text_field(&card, "Key"), "🔑 Requires Key");
        assert_eq!(text_field(&card, "Patched"), "✔️ Not Patched");
        assert_eq!(text_field(&card, "Created At"), "2024-05-01 13:45 UTC");
        assert_eq!(card.footer, "Page 2 of 5");
        assert_eq!(
            card.field("The Script"),
            Some(&FieldValue::Code {
                language: "lua".into(),
                body: "loadstring()".into()
            })
        );
        match card.field("Links") {
            Some(FieldValue::Links(l)) => {
                assert_eq!(l[0].url.as_deref(), Some("https://rscripts.net/raw/abc"))
            }
            other => panic!("unexpected links field: {other:?}"),
        }
    }

    #[test]
    fn game_title_falls_back_to_script_title() {
        let script = Script {
            id: "1".into(),
            title: Some("Fly GUI".into()),
            game: Some(Game::default()),
            created_at: Some("last tuesday".into()),
            ..Default::default()
        };
        let card = render_card(&script, "", 1, 1, &links());
        assert_eq!(text_field(&card, "Game"), "Fly GUI");
        assert_eq!(text_field(&card, "Created At"), "last tuesday");
    }

    #[test]
    fn description_is_bounded_and_tag_free() {
        let inputs = [
            String::new(),
            "<p>short</p>".to_string(),
            format!("<div>{}</div>", "word ".repeat(120)),
            format!("<ul>{}</ul>", "<li>é item</li>".repeat(80)),
            "x".repeat(200),
            "y".repeat(201),
            "<b>unclosed <i>".repeat(50),
        ];
        for input in &inputs {
            let out = card_description(Some(input), DESCRIPTION_LIMIT);
            assert!(out.chars().count() <= DESCRIPTION_LIMIT + 3, "too long: {out}");
            assert!(!out.contains('<') && !out.contains('>'), "markup left: {out}");
        }
        assert_eq!(card_description(Some(&"x".repeat(200)), 200), "x".repeat(200));
        assert_eq!(
            card_description(Some(&"y".repeat(201)), 200),
            format!("{}...", "y".repeat(200))
        );
    }
}
