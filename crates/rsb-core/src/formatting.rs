//! Formatting utilities (cards → Telegram HTML).

use crate::card::{Card, CardLink, FieldValue};

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a card as Telegram HTML.
///
/// Telegram has no embeds, so the thumbnail rides on an invisible leading link:
/// the client shows it as the message's link preview. Inline fields are laid
/// out one per line; code and link fields get their own blocks.
pub fn card_to_html(card: &Card) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "<a href=\"{}\">\u{200B}</a><b><a href=\"{}\">{}</a></b>\n",
        escape_html(&card.thumbnail_url),
        escape_html(&card.url),
        escape_html(&card.title),
    ));
    out.push_str(&format!(
        "👤 <a href=\"{}\">{}</a>\n\n",
        escape_html(&card.author.icon_url),
        escape_html(&card.author.name),
    ));
    out.push_str(&format!("<i>{}</i>\n\n", escape_html(&card.description)));

    for field in card.fields.iter().filter(|f| f.inline) {
        if let FieldValue::Text(v) = &field.value {
            out.push_str(&format!("<b>{}:</b> {}\n", escape_html(&field.name), escape_html(v)));
        }
    }

    for field in card.fields.iter().filter(|f| !f.inline) {
        out.push('\n');
        out.push_str(&format!("<b>{}</b>\n", escape_html(&field.name)));
        match &field.value {
            FieldValue::Text(v) => out.push_str(&escape_html(v)),
            FieldValue::Code { language, body } => out.push_str(&format!(
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(language),
                escape_html(body),
            )),
            FieldValue::Links(links) => out.push_str(
                &links
                    .iter()
                    .map(link_to_html)
                    .collect::<Vec<_>>()
                    .join(" - "),
            ),
        }
        out.push('\n');
    }

    out.push_str(&format!("\n<i>{}</i>", escape_html(&card.footer)));
    out
}

fn link_to_html(link: &CardLink) -> String {
    match &link.url {
        Some(url) => format!(
            "<a href=\"{}\">{}</a>",
            escape_html(url),
            escape_html(&link.label)
        ),
        None => format!("{}: N/A", escape_html(&link.label)),
    }
}
