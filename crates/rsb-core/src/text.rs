//! Plain-text helpers: HTML stripping and length capping.

use scraper::Html;

pub const ELLIPSIS: &str = "...";

/// Reduce HTML markup to its text content.
///
/// Text nodes are concatenated as they appear in the document and whitespace
/// runs are collapsed to single spaces.
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return collapse_whitespace(html);
    }
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cap `text` at `limit` characters, appending `...` when anything was cut.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_decodes_entities() {
        assert_eq!(
            strip_html("<p>Auto <b>farm</b> &amp; teleport</p>\n<br/><p>v2</p>"),
            "Auto farm & teleport v2"
        );
        assert_eq!(strip_html("no markup\n\n here"), "no markup here");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn strips_unbalanced_markup() {
        let out = strip_html("<div><span>open <i>never closed");
        assert_eq!(out, "open never closed");
        assert!(!out.contains('<'));
    }

    #[test]
    fn encoded_markup_stays_text() {
        // Entities decode to literal characters, never to live tags.
        let out = strip_html("&lt;b&gt;bold&lt;/b&gt; claim");
        assert_eq!(out, "<b>bold</b> claim");

        let rendered = crate::formatting::escape_html(&out);
        assert_eq!(rendered, "&lt;b&gt;bold&lt;/b&gt; claim");
        assert!(!rendered.contains('<'));
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
        assert_eq!(truncate_with_ellipsis("", 0), "");
        // Multi-byte characters count as one.
        assert_eq!(truncate_with_ellipsis("ééééé", 2), "éé...");
    }
}
