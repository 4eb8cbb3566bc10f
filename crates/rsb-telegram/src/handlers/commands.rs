use std::sync::Arc;

use teloxide::prelude::*;
use tracing::debug;

use rsb_core::{
    domain::{ChatId, UserId},
    messaging::types::Command,
};

use crate::router::AppState;

/// Extract the query of a search command.
///
/// Accepts `!search <query>`, `/search <query>` and `/search@botname <query>`.
/// Returns `Some("")` for a bare command so the caller can ask for a query.
pub(crate) fn parse_search_command(text: &str) -> Option<String> {
    let text = text.trim_start();
    let (head, rest) = match text.find(char::is_whitespace) {
        Some(i) => text.split_at(i),
        None => (text, ""),
    };

    let name = if let Some(name) = head.strip_prefix('!') {
        name
    } else if let Some(name) = head.strip_prefix('/') {
        // Telegram may send `/cmd@botname arg1 ...`
        name.split('@').next().unwrap_or("")
    } else {
        return None;
    };

    if !name.eq_ignore_ascii_case("search") {
        return None;
    }
    Some(rest.trim().to_string())
}

pub(crate) async fn handle_search(
    msg: &Message,
    query: String,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    let cmd = Command {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        args: query,
    };

    let outcome = state.controller.handle_command(&cmd).await;
    debug!(chat_id = cmd.chat_id.0, ?outcome, "search command handled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bang_and_slash_forms() {
        assert_eq!(parse_search_command("!search arceus x"), Some("arceus x".into()));
        assert_eq!(parse_search_command("  !search   fly gui  "), Some("fly gui".into()));
        assert_eq!(parse_search_command("/search@rsb_bot hub"), Some("hub".into()));
        assert_eq!(parse_search_command("/SEARCH hub"), Some("hub".into()));
    }

    #[test]
    fn bare_command_yields_empty_query() {
        assert_eq!(parse_search_command("!search"), Some(String::new()));
        assert_eq!(parse_search_command("!search    "), Some(String::new()));
    }

    #[test]
    fn ignores_other_text() {
        assert_eq!(parse_search_command("search arceus"), None);
        assert_eq!(parse_search_command("!searching arceus"), None);
        assert_eq!(parse_search_command("/start"), None);
        assert_eq!(parse_search_command(""), None);
    }
}
