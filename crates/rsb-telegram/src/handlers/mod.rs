//! Telegram update handlers.
//!
//! Each handler is a small adapter that turns a teloxide update into an
//! `rsb-core` command or callback and hands it to the search controller.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};

use crate::router::AppState;
mod callback;
mod commands;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    callback::handle_callback(bot, q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };
    if user.is_bot {
        return Ok(());
    }

    let Some(query) = msg.text().and_then(commands::parse_search_command) else {
        return Ok(());
    };

    commands::handle_search(&msg, query, state).await
}
