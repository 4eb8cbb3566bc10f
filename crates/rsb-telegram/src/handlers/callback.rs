use std::sync::Arc;

use teloxide::prelude::*;
use tracing::debug;

use rsb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::CallbackQuery as NavPress,
};

use crate::router::AppState;

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let data = q.data.clone().unwrap_or_default();

    // Presses on inline-mode messages carry no message; nothing of ours lives there.
    let Some(message) = q.message.as_ref() else {
        let _ = bot.answer_callback_query(q.id.clone()).await;
        return Ok(());
    };

    let chat_id = ChatId(message.chat.id.0);
    let press = NavPress {
        user_id: UserId(q.from.id.0 as i64),
        username: q.from.username.clone(),
        callback_id: q.id.clone(),
        data,
        message: Some(MessageRef {
            chat_id,
            message_id: MessageId(message.id.0),
        }),
    };

    let outcome = state.controller.handle_callback(&press).await;
    debug!(
        chat_id = chat_id.0,
        user_id = press.user_id.0,
        data = %press.data,
        ?outcome,
        "callback handled"
    );
    Ok(())
}
