use async_trait::async_trait;

use crate::{
    card::Card,
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Cross-messenger port.
///
/// Telegram is the first implementation; cards and keyboards are passed in
/// their generic form and each adapter decides how to draw them.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn send_card(
        &self,
        chat_id: ChatId,
        card: &Card,
        keyboard: &InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_card(&self, msg: MessageRef, card: &Card, keyboard: &InlineKeyboard)
        -> Result<()>;

    /// Remove every interactive control from a previously sent message.
    async fn clear_keyboard(&self, msg: MessageRef) -> Result<()>;

    /// Acknowledge an interaction. With `notice`, the text is shown only to the presser.
    async fn answer_callback_query(&self, callback_id: &str, notice: Option<&str>) -> Result<()>;
}
