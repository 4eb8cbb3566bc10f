use crate::domain::{ChatId, MessageRef, UserId};

/// A search command addressed to the bot; `args` is everything after the command word.
#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub args: String,
}

/// A button press on a message the bot sent earlier.
#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub user_id: UserId,
    pub username: Option<String>,
    pub callback_id: String,
    pub data: String,
    pub message: Option<MessageRef>,
}

/// Inline keyboard (buttons) attached to a card.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
    /// Disabled buttons are drawn but do nothing when pressed.
    pub enabled: bool,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>, enabled: bool) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
            enabled,
        }
    }
}

impl InlineKeyboard {
    pub fn single_row(buttons: Vec<InlineButton>) -> Self {
        Self {
            rows: vec![buttons],
        }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }

    pub fn find(&self, callback_data: &str) -> Option<&InlineButton> {
        self.buttons().find(|b| b.callback_data == callback_data)
    }
}
