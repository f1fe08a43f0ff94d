//! Telegram update handlers.
//!
//! The handler only extracts chat/user identity and the message text; all
//! poll semantics live in `pollbot-core`.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use pollbot_core::{
    command::is_poll_command,
    domain::{ChatId, UserId},
    messaging::types::IncomingCommand,
};

use crate::router::AppState;

/// Build the core command for a message, or `None` if it is not for us.
pub fn incoming_command(msg: &Message) -> Option<IncomingCommand> {
    let text = msg.text()?;
    if !is_poll_command(text) {
        return None;
    }
    let user = msg.from()?;

    Some(IncomingCommand {
        chat_id: ChatId(msg.chat.id.0),
        user_id: UserId(user.id.0 as i64),
        username: user.username.clone(),
        text: text.to_string(),
    })
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(cmd) = incoming_command(&msg) else {
        return Ok(());
    };

    let chat_id = cmd.chat_id;
    if let Err(e) = state.poll_bot.handle(cmd).await {
        tracing::warn!(chat = %chat_id, "failed to deliver poll reply: {e}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> Message {
        serde_json::from_value(serde_json::json!({
            "message_id": 7,
            "date": 1_700_000_000,
            "chat": { "id": -1001, "type": "group", "title": "Lunch crew" },
            "from": { "id": 42, "is_bot": false, "first_name": "Ada", "username": "ada" },
            "text": text
        }))
        .unwrap()
    }

    #[test]
    fn poll_messages_become_commands() {
        let cmd = incoming_command(&message("!poll vote 2")).unwrap();
        assert_eq!(cmd.chat_id, ChatId(-1001));
        assert_eq!(cmd.user_id, UserId(42));
        assert_eq!(cmd.username.as_deref(), Some("ada"));
        assert_eq!(cmd.text, "!poll vote 2");
    }

    #[test]
    fn other_messages_are_ignored() {
        assert!(incoming_command(&message("hello there")).is_none());
        assert!(incoming_command(&message("!pollster")).is_none());
    }
}
