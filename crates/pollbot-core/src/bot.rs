use std::sync::Arc;

use crate::{
    audit::{AuditEvent, AuditLogger},
    command::PollCommand,
    messaging::{
        port::MessagingPort,
        types::{split_text_chunks, IncomingCommand},
    },
    store::{PollResult, PollStore},
    Result,
};

/// Command adapter: turns `!poll ...` messages into store operations and
/// relays the resulting text back to the chat.
///
/// Each chat is one room; each chat user id is one voter.
pub struct PollBot {
    store: Arc<PollStore>,
    messenger: Arc<dyn MessagingPort>,
    audit: Option<AuditLogger>,
}

impl PollBot {
    pub fn new(store: Arc<PollStore>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            store,
            messenger,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: Option<AuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn store(&self) -> &Arc<PollStore> {
        &self.store
    }

    fn dispatch(
        &self,
        room_id: &str,
        user_id: &str,
        text: &str,
    ) -> (Option<&'static str>, PollResult) {
        match PollCommand::parse(text) {
            Ok(cmd) => (Some(cmd.name()), cmd.execute(&self.store, room_id, user_id)),
            // Bad arguments never reach the store.
            Err(e) => (None, Err(e)),
        }
    }

    /// Text in, text out. Success and failure both come back as reply text.
    pub fn reply_for(&self, room_id: &str, user_id: &str, text: &str) -> String {
        match self.dispatch(room_id, user_id, text).1 {
            Ok(reply) => reply,
            Err(e) => e.to_string(),
        }
    }

    /// Run one command and send the reply to its chat. Returns the reply text.
    pub async fn handle(&self, cmd: IncomingCommand) -> Result<String> {
        let room_id = cmd.chat_id.to_string();
        let user_id = cmd.user_id.to_string();

        let (name, result) = self.dispatch(&room_id, &user_id, &cmd.text);
        let accepted = result.is_ok();
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!(room = %room_id, reason = ?e, "poll command rejected");
                e.to_string()
            }
        };
        tracing::info!(
            room = %room_id,
            user = %user_id,
            command = name.unwrap_or("invalid"),
            accepted,
            "poll command handled"
        );

        if let Some(audit) = &self.audit {
            let event = AuditEvent::poll_command(
                cmd.chat_id.0,
                cmd.user_id.0,
                cmd.username.as_deref(),
                &cmd.text,
                name,
                &reply,
                accepted,
            );
            if let Err(e) = audit.write(event) {
                tracing::warn!("failed to write audit event: {e}");
            }
        }

        let limit = self.messenger.capabilities().max_message_len;
        for chunk in split_text_chunks(&reply, limit) {
            if let Err(e) = self.messenger.send_text(cmd.chat_id, &chunk).await {
                if let Some(audit) = &self.audit {
                    let _ = audit.write(AuditEvent::error(
                        cmd.chat_id.0,
                        cmd.user_id.0,
                        cmd.username.as_deref(),
                        &e.to_string(),
                    ));
                }
                return Err(e);
            }
        }

        Ok(reply)
    }
}
