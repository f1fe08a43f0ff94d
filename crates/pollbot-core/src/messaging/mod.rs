//! Cross-messenger abstractions (Telegram today; other chats later).

pub mod port;
pub mod types;
