use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use pollbot_core::{
    audit::AuditLogger, bot::PollBot, config::Config, messaging::port::MessagingPort,
    store::PollStore,
};

use crate::handlers;
use crate::TelegramMessenger;

pub struct AppState {
    pub poll_bot: PollBot,
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    match bot.get_me().await {
        Ok(me) => tracing::info!("pollbot started: @{}", me.username()),
        Err(e) => tracing::warn!("get_me failed: {e}"),
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(
        bot.clone(),
        cfg.telegram_message_limit,
    ));
    let audit = cfg
        .audit_log_path
        .as_ref()
        .map(|path| AuditLogger::new(path.clone(), cfg.audit_log_json));
    if let Some(audit) = &audit {
        tracing::info!("audit log: {}", audit.path().display());
    }

    let state = Arc::new(AppState {
        poll_bot: PollBot::new(Arc::new(PollStore::new()), messenger).with_audit(audit),
    });

    let handler =
        dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
