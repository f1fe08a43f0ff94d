use std::sync::Arc;

use pollbot_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pollbot_core::logging::init("pollbot")?;

    let cfg = Arc::new(Config::load()?);

    pollbot_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| anyhow::anyhow!("telegram bot failed: {e}"))?;

    Ok(())
}
