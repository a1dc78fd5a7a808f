use std::sync::Arc;

use archivebot_core::{bot::ArchiveBot, config::Config, logging};
use archivebot_slack::SlackClient;

#[tokio::main]
async fn main() -> Result<(), archivebot_core::Error> {
    let cfg = Arc::new(Config::load()?);
    logging::init("archivebot", cfg.debug);

    let slack = Arc::new(SlackClient::new(cfg.slack_token.clone(), cfg.debug));
    let bot = ArchiveBot::new(Arc::clone(&cfg), slack);

    if let Err(e) = bot.run().await {
        tracing::error!("archive run failed: {e}");
        return Err(e);
    }

    Ok(())
}
