//! Orchestration of the two archival pipelines over one channel snapshot.

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    activity::inactive_channels,
    archive::Archiver,
    config::Config,
    directory::DirectoryPort,
    domain::{ArchivalReason, Channel},
    filter::{empty_channels, filter_whitelisted},
    Result,
};

/// One single-shot archival run over the whole workspace.
pub struct ArchiveBot {
    cfg: Arc<Config>,
    port: Arc<dyn DirectoryPort>,
}

impl ArchiveBot {
    pub fn new(cfg: Arc<Config>, port: Arc<dyn DirectoryPort>) -> Self {
        Self { cfg, port }
    }

    /// List, filter, and run both pipelines concurrently.
    ///
    /// A listing failure aborts the whole run before any pipeline starts;
    /// everything after that point is best-effort and isolated per channel.
    /// The two pipelines select independently from the same whitelisted
    /// snapshot and are not deduplicated: a channel that is both empty and
    /// inactive is processed by both.
    pub async fn run(&self) -> Result<()> {
        let channels = self.port.list_channels(true).await?;
        info!("loaded {} channels from the directory", channels.len());

        let channels = filter_whitelisted(channels, &self.cfg.whitelist);

        tokio::join!(self.run_empties(&channels), self.run_inactives(&channels));
        Ok(())
    }

    async fn run_empties(&self, channels: &[Channel]) {
        if self.cfg.skip_empties {
            info!("skipping empty-channel archival (ARCHIVEBOT_NO_EMPTIES is set)");
            return;
        }

        let selected = empty_channels(channels);
        self.archiver()
            .archive_channels(selected, ArchivalReason::Emptiness, &self.cfg.empty_notice)
            .await;
    }

    async fn run_inactives(&self, channels: &[Channel]) {
        if self.cfg.skip_inactives {
            info!("skipping inactive-channel archival (ARCHIVEBOT_NO_INACTIVES is set)");
            return;
        }

        self.announce_debug_run().await;

        let selected =
            inactive_channels(Arc::clone(&self.port), channels, self.cfg.inactive_days).await;
        self.archiver()
            .archive_channels(
                selected,
                ArchivalReason::Inactivity,
                &self.cfg.inactive_notice,
            )
            .await;
    }

    /// Debug-mode heads-up to the operator before the inactivity pass.
    async fn announce_debug_run(&self) {
        let Some(target) = self.cfg.notify_target.as_deref() else {
            return;
        };
        if !self.cfg.debug {
            return;
        }

        let text = format!(
            "Archiving channels inactive for more than {} days.",
            self.cfg.inactive_days
        );
        if let Err(e) = self.port.post_message(target, &text, None, false).await {
            error!("posting debug announcement failed: {e}");
        }
    }

    fn archiver(&self) -> Archiver {
        Archiver::new(Arc::clone(&self.port), self.cfg.notify_target.clone())
    }
}
