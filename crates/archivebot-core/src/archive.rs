//! Concurrent archival of a selection set, with best-effort notices and
//! operator failure reports.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::{
    directory::{Attachment, DirectoryPort},
    domain::{ArchivalReason, Channel},
};

/// Fixed pretext label on every pre-archive notice.
pub const NOTICE_PRETEXT: &str = "Attention channel members:";

/// Executes archival for one selection set.
pub struct Archiver {
    port: Arc<dyn DirectoryPort>,
    notify_target: Option<String>,
}

impl Archiver {
    pub fn new(port: Arc<dyn DirectoryPort>, notify_target: Option<String>) -> Self {
        Self {
            port,
            notify_target,
        }
    }

    /// Archive every channel in `selected`, concurrently.
    ///
    /// Per channel: post the notice (best-effort), then archive; an archive
    /// failure is reported to the notify target when one is configured.
    /// Failures never propagate across channels. Returns only after every
    /// per-channel task has finished.
    pub async fn archive_channels(
        &self,
        selected: Vec<Channel>,
        reason: ArchivalReason,
        notice: &str,
    ) {
        let mut tasks = Vec::with_capacity(selected.len());

        for channel in selected {
            info!("archiving #{} ({}) due to {reason}", channel.name, channel.id);
            let port = Arc::clone(&self.port);
            let notify_target = self.notify_target.clone();
            let notice = notice.to_string();
            tasks.push(tokio::spawn(async move {
                archive_one(port, channel, notice, notify_target).await;
            }));
        }

        for task in tasks {
            let _ = task.await;
        }
    }
}

async fn archive_one(
    port: Arc<dyn DirectoryPort>,
    channel: Channel,
    notice: String,
    notify_target: Option<String>,
) {
    let attachment = Attachment {
        pretext: NOTICE_PRETEXT.to_string(),
        text: notice,
    };
    if let Err(e) = port
        .post_message(&channel.id, "", Some(attachment), true)
        .await
    {
        warn!(
            "posting archival notice to #{} ({}) failed: {e}",
            channel.name, channel.id
        );
    }

    if let Err(e) = port.archive(&channel.id).await {
        let report = format!(
            "Error archiving channel #{} ({}): {e}",
            channel.name, channel.id
        );
        error!("{report}");

        let Some(target) = notify_target else {
            return;
        };
        if let Err(notify_err) = port.post_message(&target, &report, None, false).await {
            error!("posting archive failure report failed: {notify_err}");
        }
    }
}
