//! Inactivity classification: per-channel last-activity lookup and the
//! threshold filter over the fanned-in results.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    directory::DirectoryPort,
    domain::{Channel, LastActivity, UNKNOWN_ACTIVITY},
};

/// History page size used while scanning for the last substantive message.
const HISTORY_PAGE_SIZE: u32 = 5;

/// Channels whose last substantive message is older than `inactive_days`.
pub async fn inactive_channels(
    port: Arc<dyn DirectoryPort>,
    channels: &[Channel],
    inactive_days: i64,
) -> Vec<Channel> {
    let cutoff = Utc::now().timestamp() - 86_400 * inactive_days;
    inactive_channels_at(port, channels, cutoff).await
}

/// Threshold filter against an explicit cutoff, split out for testability.
///
/// One lookup task per channel, all running concurrently; results fan in
/// over an mpsc channel, so the output order is completion order, not input
/// order.
async fn inactive_channels_at(
    port: Arc<dyn DirectoryPort>,
    channels: &[Channel],
    cutoff: i64,
) -> Vec<Channel> {
    let (tx, mut rx) = mpsc::channel(1);

    for channel in channels {
        let port = Arc::clone(&port);
        let channel = channel.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let timestamp = last_activity(port.as_ref(), &channel).await;
            let _ = tx.send(LastActivity { channel, timestamp }).await;
        });
    }
    drop(tx);

    let mut selected = Vec::new();
    while let Some(result) = rx.recv().await {
        // Non-positive means "no determinable activity": never selected.
        if result.timestamp > 0 && result.timestamp < cutoff {
            selected.push(result.channel);
        }
    }
    selected
}

/// Epoch seconds of the newest non-membership message in `channel`, or the
/// sentinel when the channel has no messages or the lookup fails.
///
/// Pages through the history newest-first, using the oldest seen `ts` as the
/// cursor for the next page. A fetch error resolves to the sentinel and is
/// surfaced only as a debug trace; the selection rule treats it exactly like
/// "no messages".
async fn last_activity(port: &dyn DirectoryPort, channel: &Channel) -> i64 {
    let mut latest: Option<String> = None;

    loop {
        let page = match port
            .history(&channel.id, latest.as_deref(), HISTORY_PAGE_SIZE)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                debug!("history lookup for #{} failed: {e}", channel.name);
                return UNKNOWN_ACTIVITY;
            }
        };

        if page.is_empty() {
            return UNKNOWN_ACTIVITY;
        }

        for message in &page {
            latest = Some(message.ts.clone());
            if message.is_membership_event() {
                continue;
            }
            if let Some(seconds) = whole_seconds(&message.ts) {
                return seconds;
            }
        }
    }
}

/// Integer-seconds prefix of a Slack `ts` string (`"1000.123456"` -> 1000).
fn whole_seconds(ts: &str) -> Option<i64> {
    ts.split('.').next().and_then(|head| head.parse().ok())
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{HashMap, VecDeque},
        sync::Mutex,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{
        directory::Attachment,
        domain::Message,
        errors::Error,
        Result,
    };

    /// Serves scripted history pages per channel and records lookup calls.
    #[derive(Default)]
    struct FakeDirectory {
        pages: Mutex<HashMap<String, VecDeque<Result<Vec<Message>>>>>,
        history_calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl FakeDirectory {
        fn script(&self, channel_id: &str, page: Result<Vec<Message>>) {
            self.pages
                .lock()
                .unwrap()
                .entry(channel_id.to_string())
                .or_default()
                .push_back(page);
        }

        fn history_calls(&self) -> Vec<(String, Option<String>)> {
            self.history_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DirectoryPort for FakeDirectory {
        async fn list_channels(&self, _exclude_archived: bool) -> Result<Vec<Channel>> {
            Ok(vec![])
        }

        async fn history(
            &self,
            channel_id: &str,
            latest: Option<&str>,
            _limit: u32,
        ) -> Result<Vec<Message>> {
            self.history_calls
                .lock()
                .unwrap()
                .push((channel_id.to_string(), latest.map(str::to_string)));
            self.pages
                .lock()
                .unwrap()
                .get_mut(channel_id)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Ok(vec![]))
        }

        async fn post_message(
            &self,
            _target: &str,
            _text: &str,
            _attachment: Option<Attachment>,
            _link_names: bool,
        ) -> Result<()> {
            Ok(())
        }

        async fn archive(&self, _channel_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn channel(name: &str) -> Channel {
        Channel {
            id: format!("C-{name}"),
            name: name.to_string(),
            num_members: 5,
        }
    }

    fn message(ts: &str, subtype: Option<&str>) -> Message {
        Message {
            ts: ts.to_string(),
            subtype: subtype.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn membership_events_are_skipped_and_seconds_truncated() {
        let dir = FakeDirectory::default();
        let ch = channel("general");
        dir.script(
            &ch.id,
            Ok(vec![
                message("2000.000100", Some("channel_join")),
                message("1000.123456", None),
            ]),
        );

        assert_eq!(last_activity(&dir, &ch).await, 1000);
    }

    #[tokio::test]
    async fn empty_page_means_unknown_activity() {
        let dir = FakeDirectory::default();
        let ch = channel("ghost-town");
        dir.script(&ch.id, Ok(vec![]));

        assert_eq!(last_activity(&dir, &ch).await, UNKNOWN_ACTIVITY);
    }

    #[tokio::test]
    async fn fetch_error_means_unknown_activity() {
        let dir = FakeDirectory::default();
        let ch = channel("flaky");
        dir.script(&ch.id, Err(Error::Transport("boom".to_string())));

        assert_eq!(last_activity(&dir, &ch).await, UNKNOWN_ACTIVITY);
    }

    #[tokio::test]
    async fn pagination_cursor_is_oldest_seen_ts() {
        let dir = FakeDirectory::default();
        let ch = channel("joiners");
        // A full page of membership churn, newest first.
        dir.script(
            &ch.id,
            Ok(vec![
                message("5000.000005", Some("channel_join")),
                message("4000.000004", Some("channel_leave")),
                message("3000.000003", Some("channel_join")),
                message("2000.000002", Some("channel_join")),
                message("1000.000001", Some("channel_leave")),
            ]),
        );
        dir.script(&ch.id, Ok(vec![message("900.500000", None)]));

        assert_eq!(last_activity(&dir, &ch).await, 900);

        let calls = dir.history_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (ch.id.clone(), None));
        assert_eq!(calls[1], (ch.id.clone(), Some("1000.000001".to_string())));
    }

    #[tokio::test]
    async fn selection_is_strictly_before_cutoff_and_positive() {
        let dir = Arc::new(FakeDirectory::default());
        let old = channel("old");
        let edge = channel("edge");
        let fresh = channel("fresh");
        let silent = channel("silent");
        let broken = channel("broken");

        dir.script(&old.id, Ok(vec![message("500.000000", None)]));
        dir.script(&edge.id, Ok(vec![message("1000.000000", None)]));
        dir.script(&fresh.id, Ok(vec![message("1500.000000", None)]));
        dir.script(&silent.id, Ok(vec![]));
        dir.script(&broken.id, Err(Error::Transport("boom".to_string())));

        let channels = vec![old.clone(), edge, fresh, silent, broken];
        let selected = inactive_channels_at(dir, &channels, 1000).await;

        // Completion order is not guaranteed, but only "old" may qualify.
        assert_eq!(selected, vec![old]);
    }

    #[test]
    fn whole_seconds_parses_integer_prefix() {
        assert_eq!(whole_seconds("1000.123456"), Some(1000));
        assert_eq!(whole_seconds("1000"), Some(1000));
        assert_eq!(whole_seconds("not-a-ts"), None);
    }
}
