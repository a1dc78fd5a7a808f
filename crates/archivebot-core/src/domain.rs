use std::fmt;

/// A public channel snapshot taken at listing time. Never mutated during a
/// run; both pipelines read from the same listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub num_members: u32,
}

/// One entry of a channel's message history, newest first.
#[derive(Clone, Debug)]
pub struct Message {
    /// Slack timestamp string, `"<epoch seconds>.<fractional>"`.
    pub ts: String,
    /// Event subtype; membership churn arrives as `channel_join` / `channel_leave`.
    pub subtype: Option<String>,
}

impl Message {
    /// Join/leave system messages do not count as channel activity.
    pub fn is_membership_event(&self) -> bool {
        matches!(
            self.subtype.as_deref(),
            Some("channel_join") | Some("channel_leave")
        )
    }
}

/// Why a channel was selected for archival. Drives log and notice text only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchivalReason {
    Emptiness,
    Inactivity,
}

impl fmt::Display for ArchivalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchivalReason::Emptiness => write!(f, "emptiness"),
            ArchivalReason::Inactivity => write!(f, "inactivity"),
        }
    }
}

/// Sentinel for "no determinable last activity": the channel has no messages
/// at all, or the history lookup failed. Never selected for archival.
pub const UNKNOWN_ACTIVITY: i64 = -1;

/// Fan-in result of one last-activity lookup.
#[derive(Clone, Debug)]
pub struct LastActivity {
    pub channel: Channel,
    /// Epoch seconds of the newest substantive message, or a non-positive
    /// sentinel.
    pub timestamp: i64,
}
