//! Pure channel filters: whitelist exemption and emptiness.

use crate::domain::Channel;

/// Drop channels whose name appears in the whitelist, preserving the
/// relative order of the rest. An empty whitelist is a no-op.
pub fn filter_whitelisted(channels: Vec<Channel>, whitelist: &[String]) -> Vec<Channel> {
    if whitelist.is_empty() {
        return channels;
    }
    channels
        .into_iter()
        .filter(|c| !whitelist.iter().any(|w| w == &c.name))
        .collect()
}

/// Channels with no members at all, order preserved.
pub fn empty_channels(channels: &[Channel]) -> Vec<Channel> {
    channels
        .iter()
        .filter(|c| c.num_members == 0)
        .cloned()
        .collect()
}
