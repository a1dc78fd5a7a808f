use async_trait::async_trait;

use crate::{
    domain::{Channel, Message},
    Result,
};

/// Notice payload rendered alongside a posted message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub pretext: String,
    pub text: String,
}

/// Hexagonal port for the workspace directory.
///
/// Slack is the first implementation (`archivebot-slack`); the shape keeps
/// the pipelines testable against recording fakes and leaves room for other
/// workspace backends.
#[async_trait]
pub trait DirectoryPort: Send + Sync {
    /// List all channels, optionally excluding already-archived ones.
    async fn list_channels(&self, exclude_archived: bool) -> Result<Vec<Channel>>;

    /// Fetch one page of a channel's history, newest first.
    ///
    /// `latest` is an exclusive upper-bound cursor (a message `ts`); `None`
    /// starts at the newest message.
    async fn history(
        &self,
        channel_id: &str,
        latest: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Message>>;

    /// Post a message to a channel or user.
    async fn post_message(
        &self,
        target: &str,
        text: &str,
        attachment: Option<Attachment>,
        link_names: bool,
    ) -> Result<()>;

    /// Archive a channel.
    async fn archive(&self, channel_id: &str) -> Result<()>;
}
