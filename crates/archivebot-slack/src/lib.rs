//! Slack Web API adapter for the archive bot.
//!
//! Implements [`DirectoryPort`] over `conversations.list`,
//! `conversations.history`, `chat.postMessage` and `conversations.archive`.
//! Every response is the Slack envelope `{ ok, error, ... }`; `ok: false`
//! maps to [`Error::Api`], transport and decode failures to
//! [`Error::Transport`].

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use archivebot_core::{
    directory::{Attachment, DirectoryPort},
    domain::{Channel, Message},
    errors::Error,
    Result,
};

const DEFAULT_BASE_URL: &str = "https://slack.com/api";
const LIST_PAGE_LIMIT: u32 = 200;

#[derive(Clone, Debug)]
pub struct SlackClient {
    token: String,
    base_url: String,
    debug: bool,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(token: impl Into<String>, debug: bool) -> Self {
        let http = reqwest::Client::builder()
            .build()
            .expect("reqwest client build");
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            debug,
            http,
        }
    }

    /// Point the client at a different API root (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn call_get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        if self.debug {
            debug!("GET {method} {query:?}");
        }
        let resp = self
            .http
            .get(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{method} request error: {e}")))?;
        decode(method, resp).await
    }

    async fn call_post<B: Serialize>(&self, method: &str, body: &B) -> Result<AckEnvelope> {
        if self.debug {
            debug!("POST {method}");
        }
        let resp = self
            .http
            .post(format!("{}/{method}", self.base_url))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("{method} request error: {e}")))?;
        decode(method, resp).await
    }
}

#[async_trait]
impl DirectoryPort for SlackClient {
    /// Lists all public channels, following cursor pagination until the
    /// workspace is exhausted.
    async fn list_channels(&self, exclude_archived: bool) -> Result<Vec<Channel>> {
        let mut channels = Vec::new();
        let mut cursor = String::new();

        loop {
            let mut query = vec![
                ("types", "public_channel".to_string()),
                ("limit", LIST_PAGE_LIMIT.to_string()),
                ("exclude_archived", exclude_archived.to_string()),
            ];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.clone()));
            }

            let envelope: ListEnvelope = self.call_get("conversations.list", &query).await?;
            check("conversations.list", envelope.ok, envelope.error)?;

            channels.extend(envelope.channels.into_iter().map(ChannelObj::into_channel));

            cursor = envelope
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                if self.debug {
                    debug!("conversations.list returned {} channels", channels.len());
                }
                return Ok(channels);
            }
        }
    }

    async fn history(
        &self,
        channel_id: &str,
        latest: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Message>> {
        let mut query = vec![
            ("channel", channel_id.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(latest) = latest {
            query.push(("latest", latest.to_string()));
        }

        let envelope: HistoryEnvelope = self.call_get("conversations.history", &query).await?;
        check("conversations.history", envelope.ok, envelope.error)?;

        Ok(envelope
            .messages
            .into_iter()
            .map(|m| Message {
                ts: m.ts,
                subtype: m.subtype,
            })
            .collect())
    }

    async fn post_message(
        &self,
        target: &str,
        text: &str,
        attachment: Option<Attachment>,
        link_names: bool,
    ) -> Result<()> {
        let attachments = attachment.as_ref().map(|a| {
            vec![AttachmentBody {
                pretext: &a.pretext,
                text: &a.text,
            }]
        });
        let body = PostMessageBody {
            channel: target,
            text,
            link_names,
            attachments,
        };

        let envelope = self.call_post("chat.postMessage", &body).await?;
        check("chat.postMessage", envelope.ok, envelope.error)
    }

    async fn archive(&self, channel_id: &str) -> Result<()> {
        let body = serde_json::json!({ "channel": channel_id });
        let envelope = self.call_post("conversations.archive", &body).await?;
        check("conversations.archive", envelope.ok, envelope.error)
    }
}

async fn decode<T: DeserializeOwned>(method: &str, resp: reqwest::Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Transport(format!(
            "{method} failed: {status} {}",
            body.chars().take(200).collect::<String>()
        )));
    }
    resp.json::<T>()
        .await
        .map_err(|e| Error::Transport(format!("{method} decode error: {e}")))
}

fn check(method: &str, ok: bool, error: Option<String>) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Api {
            method: method.to_string(),
            reason: error.unwrap_or_else(|| "unknown error".to_string()),
        })
    }
}

// Wire types. Slack sends much more than this; everything else is ignored.

#[derive(Debug, Deserialize)]
struct ChannelObj {
    id: String,
    name: String,
    #[serde(default)]
    num_members: u32,
}

impl ChannelObj {
    fn into_channel(self) -> Channel {
        Channel {
            id: self.id,
            name: self.name,
            num_members: self.num_members,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    channels: Vec<ChannelObj>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

#[derive(Debug, Deserialize)]
struct HistoryEnvelope {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    messages: Vec<MessageObj>,
}

#[derive(Debug, Deserialize)]
struct MessageObj {
    ts: String,
    subtype: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    ok: bool,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct PostMessageBody<'a> {
    channel: &'a str,
    text: &'a str,
    link_names: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachments: Option<Vec<AttachmentBody<'a>>>,
}

#[derive(Debug, Serialize)]
struct AttachmentBody<'a> {
    pretext: &'a str,
    text: &'a str,
}
