// Outbound messenger interface and the HTTP gateway client.
//
// The bot never speaks a platform wire format itself. A gateway bridge
// normalizes platform events into InboundUpdate JSON (posted to our
// webhook) and exposes send/edit endpoints that HttpMessenger calls.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("edit rejected: {0}")]
    EditRejected(String),
}

/// Kind of media attached to a cache, tagged end to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    VideoNote,
}

impl MediaKind {
    /// Parse a kind string (from DB) into a MediaKind.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(Self::Photo),
            "video" => Some(Self::Video),
            "video_note" => Some(Self::VideoNote),
            _ => None,
        }
    }

    /// Serialize to a DB-storable string.
    pub fn to_str_name(&self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Video => "video",
            Self::VideoNote => "video_note",
        }
    }

    /// Round video messages cannot carry a caption.
    pub fn supports_caption(&self) -> bool {
        !matches!(self, Self::VideoNote)
    }
}

/// One normalized inbound event from the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundUpdate {
    pub user_id: i64,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub location: Option<LocationUpdate>,
    #[serde(default)]
    pub media: Option<MediaAttachment>,
}

/// A shared position. `is_live` distinguishes a live broadcast sample
/// from a one-shot static pin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_live: bool,
}

/// An opaque media reference plus its kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub file_ref: String,
    pub kind: MediaKind,
}

/// Outbound messaging operations. Implemented by the HTTP gateway client
/// in production and by a recording mock in tests.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a text message, returning the provider message id.
    async fn send_text(&self, user_id: i64, text: &str) -> Result<i64, TransportError>;

    /// Replace the text of a previously sent message in place.
    async fn edit_text(
        &self,
        user_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TransportError>;

    /// Send stored media by reference, with an optional caption.
    async fn send_media(
        &self,
        user_id: i64,
        media_ref: &str,
        kind: MediaKind,
        caption: Option<&str>,
    ) -> Result<i64, TransportError>;
}

#[derive(Serialize)]
struct SendTextRequest<'a> {
    user_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct EditTextRequest<'a> {
    user_id: i64,
    message_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct SendMediaRequest<'a> {
    user_id: i64,
    media_ref: &'a str,
    kind: MediaKind,
    caption: Option<&'a str>,
}

#[derive(Deserialize)]
struct MessageIdResponse {
    message_id: i64,
}

/// Messenger backed by the HTTP gateway.
pub struct HttpMessenger {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMessenger {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn post<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(format!("{}/{}", self.base_url, path))
            .timeout(REQUEST_TIMEOUT)
            .json(body)
            .send()
            .await
    }
}

#[async_trait]
impl Messenger for HttpMessenger {
    async fn send_text(&self, user_id: i64, text: &str) -> Result<i64, TransportError> {
        let response = self
            .post("send_text", &SendTextRequest { user_id, text })
            .await
            .map_err(|e| TransportError::DeliveryFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::DeliveryFailed(format!(
                "send_text returned {}",
                response.status()
            )));
        }
        let body: MessageIdResponse = response
            .json()
            .await
            .map_err(|e| TransportError::DeliveryFailed(e.to_string()))?;
        Ok(body.message_id)
    }

    async fn edit_text(
        &self,
        user_id: i64,
        message_id: i64,
        text: &str,
    ) -> Result<(), TransportError> {
        let response = self
            .post(
                "edit_text",
                &EditTextRequest {
                    user_id,
                    message_id,
                    text,
                },
            )
            .await
            .map_err(|e| TransportError::EditRejected(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::EditRejected(format!(
                "edit_text returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn send_media(
        &self,
        user_id: i64,
        media_ref: &str,
        kind: MediaKind,
        caption: Option<&str>,
    ) -> Result<i64, TransportError> {
        let response = self
            .post(
                "send_media",
                &SendMediaRequest {
                    user_id,
                    media_ref,
                    kind,
                    caption,
                },
            )
            .await
            .map_err(|e| TransportError::DeliveryFailed(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::DeliveryFailed(format!(
                "send_media returned {}",
                response.status()
            )));
        }
        let body: MessageIdResponse = response
            .json()
            .await
            .map_err(|e| TransportError::DeliveryFailed(e.to_string()))?;
        Ok(body.message_id)
    }
}
