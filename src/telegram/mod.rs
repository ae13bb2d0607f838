//! Minimal Telegram Bot API client.
//!
//! Only `sendMessage` and `sendDocument` are supported. Requests are sent as
//! multipart form data, and API-level failures come back as
//! [`ApiResponse::Err`] rather than as an [`Error`].

pub mod payload;
pub mod types;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use teloxide::types::Recipient;
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_PARSE_MODE;
use crate::error::{Error, Result};
use payload::Payload;
use types::Envelope;
pub use types::{
    ApiError, ApiResponse, CommonParams, InputFile, Message, SendDocumentRequest,
    SendMessageRequest, SentMessage,
};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// The two Bot API calls the action makes.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn send_message(&self, request: SendMessageRequest)
        -> Result<ApiResponse<SentMessage>>;

    async fn send_document(
        &self,
        request: SendDocumentRequest,
    ) -> Result<ApiResponse<SentMessage>>;
}

pub struct TelegramBot {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl TelegramBot {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::InvalidRequest(
                "TelegramBot: Token is required".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            token,
            base_url: DEFAULT_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn send_request<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: Payload,
    ) -> Result<ApiResponse<T>> {
        info!("--- Outgoing Telegram Request: {} ---", method);
        info!(
            "{}",
            serde_json::to_string_pretty(&payload.redacted()).unwrap_or_default()
        );

        let response = self
            .client
            .post(self.method_url(method))
            .multipart(payload.into_form())
            .send()
            .await
            .map_err(|e| network_error(method, e))?;

        let status = response.status();
        debug!("Telegram responded to {} with {}", method, status);

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| network_error(method, e))?;
        let parsed = envelope.into_response().inspect_err(|e| {
            error!("❌ Invalid response [{}]: {}", method, e);
        })?;

        match &parsed {
            ApiResponse::Err(api_error) => {
                error!("❌ Telegram API Error [{}]: {}", method, api_error);
            }
            ApiResponse::Ok(_) if !status.is_success() => {
                warn!("Telegram returned ok=true with status {} [{}]", status, method);
            }
            ApiResponse::Ok(_) => info!("✅ Telegram API Success [{}]", method),
        }

        Ok(parsed)
    }
}

/// The URL is stripped from the error (see `From<reqwest::Error>`) since it embeds the token.
fn network_error(method: &str, err: reqwest::Error) -> Error {
    let err = Error::from(err);
    error!("❌ Network Error [{}]: {}", method, err);
    err
}

fn require_chat_id(chat_id: &Recipient) -> Result<()> {
    match chat_id {
        Recipient::ChannelUsername(username) if username.trim().is_empty() => Err(
            Error::InvalidRequest("Telegram: chat_id is required".to_string()),
        ),
        _ => Ok(()),
    }
}

/// Checks and normalizes a `sendMessage` request before it goes on the wire.
pub fn prepare_message(mut request: SendMessageRequest) -> Result<SendMessageRequest> {
    require_chat_id(&request.common.chat_id)?;

    request.text = request.text.trim().to_string();
    if request.text.is_empty() {
        return Err(Error::InvalidRequest(
            "Telegram: text is required".to_string(),
        ));
    }

    Ok(request)
}

/// Checks and normalizes a `sendDocument` request before it goes on the wire.
pub fn prepare_document(mut request: SendDocumentRequest) -> Result<SendDocumentRequest> {
    require_chat_id(&request.common.chat_id)?;

    if request.document.file_name.is_empty() {
        return Err(Error::InvalidRequest(
            "Telegram: document is required".to_string(),
        ));
    }

    request.caption = request
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    if request.common.parse_mode.as_deref().map_or(true, str::is_empty) {
        request.common.parse_mode = Some(DEFAULT_PARSE_MODE.to_string());
    }

    Ok(request)
}

#[async_trait]
impl TelegramApi for TelegramBot {
    async fn send_message(
        &self,
        request: SendMessageRequest,
    ) -> Result<ApiResponse<SentMessage>> {
        let request = prepare_message(request)?;
        self.send_request("sendMessage", Payload::from(request)).await
    }

    async fn send_document(
        &self,
        request: SendDocumentRequest,
    ) -> Result<ApiResponse<SentMessage>> {
        let request = prepare_document(request)?;
        self.send_request("sendDocument", Payload::from(request)).await
    }
}
