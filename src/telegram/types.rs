use serde::Deserialize;
use serde_json::{Map, Value};
use teloxide::types::Recipient;

use crate::error::{Error, Result};

/// File content uploaded as a multipart part.
#[derive(Clone, PartialEq)]
pub struct InputFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Log-safe stand-in for the file content.
    pub fn placeholder(&self) -> String {
        format!("[File: {}, Size: {} bytes]", self.file_name, self.len())
    }
}

impl std::fmt::Debug for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.placeholder())
    }
}

/// Fields shared by `sendMessage` and `sendDocument`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonParams {
    pub chat_id: Recipient,
    pub parse_mode: Option<String>,
    pub message_thread_id: Option<i64>,
    pub message_effect_id: Option<String>,
    pub protect_content: bool,
    pub disable_notification: bool,
    pub reply_parameters: Option<Value>,
}

impl CommonParams {
    pub fn new(chat_id: Recipient) -> Self {
        Self {
            chat_id,
            parse_mode: None,
            message_thread_id: None,
            message_effect_id: None,
            protect_content: false,
            disable_notification: false,
            reply_parameters: None,
        }
    }
}

/// <https://core.telegram.org/bots/api#sendmessage>
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageRequest {
    pub common: CommonParams,
    pub text: String,
    pub reply_markup: Option<Value>,
}

/// <https://core.telegram.org/bots/api#senddocument>
#[derive(Debug, Clone, PartialEq)]
pub struct SendDocumentRequest {
    pub common: CommonParams,
    pub document: InputFile,
    pub caption: Option<String>,
    pub reply_markup: Option<Value>,
}

/// A sent message. Only `message_id` is interpreted; everything else is kept as-is.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Message {
    pub message_id: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `result` of a send call: one message, or several for grouped sends.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SentMessage {
    Single(Message),
    Group(Vec<Message>),
}

impl SentMessage {
    pub fn first(&self) -> Option<&Message> {
        match self {
            SentMessage::Single(message) => Some(message),
            SentMessage::Group(messages) => messages.first(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<i64>,
    pub retry_after: Option<u64>,
}

/// Error envelope returned by the Bot API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub error_code: i64,
    pub description: String,
    pub parameters: Option<ResponseParameters>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Code: {})", self.description, self.error_code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ok(T),
    Err(ApiError),
}

/// Raw response body: `{ ok, result }` or `{ ok, error_code, description, parameters }`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<i64>,
    description: Option<String>,
    parameters: Option<ResponseParameters>,
}

impl<T> Envelope<T> {
    pub(crate) fn into_response(self) -> Result<ApiResponse<T>> {
        if self.ok {
            return self
                .result
                .map(ApiResponse::Ok)
                .ok_or_else(|| Error::Transport("Response has ok=true but no result".to_string()));
        }

        Ok(ApiResponse::Err(ApiError {
            error_code: self.error_code.unwrap_or_default(),
            description: self
                .description
                .unwrap_or_else(|| "Unknown error".to_string()),
            parameters: self.parameters,
        }))
    }
}
