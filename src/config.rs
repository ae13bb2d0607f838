use serde_json::{json, Value};
use teloxide::types::{ChatId, Recipient};

use crate::error::{Error, Result};
use crate::input::{RawInput, RawValue};

pub const DEFAULT_PARSE_MODE: &str = "HTML";

/// The Bot API method an invocation ends up calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMethod {
    SendMessage,
    SendDocument,
}

impl ActionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionMethod::SendMessage => "sendMessage",
            ActionMethod::SendDocument => "sendDocument",
        }
    }
}

impl std::fmt::Display for ActionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated configuration for a single invocation.
///
/// Built once by [`ActionConfig::from_raw`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    bot_token: String,
    chat_id: Recipient,
    message_text: Option<String>,
    document: Option<String>,
    document_caption: Option<String>,
    parse_mode: String,
    message_thread_id: Option<i64>,
    message_effect_id: Option<String>,
    protect_content: bool,
    disable_notification: bool,
    reply_markup: Option<Value>,
    reply_parameters: Option<Value>,
    warnings: Vec<String>,
}

impl ActionConfig {
    /// Normalize raw host input.
    ///
    /// Only a missing `bot_token` or `chat_id` is fatal. Malformed optional
    /// values are dropped and described in [`ActionConfig::warnings`].
    pub fn from_raw(raw: &RawInput) -> Result<Self> {
        let mut warnings = Vec::new();
        let w = &mut warnings;

        let bot_token =
            string_input(raw, "bot_token", w).ok_or(Error::MissingInput("bot_token"))?;
        let chat_id = chat_id_input(raw)?;

        // Link-button fields always win over a raw keyboard payload.
        let reply_markup = match (
            string_input(raw, "reply_link_url", w),
            string_input(raw, "reply_link_text", w),
        ) {
            (Some(url), Some(text)) => Some(link_keyboard(&text, &url)),
            _ => json_input(raw, "reply_markup", w),
        };

        let message_text = string_input(raw, "message_text", w);
        let document = string_input(raw, "document", w);
        let document_caption = string_input(raw, "document_caption", w);
        let parse_mode = string_input(raw, "parse_mode", w)
            .unwrap_or_else(|| DEFAULT_PARSE_MODE.to_string());
        let message_thread_id = integer_input(raw, "message_thread_id", w);
        let message_effect_id = match raw.get("message_effect_id") {
            Some(RawValue::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(RawValue::Integer(i)) => Some(i.to_string()),
            Some(RawValue::Float(f)) => Some(f.to_string()),
            _ => None,
        };
        let reply_parameters = json_input(raw, "reply_parameters", w);

        Ok(Self {
            bot_token,
            chat_id,
            message_text,
            document,
            document_caption,
            parse_mode,
            message_thread_id,
            message_effect_id,
            protect_content: flag_input(raw, "protect_content"),
            disable_notification: flag_input(raw, "disable_notification"),
            reply_markup,
            reply_parameters,
            warnings,
        })
    }

    /// Pick the API method for this configuration. Text takes priority over a document.
    pub fn action_method(&self) -> Result<ActionMethod> {
        if self.message_text.as_deref().is_some_and(|t| !t.is_empty()) {
            return Ok(ActionMethod::SendMessage);
        }
        if self.document.as_deref().is_some_and(|d| !d.is_empty()) {
            return Ok(ActionMethod::SendDocument);
        }
        Err(Error::NoContent)
    }

    pub fn bot_token(&self) -> &str {
        &self.bot_token
    }

    pub fn chat_id(&self) -> &Recipient {
        &self.chat_id
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message_text.as_deref()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn document_caption(&self) -> Option<&str> {
        self.document_caption.as_deref()
    }

    pub fn parse_mode(&self) -> &str {
        &self.parse_mode
    }

    pub fn message_thread_id(&self) -> Option<i64> {
        self.message_thread_id
    }

    pub fn message_effect_id(&self) -> Option<&str> {
        self.message_effect_id.as_deref()
    }

    pub fn protect_content(&self) -> bool {
        self.protect_content
    }

    pub fn disable_notification(&self) -> bool {
        self.disable_notification
    }

    pub fn reply_markup(&self) -> Option<&Value> {
        self.reply_markup.as_ref()
    }

    pub fn reply_parameters(&self) -> Option<&Value> {
        self.reply_parameters.as_ref()
    }

    /// Optional inputs that were dropped during normalization, for the host to surface.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn link_keyboard(text: &str, url: &str) -> Value {
    json!({ "inline_keyboard": [[{ "text": text, "url": url }]] })
}

/// Non-empty string value; numbers are stringified, booleans are ignored.
fn string_input(raw: &RawInput, key: &str, warnings: &mut Vec<String>) -> Option<String> {
    match raw.get(key)? {
        RawValue::String(s) if !s.is_empty() => Some(s.clone()),
        RawValue::String(_) => None,
        RawValue::Integer(i) => Some(i.to_string()),
        RawValue::Float(f) => Some(f.to_string()),
        RawValue::Bool(_) => {
            warnings.push(format!("Ignoring boolean value for \"{}\"", key));
            None
        }
    }
}

fn chat_id_input(raw: &RawInput) -> Result<Recipient> {
    match raw.get("chat_id") {
        Some(RawValue::Integer(id)) => Ok(Recipient::Id(ChatId(*id))),
        Some(RawValue::String(s)) if !s.is_empty() => Ok(match s.parse::<i64>() {
            Ok(id) => Recipient::Id(ChatId(id)),
            Err(_) => Recipient::ChannelUsername(s.clone()),
        }),
        Some(RawValue::Float(_)) | Some(RawValue::Bool(_)) => Err(Error::InvalidInput {
            name: "chat_id".to_string(),
            reason: "expected an integer id or a @channel username".to_string(),
        }),
        _ => Err(Error::MissingInput("chat_id")),
    }
}

fn integer_input(raw: &RawInput, key: &str, warnings: &mut Vec<String>) -> Option<i64> {
    match raw.get(key)? {
        RawValue::Integer(i) => Some(*i),
        RawValue::String(s) if s.is_empty() => None,
        RawValue::String(s) => match s.parse() {
            Ok(i) => Some(i),
            Err(_) => {
                warnings.push(format!("Ignoring non-numeric \"{}\": {}", key, s));
                None
            }
        },
        RawValue::Float(f) if f.fract() == 0.0 => Some(*f as i64),
        other => {
            warnings.push(format!("Ignoring invalid \"{}\": {:?}", key, other));
            None
        }
    }
}

/// `true`, `"true"` and `1` are truthy. Everything else, including absence, is false.
fn flag_input(raw: &RawInput, key: &str) -> bool {
    match raw.get(key) {
        Some(RawValue::Bool(b)) => *b,
        Some(RawValue::String(s)) => s == "true",
        Some(RawValue::Integer(i)) => *i == 1,
        Some(RawValue::Float(f)) => *f == 1.0,
        None => false,
    }
}

fn json_input(raw: &RawInput, key: &str, warnings: &mut Vec<String>) -> Option<Value> {
    let text = string_input(raw, key, warnings)?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warnings.push(format!("Failed to parse {} JSON: {}", key, e));
            None
        }
    }
}
