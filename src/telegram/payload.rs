use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};
use teloxide::types::Recipient;

use super::types::{CommonParams, InputFile, SendDocumentRequest, SendMessageRequest};

/// One multipart form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// String, number or boolean; sent as its string form.
    Scalar(Value),
    /// Object or array; sent JSON-encoded.
    Json(Value),
    File(InputFile),
}

/// Ordered form fields for one request. Absent values never make it in here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Vec<(&'static str, FormValue)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scalar(&mut self, key: &'static str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if !value.is_null() {
            self.fields.push((key, FormValue::Scalar(value)));
        }
        self
    }

    pub fn scalar_opt<V: Into<Value>>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.scalar(key, value);
        }
        self
    }

    pub fn json_opt(&mut self, key: &'static str, value: Option<Value>) -> &mut Self {
        match value {
            None | Some(Value::Null) => {}
            Some(value @ (Value::Object(_) | Value::Array(_))) => {
                self.fields.push((key, FormValue::Json(value)))
            }
            Some(value) => {
                self.fields.push((key, FormValue::Scalar(value)));
            }
        }
        self
    }

    pub fn file(&mut self, key: &'static str, file: InputFile) -> &mut Self {
        self.fields.push((key, FormValue::File(file)));
        self
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    /// Field map for logging: `chat_id` masked, files replaced by a size placeholder.
    pub fn redacted(&self) -> Value {
        let mut map = Map::new();
        for (key, value) in &self.fields {
            let shown = match value {
                FormValue::File(file) => Value::String(file.placeholder()),
                FormValue::Scalar(v) | FormValue::Json(v) => v.clone(),
            };
            map.insert((*key).to_string(), shown);
        }
        map.insert("chat_id".to_string(), Value::String("***".to_string()));
        Value::Object(map)
    }

    pub fn into_form(self) -> Form {
        self.fields
            .into_iter()
            .fold(Form::new(), |form, (key, value)| match value {
                FormValue::Scalar(Value::String(s)) => form.text(key, s),
                FormValue::Scalar(v) | FormValue::Json(v) => form.text(key, v.to_string()),
                FormValue::File(file) => {
                    form.part(key, Part::bytes(file.bytes).file_name(file.file_name))
                }
            })
    }
}

fn recipient_value(chat_id: Recipient) -> Value {
    match chat_id {
        Recipient::Id(id) => Value::from(id.0),
        Recipient::ChannelUsername(username) => Value::String(username),
    }
}

impl CommonParams {
    fn write_into(self, payload: &mut Payload) {
        payload
            .scalar("chat_id", recipient_value(self.chat_id))
            .scalar_opt("parse_mode", self.parse_mode)
            .scalar_opt("message_thread_id", self.message_thread_id)
            .scalar_opt("message_effect_id", self.message_effect_id)
            .scalar("protect_content", self.protect_content)
            .scalar("disable_notification", self.disable_notification)
            .json_opt("reply_parameters", self.reply_parameters);
    }
}

impl From<SendMessageRequest> for Payload {
    fn from(request: SendMessageRequest) -> Self {
        let mut payload = Payload::new();
        request.common.write_into(&mut payload);
        payload
            .scalar("text", request.text)
            .json_opt("reply_markup", request.reply_markup);
        payload
    }
}

impl From<SendDocumentRequest> for Payload {
    fn from(request: SendDocumentRequest) -> Self {
        let mut payload = Payload::new();
        request.common.write_into(&mut payload);
        payload
            .file("document", request.document)
            .scalar_opt("caption", request.caption)
            .json_opt("reply_markup", request.reply_markup);
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use teloxide::types::ChatId;

    fn common() -> CommonParams {
        CommonParams {
            parse_mode: Some("HTML".to_string()),
            message_thread_id: Some(9),
            reply_parameters: Some(json!({ "message_id": 3 })),
            ..CommonParams::new(Recipient::Id(ChatId(12345)))
        }
    }

    #[test]
    fn test_message_payload_fields() {
        let payload = Payload::from(SendMessageRequest {
            common: common(),
            text: "hello".to_string(),
            reply_markup: Some(json!({ "inline_keyboard": [] })),
        });

        assert_eq!(payload.get("chat_id"), Some(&FormValue::Scalar(json!(12345))));
        assert_eq!(payload.get("text"), Some(&FormValue::Scalar(json!("hello"))));
        assert_eq!(
            payload.get("message_thread_id"),
            Some(&FormValue::Scalar(json!(9)))
        );
        assert_eq!(
            payload.get("protect_content"),
            Some(&FormValue::Scalar(json!(false)))
        );
        assert_eq!(
            payload.get("reply_markup"),
            Some(&FormValue::Json(json!({ "inline_keyboard": [] })))
        );
        assert_eq!(
            payload.get("reply_parameters"),
            Some(&FormValue::Json(json!({ "message_id": 3 })))
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let payload = Payload::from(SendMessageRequest {
            common: CommonParams::new(Recipient::ChannelUsername("@chan".to_string())),
            text: "hi".to_string(),
            reply_markup: None,
        });

        let keys: Vec<_> = payload.keys().collect();
        assert_eq!(
            keys,
            vec!["chat_id", "protect_content", "disable_notification", "text"]
        );
        assert_eq!(payload.get("chat_id"), Some(&FormValue::Scalar(json!("@chan"))));
    }

    #[test]
    fn test_null_json_is_omitted() {
        let mut payload = Payload::new();
        payload.json_opt("reply_markup", Some(Value::Null));
        assert_eq!(payload.keys().count(), 0);
    }

    #[test]
    fn test_redacted_hides_chat_id_and_file_bytes() {
        let payload = Payload::from(SendDocumentRequest {
            common: common(),
            document: InputFile::new("report.txt", b"raw secret content".to_vec()),
            caption: Some("Report".to_string()),
            reply_markup: None,
        });

        let redacted = payload.redacted();
        assert_eq!(redacted["chat_id"], json!("***"));
        assert_eq!(
            redacted["document"],
            json!("[File: report.txt, Size: 18 bytes]")
        );
        assert_eq!(redacted["caption"], json!("Report"));

        let rendered = serde_json::to_string(&redacted).unwrap();
        assert!(!rendered.contains("raw secret content"));
        assert!(!rendered.contains("12345"));
    }
}
