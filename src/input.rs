use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};

/// Every input name the action understands.
pub const INPUT_NAMES: &[&str] = &[
    "bot_token",
    "chat_id",
    "message_text",
    "parse_mode",
    "document",
    "document_caption",
    "message_thread_id",
    "message_effect_id",
    "protect_content",
    "disable_notification",
    "reply_markup",
    "reply_link_url",
    "reply_link_text",
    "reply_parameters",
];

const BOOLEAN_INPUTS: &[&str] = &["protect_content", "disable_notification"];

/// Inputs that carry JSON objects; TOML tables are accepted for these.
const JSON_INPUTS: &[&str] = &["reply_markup", "reply_parameters"];

/// A loosely-typed value as supplied by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

/// Raw key/value input for one invocation. Setting a key twice keeps the last value.
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    values: HashMap<String, RawValue>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.values.get(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Collect inputs from the GitHub Actions `INPUT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`RawInput::from_env`], with the variable lookup supplied by the caller.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut input = Self::new();

        for name in INPUT_NAMES {
            let Some(value) = lookup(env_var_name(name).as_str()) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            if BOOLEAN_INPUTS.contains(name) {
                input.set(*name, parse_yaml_bool(name, value)?);
            } else {
                input.set(*name, value);
            }
        }

        Ok(input)
    }

    /// Read inputs from a TOML file whose top-level keys are input names.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read input file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut input = Self::new();

        for (key, value) in table {
            if !INPUT_NAMES.contains(&key.as_str()) {
                warn!("Ignoring unknown input \"{}\"", key);
                continue;
            }

            let raw = match value {
                toml::Value::String(s) => RawValue::String(s),
                toml::Value::Boolean(b) => RawValue::Bool(b),
                toml::Value::Integer(i) => RawValue::Integer(i),
                toml::Value::Float(f) => RawValue::Float(f),
                value @ (toml::Value::Table(_) | toml::Value::Array(_))
                    if JSON_INPUTS.contains(&key.as_str()) =>
                {
                    let json = serde_json::to_string(&value).map_err(|e| Error::InvalidInput {
                        name: key.clone(),
                        reason: e.to_string(),
                    })?;
                    RawValue::String(json)
                }
                other => {
                    return Err(Error::InvalidInput {
                        name: key,
                        reason: format!("unsupported value type: {}", other.type_str()),
                    })
                }
            };
            input.set(key, raw);
        }

        Ok(input)
    }
}

/// `INPUT_` + name upper-cased, with spaces replaced by underscores.
fn env_var_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Boolean inputs follow the YAML 1.2 core schema, like the Actions toolkit.
fn parse_yaml_bool(name: &str, value: &str) -> Result<RawValue> {
    match value {
        "true" | "True" | "TRUE" => Ok(RawValue::Bool(true)),
        "false" | "False" | "FALSE" => Ok(RawValue::Bool(false)),
        _ => Err(Error::InvalidInput {
            name: name.to_string(),
            reason: "Input does not meet YAML 1.2 \"Core Schema\" specification. \
                     Support boolean input list: `true | True | TRUE | false | False | FALSE`"
                .to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("bot_token"), "INPUT_BOT_TOKEN");
        assert_eq!(env_var_name("some input"), "INPUT_SOME_INPUT");
    }

    #[test]
    fn test_from_lookup_trims_and_skips_empty() {
        let input = RawInput::from_lookup(lookup(&[
            ("INPUT_BOT_TOKEN", "  abc  "),
            ("INPUT_CHAT_ID", "42"),
            ("INPUT_MESSAGE_TEXT", "   "),
        ]))
        .unwrap();

        assert_eq!(input.get("bot_token"), Some(&RawValue::from("abc")));
        assert_eq!(input.get("chat_id"), Some(&RawValue::from("42")));
        assert!(input.get("message_text").is_none());
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_from_lookup_parses_booleans() {
        let input = RawInput::from_lookup(lookup(&[
            ("INPUT_PROTECT_CONTENT", "True"),
            ("INPUT_DISABLE_NOTIFICATION", "FALSE"),
        ]))
        .unwrap();

        assert_eq!(input.get("protect_content"), Some(&RawValue::Bool(true)));
        assert_eq!(
            input.get("disable_notification"),
            Some(&RawValue::Bool(false))
        );
    }

    #[test]
    fn test_from_lookup_rejects_non_yaml_boolean() {
        let err = RawInput::from_lookup(lookup(&[("INPUT_PROTECT_CONTENT", "yes")])).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref name, .. } if name == "protect_content"));
    }

    #[test]
    fn test_from_toml_keeps_types() {
        let input = RawInput::from_toml_str(
            r#"
bot_token = "token"
chat_id = -100123
protect_content = true
disable_notification = 1
message_effect_id = 5104841245755180586
"#,
        )
        .unwrap();

        assert_eq!(input.get("chat_id"), Some(&RawValue::Integer(-100123)));
        assert_eq!(input.get("protect_content"), Some(&RawValue::Bool(true)));
        assert_eq!(
            input.get("disable_notification"),
            Some(&RawValue::Integer(1))
        );
        assert_eq!(
            input.get("message_effect_id"),
            Some(&RawValue::Integer(5104841245755180586))
        );
    }

    #[test]
    fn test_from_toml_encodes_reply_markup_table_as_json() {
        let input = RawInput::from_toml_str(
            r#"
[reply_parameters]
message_id = 7
"#,
        )
        .unwrap();

        let Some(RawValue::String(json)) = input.get("reply_parameters") else {
            panic!("reply_parameters should be a JSON string");
        };
        let parsed: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(parsed, serde_json::json!({ "message_id": 7 }));
    }

    #[test]
    fn test_from_toml_rejects_table_for_scalar_input() {
        let err = RawInput::from_toml_str("[chat_id]\nid = 1\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref name, .. } if name == "chat_id"));
    }

    #[test]
    fn test_from_toml_ignores_unknown_keys() {
        let input = RawInput::from_toml_str("unknown = \"x\"\nbot_token = \"t\"\n").unwrap();
        assert_eq!(input.len(), 1);
    }

    #[test]
    fn test_from_toml_reports_syntax_errors() {
        let err = RawInput::from_toml_str("bot_token = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.toml");
        std::fs::write(&path, "bot_token = \"t\"\nchat_id = \"@chan\"\n").unwrap();

        let input = RawInput::load(&path).unwrap();
        assert_eq!(input.get("chat_id"), Some(&RawValue::from("@chan")));
    }

    #[test]
    fn test_last_value_wins() {
        let input = RawInput::new()
            .with("message_text", "first")
            .with("message_text", "second");
        assert_eq!(input.get("message_text"), Some(&RawValue::from("second")));
    }
}
