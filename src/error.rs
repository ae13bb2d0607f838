//! Error types for the action

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),

    #[error("Invalid value for input \"{name}\": {reason}")]
    InvalidInput { name: String, reason: String },

    #[error("No valid content found. You must provide at least \"message_text\" or \"document\".")]
    NoContent,

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.without_url().to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
