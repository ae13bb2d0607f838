//! GitHub Action that sends a Telegram message or document.
//!
//! Inputs are normalized into an [`ActionConfig`], which selects either
//! `sendMessage` or `sendDocument`. [`run`] performs the call through a
//! [`TelegramApi`] and reports the result through a [`Reporter`].

pub mod config;
pub mod document;
pub mod error;
pub mod input;
pub mod reporter;
pub mod run;
pub mod telegram;

pub use config::{ActionConfig, ActionMethod};
pub use document::{DocumentLoader, FsLoader};
pub use error::{Error, Result};
pub use input::{RawInput, RawValue};
pub use reporter::{ActionsReporter, Reporter};
pub use run::{run, Outcome};
pub use telegram::{TelegramApi, TelegramBot};
