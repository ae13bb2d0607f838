use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::config::{ActionConfig, ActionMethod};
use crate::document::DocumentLoader;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::telegram::{
    ApiResponse, CommonParams, SendDocumentRequest, SendMessageRequest, SentMessage, TelegramApi,
};

const UNKNOWN_ERROR: &str = "An unknown error occurred during execution.";

/// Terminal result of one invocation, mirroring what was reported to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { message_id: i64 },
    Failure(String),
}

/// Send the configured message or document and report the result.
///
/// Normalization warnings are surfaced first. Every error, including a panic
/// inside the dispatch, ends up as a single `fail` on the reporter. Success
/// sets the `message_id` and `ok` outputs.
pub async fn run(
    config: &ActionConfig,
    bot: &dyn TelegramApi,
    reporter: &dyn Reporter,
    loader: &dyn DocumentLoader,
) -> Outcome {
    for warning in config.warnings() {
        reporter.warning(warning);
    }

    let dispatched = AssertUnwindSafe(dispatch(config, bot, reporter, loader))
        .catch_unwind()
        .await;

    let outcome = match dispatched {
        Ok(Ok(ApiResponse::Ok(sent))) => match sent.first() {
            Some(message) => Outcome::Success {
                message_id: message.message_id,
            },
            None => Outcome::Failure(
                "Internal Action Error: Telegram returned an empty result".to_string(),
            ),
        },
        Ok(Ok(ApiResponse::Err(api_error))) => Outcome::Failure(format!(
            "❌ Telegram API Error: {} (Code: {})",
            api_error.description, api_error.error_code
        )),
        Ok(Err(e)) => Outcome::Failure(format!("Internal Action Error: {}", e)),
        Err(_) => Outcome::Failure(UNKNOWN_ERROR.to_string()),
    };

    match &outcome {
        Outcome::Success { message_id } => {
            reporter.info("✅ Success! Message sent.");
            reporter.set_output("message_id", &message_id.to_string());
            reporter.set_output("ok", "true");
        }
        Outcome::Failure(message) => reporter.fail(message),
    }

    outcome
}

fn common_params(config: &ActionConfig) -> CommonParams {
    CommonParams {
        chat_id: config.chat_id().clone(),
        parse_mode: Some(config.parse_mode().to_string()),
        message_thread_id: config.message_thread_id(),
        message_effect_id: config.message_effect_id().map(str::to_string),
        protect_content: config.protect_content(),
        disable_notification: config.disable_notification(),
        reply_parameters: config.reply_parameters().cloned(),
    }
}

async fn dispatch(
    config: &ActionConfig,
    bot: &dyn TelegramApi,
    reporter: &dyn Reporter,
    loader: &dyn DocumentLoader,
) -> Result<ApiResponse<SentMessage>> {
    let common = common_params(config);
    let method = config.action_method()?;

    match method {
        ActionMethod::SendMessage => {
            reporter.info("Sending text message...");
            let text = config
                .message_text()
                .filter(|text| !text.trim().is_empty())
                .ok_or_else(|| {
                    Error::InvalidRequest(
                        "Action execution failed: \"message_text\" is required for sendMessage but was found empty."
                            .to_string(),
                    )
                })?;

            bot.send_message(SendMessageRequest {
                common,
                text: text.to_string(),
                reply_markup: config.reply_markup().cloned(),
            })
            .await
        }
        ActionMethod::SendDocument => {
            let path = config.document().ok_or_else(|| {
                Error::InvalidRequest(
                    "Action execution failed: \"document\" path is missing for sendDocument."
                        .to_string(),
                )
            })?;
            reporter.info(&format!("Preparing to send document: {}", path));

            let document = loader.load(path)?;
            bot.send_document(SendDocumentRequest {
                common,
                document,
                caption: config
                    .document_caption()
                    .or(config.message_text())
                    .map(str::to_string),
                reply_markup: config.reply_markup().cloned(),
            })
            .await
        }
    }
}
