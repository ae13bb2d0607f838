use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use telegram_action::{
    run, ActionConfig, ActionsReporter, FsLoader, Outcome, RawInput, Reporter, TelegramBot,
};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,telegram_action=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let reporter = ActionsReporter::from_env();

    match execute(&reporter).await {
        Ok(Outcome::Success { message_id }) => info!("Done, message_id={}", message_id),
        Ok(Outcome::Failure(_)) => {}
        Err(e) => reporter.fail(&format!("{:#}", e)),
    }

    if reporter.failed() {
        std::process::exit(1);
    }
}

async fn execute(reporter: &ActionsReporter) -> Result<Outcome> {
    // A path argument means a local run driven by a TOML file; otherwise read INPUT_* vars.
    let raw = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            info!("Loading inputs from: {}", path.display());
            RawInput::load(&path)
                .with_context(|| format!("Failed to load inputs from {}", path.display()))?
        }
        None => RawInput::from_env().context("Failed to read action inputs")?,
    };

    let config = ActionConfig::from_raw(&raw)?;
    let bot = TelegramBot::new(config.bot_token())?;

    Ok(run(&config, &bot, reporter, &FsLoader).await)
}
