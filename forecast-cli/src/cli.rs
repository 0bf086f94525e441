use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastController, Outcome, config::API_KEY_ENV, source_from_config};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::info;

use crate::terminal::{PromptInput, TerminalDisplay};

const TITLE: &str = "5 Day Weather Forecast";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = TITLE)]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show the 5-day forecast for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,
    },

    /// Prompt for cities repeatedly, like the desktop window.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Interactive => interactive().await,
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(&format!("{API_KEY_ENV} overrides this value when set"))
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(city: String) -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let source = source_from_config(&config)?;
    let controller = ForecastController::new(source, city, TerminalDisplay);

    match controller.execute().await {
        Outcome::Failed(_) => Ok(ExitCode::FAILURE),
        Outcome::Displayed { .. } | Outcome::Ignored => Ok(ExitCode::SUCCESS),
    }
}

async fn interactive() -> anyhow::Result<ExitCode> {
    let config = Config::load()?;
    let source = source_from_config(&config)?;
    let controller = ForecastController::new(source, PromptInput::default(), TerminalDisplay);

    println!("{TITLE}\n");

    loop {
        let answer = match Text::new("Enter a city:").prompt() {
            Ok(answer) => answer,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        controller.input().set(&answer);
        let outcome = controller.execute().await;
        info!(?outcome, "interactive request finished");
    }

    Ok(ExitCode::SUCCESS)
}
