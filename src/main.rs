// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WheelLoop CLI
//!
//! Inspects and edits the persisted Strava session and chat settings, and
//! asks the configured model for activity commentary.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wheelloop::{
    config::Config,
    models::{SessionPayload, TokenExchangeResponse, WheelSettingsPatch},
    time_utils::format_epoch_secs,
    AppState,
};

/// Manage the locally stored Strava session and commentary settings.
#[derive(Parser)]
#[command(name = "wheelloop", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored session.
    Show {
        /// Print the athlete profile as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Store a session from a Strava `/oauth/token` response saved to a file.
    Login {
        #[arg(long)]
        from: PathBuf,
    },

    /// Clear tokens and athlete (wheel settings are kept).
    Logout,

    /// Reload state from storage and show it.
    Restore,

    /// Chat completion settings.
    Wheel {
        #[command(subcommand)]
        action: WheelAction,
    },

    /// Ask the configured model for commentary.
    Ask { prompt: String },
}

#[derive(Subcommand)]
enum WheelAction {
    /// Show current settings (API key masked).
    Show,

    /// Update any subset of the settings.
    Set {
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long, env = "WHEELLOOP_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(long)]
        system_prompt: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::debug!(storage = ?config.storage, dir = %config.storage_dir.display(), "Configuration loaded");

    let state = AppState::new(config).context("Failed to open session storage")?;

    match cli.command {
        Commands::Show { json } => show_session(&state, json)?,

        Commands::Login { from } => {
            let raw = std::fs::read_to_string(&from)
                .with_context(|| format!("Failed to read {}", from.display()))?;
            let response: TokenExchangeResponse =
                serde_json::from_str(&raw).context("Not a Strava token response")?;
            state.store.set_session(SessionPayload::from(response));
            state.store.flush().await;
            show_session(&state, false)?;
        }

        Commands::Logout => {
            state.store.clear_session();
            println!("Signed out.");
        }

        Commands::Restore => {
            state.store.restore_from_storage();
            state.store.flush().await;
            show_session(&state, false)?;
        }

        Commands::Wheel { action } => match action {
            WheelAction::Show => show_wheel(&state),
            WheelAction::Set {
                model,
                base_url,
                api_key,
                system_prompt,
            } => {
                let patch = WheelSettingsPatch {
                    model,
                    base_url,
                    api_key,
                    system_prompt,
                };
                if patch.is_empty() {
                    println!("Nothing to update.");
                } else {
                    state.store.set_wheel_settings(patch);
                    state.store.flush().await;
                }
                show_wheel(&state);
            }
        },

        Commands::Ask { prompt } => {
            let text = state.commentary(&prompt).await?;
            println!("{}", text);
        }
    }

    Ok(())
}

fn show_session(state: &AppState, json: bool) -> anyhow::Result<()> {
    let session = state.store.snapshot();

    match &session.tokens {
        Some(tokens) => {
            let expires = format_epoch_secs(tokens.expires_at)
                .unwrap_or_else(|| tokens.expires_at.to_string());
            let expired = if tokens.is_expired_at(chrono::Utc::now()) {
                " (expired)"
            } else {
                ""
            };
            println!("Signed in: {} token, expires {}{}", tokens.token_type, expires, expired);
        }
        None => println!("Signed out."),
    }

    if let Some(athlete) = &session.athlete {
        if json {
            println!("{}", serde_json::to_string_pretty(athlete)?);
        } else {
            println!("Athlete profile: {} fields", athlete.len());
        }
    }
    Ok(())
}

fn show_wheel(state: &AppState) {
    let wheel = state.store.wheel_settings();
    println!("model:         {}", wheel.model);
    println!("base URL:      {}", wheel.base_url);
    println!("API key:       {}", wheel.masked_api_key());
    println!("system prompt: {}", wheel.system_prompt);
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wheelloop=info,warn")),
        )
        .with(format)
        .init();
}
