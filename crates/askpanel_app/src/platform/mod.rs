mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod image;
mod render;
mod shell;
#[cfg(test)]
mod test_support;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use askpanel_engine::BackendSettings;
use clap::Parser;
use log::LevelFilter;
use panel_logging::panel_info;

use app::Session;
use cli::{Cli, Command};
use effects::EffectRunner;

/// Written to the current working directory when file logging is enabled.
const LOG_FILE: &str = "askpanel.log";

/// Slack on top of the request timeout before a one-shot command gives up.
const WAIT_SLACK: Duration = Duration::from_secs(5);

pub fn run_app() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    panel_logging::initialize(cli.log.into(), level, Path::new(LOG_FILE))
        .context("initializing logging")?;

    let mut config = config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.image_qa_url, cli.recommender_url);
    let settings = config.backend_settings();
    let wait = settings.request_timeout + WAIT_SLACK;
    panel_info!(
        "askpanel starting: image_qa={} recommender={}",
        settings.image_qa_url,
        settings.recommender_url
    );

    match cli.command {
        Command::Status => commands::status(settings, wait),
        Command::Ask { image, question } => {
            commands::ask(&mut session(settings)?, image.as_deref(), question, wait)
        }
        Command::Recommend { task } => commands::recommend(&mut session(settings)?, task, wait),
        Command::Agents => commands::agents(&mut session(settings)?, wait),
        Command::Shell => {
            shell::run(&mut session(settings)?, wait).context("writing to the terminal")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn session(settings: BackendSettings) -> anyhow::Result<Session> {
    let runner = EffectRunner::new(settings).context("starting the engine")?;
    Ok(Session::new(runner))
}
