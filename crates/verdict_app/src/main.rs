mod app;
mod cli;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use verdict_client::{ClientSettings, EngineHandle};
use verdict_core::AnalysisMode;

use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::logging::LogDestination;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    logging::initialize(destination, verdict_logging::level_for_verbosity(cli.verbose));

    let settings = ClientSettings {
        base_url: cli.api_base.clone(),
        request_timeout: cli.timeout_secs.map(Duration::from_secs),
        ..ClientSettings::default()
    };

    if cli.check {
        app::run_check(settings)?;
        return Ok(ExitCode::SUCCESS);
    }
    if cli.insights_only {
        let text = cli.text.as_deref().unwrap_or_default();
        app::run_insights(settings, text)?;
        return Ok(ExitCode::SUCCESS);
    }

    let engine = EngineHandle::new(settings).context("starting analysis engine")?;
    let runner = EffectRunner::new(engine);

    let one_shot = match (cli.text, cli.url) {
        (Some(text), _) => Some((AnalysisMode::Text, text)),
        (None, Some(url)) => Some((AnalysisMode::Url, url)),
        (None, None) => None,
    };

    match one_shot {
        Some((mode, value)) => {
            let succeeded = app::run_once(runner, mode, value, cli.full)?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            app::run_interactive(runner, cli.full)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
