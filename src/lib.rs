pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod resilience;

use std::sync::Arc;

use anyhow::{Context, Result};
use app::{
    events::{AppEvent, start_refresh_task},
    input::{Command, HELP_TEXT, parse_command},
    report::{render_json, render_report, render_state, status_line},
    settings::load_runtime_settings,
    state::{AppState, CommitOutcome, LoadState},
};
use cli::{Cli, IconMode};
use data::provider::{OpenWeatherProvider, ProviderConfig, WeatherProvider};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level.as_deref());
    cli.validate()?;

    let (settings, settings_path) = load_runtime_settings(&cli, !cli.one_shot);
    let config = ProviderConfig::from_cli(&cli);
    debug!(?config, "provider configured");
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherProvider::new(&config));
    let mut app = AppState::new(provider, settings, settings_path);

    let (tx, rx) = mpsc::channel::<AppEvent>(64);
    if cli.one_shot {
        run_once(&mut app, &cli, &tx, rx).await
    } else {
        run_interactive(&mut app, &cli, &tx, rx).await
    }
}

/// Installs the stderr subscriber; `--log-level` beats `RUST_LOG`.
fn init_tracing(level: Option<&str>) {
    let filter = level
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run_once(
    app: &mut AppState,
    cli: &Cli,
    tx: &mpsc::Sender<AppEvent>,
    mut rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    app.request_location(cli.default_city(), tx);
    while !app.is_settled() {
        let Some(event) = rx.recv().await else {
            break;
        };
        app.handle_event(event, tx);
    }

    match (app.mode(), app.snapshot()) {
        (LoadState::Ready, Some(snapshot)) => {
            let suggestions = app.suggestions();
            let output = if cli.json {
                render_json(snapshot, &suggestions).context("serializing weather report failed")?
            } else {
                render_report(snapshot, &suggestions, app.units, cli.icon_mode())
            };
            println!("{output}");
            Ok(())
        }
        _ => anyhow::bail!("{}", status_line(app)),
    }
}

async fn run_interactive(
    app: &mut AppState,
    cli: &Cli,
    tx: &mpsc::Sender<AppEvent>,
    mut rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let icons = cli.icon_mode();
    if app.settings.refresh_enabled() {
        start_refresh_task(tx.clone(), app.settings.refresh_interval_secs);
    }

    println!("WeatherWise. {HELP_TEXT}");
    app.request_location(cli.default_city(), tx);
    println!("{}", status_line(app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while app.running {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("reading stdin failed")? {
                    Some(line) => handle_command(app, parse_command(&line), tx, icons),
                    None => app.running = false,
                }
            }
            Some(event) = rx.recv() => {
                if app.handle_event(event, tx) == Some(CommitOutcome::Committed) {
                    println!("{}", render_state(app, icons));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                app.handle_event(AppEvent::Quit, tx);
            }
        }
    }

    Ok(())
}

fn handle_command(
    app: &mut AppState,
    command: Command,
    tx: &mpsc::Sender<AppEvent>,
    icons: IconMode,
) {
    match command {
        Command::Empty => {}
        Command::Quit => {
            app.handle_event(AppEvent::Quit, tx);
        }
        Command::Help => println!("{HELP_TEXT}"),
        Command::Recent => {
            for (index, name) in app.settings.recent_locations.iter().enumerate() {
                println!("  {}. {name}", index + 1);
            }
        }
        Command::SetUnits(units) => {
            app.set_units(units);
            println!("{}", render_state(app, icons));
        }
        Command::Refresh => match app.active_query().map(str::to_string) {
            Some(query) => search(app, query, tx),
            None => println!("{}", status_line(app)),
        },
        Command::PickRecent(index) => {
            match app.settings.recent_locations.get(index - 1).cloned() {
                Some(query) => search(app, query, tx),
                None => println!("No recent location #{index}."),
            }
        }
        Command::Search(query) => search(app, query, tx),
    }
}

fn search(app: &mut AppState, query: String, tx: &mpsc::Sender<AppEvent>) {
    app.handle_event(AppEvent::RequestLocation(query), tx);
    println!("{}", status_line(app));
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use futures::{FutureExt, future::BoxFuture};

    use super::*;
    use crate::{
        app::settings::RuntimeSettings,
        data::{error::FetchError, provider::RawWeather},
    };

    #[derive(Debug)]
    struct UnknownPlaces;

    impl WeatherProvider for UnknownPlaces {
        fn fetch_raw_weather<'a>(
            &'a self,
            query: &'a str,
        ) -> BoxFuture<'a, Result<RawWeather, FetchError>> {
            futures::future::ready(Err(FetchError::GeocodeNotFound {
                query: query.to_string(),
            }))
            .boxed()
        }
    }

    #[tokio::test]
    async fn failed_one_shot_run_returns_the_status_as_error() {
        let cli = Cli::parse_from(["weatherwise", "--one-shot", "Atlantis"]);
        let mut app = AppState::new(Arc::new(UnknownPlaces), RuntimeSettings::default(), None);
        let (tx, rx) = mpsc::channel(8);

        let err = run_once(&mut app, &cli, &tx, rx)
            .await
            .expect_err("one-shot should fail");

        assert_eq!(err.to_string(), "Location not found: Atlantis");
        assert_eq!(app.mode(), LoadState::Failed);
        assert!(app.settings.recent_locations.iter().all(|name| name != "Atlantis"));
    }
}
