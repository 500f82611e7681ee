mod app;
mod cli;
mod command;
mod config;
mod consts;
mod game;
mod highscores;
mod leaderboard;
mod logging;
mod name_entry;
mod util;
mod warning;
use crate::app::App;
use crate::cli::{Arguments, CliCommand};
use crate::config::{Config, GameConfig};
use crate::highscores::{ScoreStore, SqliteStore};
use crate::warning::Warning;
use anyhow::Context;
use std::io::{self, ErrorKind};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match CliCommand::from_env() {
        Ok(CliCommand::Run(args)) => args,
        Ok(CliCommand::Help) => {
            print!("{}", CliCommand::usage());
            return ExitCode::SUCCESS;
        }
        Ok(CliCommand::Version) => {
            println!("{}", CliCommand::version());
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("autosnake: {e}");
            eprintln!("Run `autosnake --help` for usage.");
            return ExitCode::from(2);
        }
    };
    let Setup {
        game,
        store,
        mut warnings,
    } = match setup(args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("autosnake: {e:?}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(database = %store.path().display(), "Using high score database");
    if let Err(e) = store.init() {
        tracing::warn!(error = %e, "Could not initialize high score database");
        warnings.push(Warning::from(e));
    }
    let mut app = App::new(store, game);
    for w in warnings {
        app.warn(w);
    }
    let terminal = ratatui::init();
    let r = app.run(terminal);
    ratatui::restore();
    tracing::info!("Exiting");
    io_exit(r)
}

/// Everything the application needs before the terminal is taken over
#[derive(Debug)]
struct Setup {
    game: GameConfig,
    store: SqliteStore,
    /// Problems that should be shown to the player but not stop the game
    warnings: Vec<Warning>,
}

/// Load the configuration, apply command-line overrides, and start logging
fn setup(args: Arguments) -> anyhow::Result<Setup> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => {
            let path = Config::default_path()?;
            Config::load(&path, true)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
    };
    if let Some(database) = args.database {
        config.files.set_database_path(database);
    }
    if args.autopilot {
        config.game.autopilot = true;
    }
    let mut warnings = Vec::new();
    if let Err(e) = logging::init(&config.files) {
        warnings.push(Warning::from(e));
    }
    let database = config
        .files
        .database_path()
        .context("failed to determine high score database path")?;
    Ok(Setup {
        game: config.game,
        store: SqliteStore::new(database),
        warnings,
    })
}

fn io_exit(r: io::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
    }
}
