use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;

use glam::Vec2;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use wordsmith_client::terminal::{TerminalGuard, TerminalSink, spawn_input_reader};
use wordsmith_client::theme::Theme;
use wordsmith_client::{Client, ClientError, run_game_loop};
use wordsmith_platformer::WordsmithGame;
use wordsmith_platformer::config::WordsmithConfig;

/// Environment variable naming the log file.
const LOG_ENV: &str = "WORDSMITH_LOG";
const DEFAULT_LOG_PATH: &str = "wordsmith.log";

/// Log to a file: the terminal itself is the display surface.
fn init_tracing() -> io::Result<()> {
    let path = std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

async fn run() -> Result<(), ClientError> {
    let config = WordsmithConfig::load();
    let game = WordsmithGame::new(config)?;
    let logical = Vec2::new(game.level().width(), game.level().height());
    let mut client = Client::new(game, Theme::load());

    let guard = TerminalGuard::enter()?;
    let mut sink = TerminalSink::new(io::stdout(), logical)?;

    let (host_tx, host_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let reader = spawn_input_reader(host_tx, cancel.clone(), guard.reports_releases());
    let result = run_game_loop(&mut client, &mut sink, host_rx, cancel.clone()).await;

    cancel.cancel();
    if reader.join().is_err() {
        tracing::warn!("Input reader thread panicked");
    }
    drop(guard);

    let exit = result?;
    tracing::info!(?exit, "Wordsmith stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = init_tracing() {
        eprintln!("wordsmith: cannot open log file: {e}");
    }

    tracing::info!("Wordsmith starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Wordsmith failed");
            eprintln!("wordsmith: {e}");
            ExitCode::FAILURE
        },
    }
}
