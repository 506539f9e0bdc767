// Snake draft board entry point.
//
// Startup sequence:
// 1. Parse command-line arguments
// 2. Initialize tracing (log to file, not terminal)
// 3. Load config, apply `--teams`
// 4. Open the text store and load presets
// 5. Restore the startup text (`--file`, saved text, or first preset)
// 6. `--print`: render the board to stdout and exit
// 7. Otherwise spawn the app task and run the TUI until quit

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use snakeboard_core::config;
use snakeboard_core::presets;
use snakeboard_core::store::{self, MemoryStore, SqliteStore, TextStore};
use snakeboard_tui::app;
use snakeboard_tui::cli::Args;
use snakeboard_tui::print;
use snakeboard_tui::tui;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    init_tracing()?;
    info!("snakeboard starting up");

    let mut config = config::load_config().context("failed to load configuration")?;
    if let Some(teams) = args.teams {
        config.board.team_count = teams;
        // Configured names only apply to the configured team count
        if config.board.team_names.len() != teams {
            config.board.team_names.clear();
        }
    }
    info!("Config loaded: {} teams", config.board.team_count);

    let store = open_store(&config, args.no_store);

    let presets = presets::load_dir(Path::new(&config.presets.dir))
        .context("failed to load presets")?;

    let seed = match &args.file {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let mut app_state = app::AppState::new(config, store, presets);
    let source = app_state.restore_text(seed);
    info!("Startup text from {:?}", source);

    if args.print {
        return Ok(match print::render_session(&app_state.session) {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("snakeboard: {e}");
                ExitCode::FAILURE
            }
        });
    }

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    // Blocks until the user quits
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {:#}", e);
    }

    // The app task flushes unsaved text on the way out
    if tokio::time::timeout(std::time::Duration::from_secs(5), app_handle)
        .await
        .is_err()
    {
        warn!("App task did not finish within 5s");
    }

    info!("snakeboard shut down cleanly");
    Ok(ExitCode::SUCCESS)
}

/// SQLite at the configured path (or the platform data dir), falling back
/// to memory when it cannot be opened.
fn open_store(config: &config::Config, no_store: bool) -> Arc<dyn TextStore> {
    if no_store {
        info!("Store disabled; ranking text kept in memory");
        return Arc::new(MemoryStore::new());
    }

    let path = if config.storage.db_path.is_empty() {
        match store::default_db_path() {
            Some(path) => path.display().to_string(),
            None => {
                warn!("No platform data directory; ranking text kept in memory");
                return Arc::new(MemoryStore::new());
            }
        }
    } else {
        config.storage.db_path.clone()
    };

    match SqliteStore::open(&path) {
        Ok(db) => {
            info!("Database opened at {}", path);
            Arc::new(db)
        }
        Err(e) => {
            warn!("Failed to open database at {}: {:#}; using memory", path, e);
            Arc::new(MemoryStore::new())
        }
    }
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("snakeboard.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("snakeboard=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
