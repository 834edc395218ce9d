//! Narrative Nexus terminal player.
//!
//! A vim-style terminal interface for reading and writing branching stories.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripting
//! and automated testing:
//!
//! ```bash
//! cargo run -p nexus -- --headless --story my_story.json
//! ```

mod app;
mod events;
mod headless;
mod ui;

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use nexus_core::persist::{
    export_story_file, import_story_file, list_story_exports, write_transcript,
};
use nexus_core::session::DEFAULT_PROGRESS_HORIZON;
use nexus_core::{PlayerConfig, Playthrough, StoryGraph};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::{App, PendingIo};
use events::{handle_event, EventResult};
use ui::render::render;

const DEFAULT_LOG_FILTER: &str = "nexus=info,nexus_core=info";

#[derive(Parser, Debug)]
#[command(name = "nexus", version, about = "Read and write branching stories in the terminal")]
struct Cli {
    /// Run the line-oriented player instead of the TUI
    #[arg(long)]
    headless: bool,

    /// Story file to open instead of the built-in sample
    #[arg(long, env = "NEXUS_STORY")]
    story: Option<PathBuf>,

    /// Directory for story exports and transcripts
    #[arg(long, env = "NEXUS_EXPORT_DIR", default_value = ".")]
    export_dir: PathBuf,

    /// Log file used while the TUI owns the terminal
    #[arg(long, env = "NEXUS_LOG_FILE", default_value = "nexus.log")]
    log_file: PathBuf,

    /// Steps after which the progress bar is full
    #[arg(long, default_value_t = DEFAULT_PROGRESS_HORIZON)]
    horizon: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli)?;

    let play = open_playthrough(&cli).await?;

    if cli.headless {
        return headless::run_headless(play).await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(play)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result.context("terminal player failed")
}

/// Headless output goes to stderr; the TUI logs to a file so it doesn't
/// draw over the screen.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if cli.headless {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    } else {
        let file = File::create(&cli.log_file)
            .with_context(|| format!("cannot create log file {}", cli.log_file.display()))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    }
    Ok(())
}

async fn open_playthrough(cli: &Cli) -> anyhow::Result<Playthrough> {
    let play = match &cli.story {
        Some(path) => {
            let definition = import_story_file(path)
                .await
                .with_context(|| format!("cannot open story {}", path.display()))?;
            Playthrough::new(StoryGraph::from_definition(definition))
                .with_context(|| format!("cannot start story {}", path.display()))?
        }
        None => Playthrough::sample().context("built-in story is broken")?,
    };

    let config = PlayerConfig::new()
        .with_progress_horizon(cli.horizon)
        .with_export_dir(&cli.export_dir);
    tracing::info!(
        nodes = play.graph().len(),
        export_dir = %cli.export_dir.display(),
        "Story opened"
    );
    Ok(play.with_config(config))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // File work queued by commands
        if let Some(pending) = app.pending_io.take() {
            process_pending_io(&mut app, pending).await;
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn process_pending_io(app: &mut App, pending: PendingIo) {
    match pending {
        PendingIo::Export(path) => match export_story_file(app.play.graph(), &path).await {
            Ok(()) => app.set_status(format!("💾 Story exported to {}", path.display())),
            Err(e) => app.set_status(format!("Export failed: {e}")),
        },
        PendingIo::Import(path) => match import_story_file(&path).await {
            Ok(definition) => app.load_story(definition, &path),
            Err(e) => app.set_status(format!("Import failed: {e}")),
        },
        PendingIo::ImportLatest => {
            let dir = app.play.config().export_dir.clone();
            match list_story_exports(&dir).await {
                Ok(exports) => match exports.into_iter().next() {
                    Some(latest) => match import_story_file(&latest.path).await {
                        Ok(definition) => app.load_story(definition, &latest.path),
                        Err(e) => app.set_status(format!("Import failed: {e}")),
                    },
                    None => app.set_status(format!("No story exports in {}", dir.display())),
                },
                Err(e) => app.set_status(format!("Import failed: {e}")),
            }
        }
        PendingIo::Transcript(path) => match write_transcript(app.play.session(), &path).await {
            Ok(()) => app.set_status(format!("📜 Adventure saved to {}", path.display())),
            Err(e) => app.set_status(format!("Transcript failed: {e}")),
        },
    }
}
