use anyhow::Result;
use chrono::Local;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::{rngs::StdRng, SeedableRng};
use ratatui::backend::CrosstermBackend;
use std::io::stdout;
use std::sync::Arc;
use tracing::{error, info};

mod accordion;
mod app;
mod boot;
mod calendar;
mod chat;
mod color;
mod config;
mod content;
mod error;
mod logging;
mod media;
mod nav;
mod panels;
mod prefs;
mod status;
mod ui;

use app::{App, Shell};
use config::{Cli, Paths};
use content::{spawn_loader, DirSource};
use prefs::{FileStore, Preferences};
use ui::Term;

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn init_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(ratatui::Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Session ───────────────────────────────────────────────────────────────────

fn run(terminal: &mut Term, app: &mut App, cli: &Cli) -> Result<()> {
    if !cli.no_boot {
        boot::loading_screen(terminal, app)?;
    }
    if let Err(err) = app.open(&cli.panel) {
        error!(panel = %cli.panel, error = %err, "initial panel unavailable");
    }
    app.run(terminal)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::resolve(&cli);
    logging::init(&paths.log_file());
    info!(
        data_dir = %paths.data_dir.display(),
        config_dir = %paths.config_dir.display(),
        "starting hourglass"
    );

    let prefs = Preferences::new(FileStore::open(paths.prefs_file()));
    let shell = Shell::new(prefs, Local::now().date_naive(), StdRng::from_entropy());
    let loader = spawn_loader(Arc::new(DirSource::new(paths.data_dir.clone())));
    let mut app = App::new(shell, loader);

    let mut terminal = init_terminal()?;

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        run(&mut terminal, &mut app, &cli)
    }));

    // Always restore terminal
    restore_terminal(&mut terminal).ok();

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!(error = %e, "session aborted");
            Err(e)
        }
        Err(_) => {
            eprintln!("hourglass crashed. See {}", paths.log_file().display());
            Ok(())
        }
    }
}
