use std::{io::stdout, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{self, Context};
use config::Settings;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

mod app;
mod console;
mod explorer;
mod logging;
mod prompt;
mod ui;
mod widgets;

use app::App;

#[derive(Debug, Parser)]
#[command(version, about = "A small editor for writing and running scripts")]
struct Args {
    /// File to open, or directory to browse
    path: Option<PathBuf>,

    /// Settings file to use instead of the default
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Interpreter used to run scripts
    #[clap(short, long)]
    interpreter: Option<String>,
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ezcode");
    let (log_tx, log_rx) = crossbeam_channel::unbounded();
    let _guard = logging::init(&log_dir, log_tx).context("setting up logging")?;

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("loading settings")?;
    if let Some(interpreter) = args.interpreter {
        settings.interpreter = interpreter;
    }
    tracing::debug!(?settings, "starting");

    let root = match &args.path {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) => path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| parent.to_path_buf())
            .unwrap_or(std::env::current_dir().context("getting current directory")?),
        None => std::env::current_dir().context("getting current directory")?,
    };

    let mut app = App::new(settings, root, log_rx);
    if let Some(path) = args.path.filter(|path| path.is_file()) {
        app.open_file(path);
    }

    let terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(stdout(), EnableMouseCapture) {
        tracing::warn!(error = %e, "could not enable mouse capture");
    }
    let result = app.run(terminal);
    let _ = crossterm::execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}
