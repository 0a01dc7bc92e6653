use std::{fmt::Write as _, path::Path};

use crossbeam_channel::Sender;
use eyre::WrapErr;
use tracing::{
    Event, Subscriber,
    field::{Field, Visit},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, filter::LevelFilter, layer::Context, prelude::*};

const LOG_FILE: &str = "ezcode.log";
const DEFAULT_DIRECTIVES: &str = "ezcode=info,runner=info,packages=info,document=info";

/// Install the global subscriber.
///
/// Everything is written to a log file under `log_dir`, filtered by `RUST_LOG` (or a default of
/// `info` for our own crates). Info level and above is also sent down `console` so the UI can
/// copy it into the output console.
pub fn init(log_dir: &Path, console: Sender<String>) -> eyre::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("building log filter")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter),
        )
        .with(ConsoleLayer::new(console).with_filter(LevelFilter::INFO))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

/// Forwards formatted log events over a channel
pub struct ConsoleLayer {
    tx: Sender<String>,
}

impl ConsoleLayer {
    pub fn new(tx: Sender<String>) -> Self {
        Self { tx }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut line = format!("[{}] {}", metadata.level(), visitor.message);
        for (name, value) in visitor.fields {
            let _ = write!(line, " {name}={value}");
        }
        // the receiver only goes away on shutdown
        let _ = self.tx.send(line);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}
