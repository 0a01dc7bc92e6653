use std::{
    io::Write,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
};

use crossbeam_channel::{Receiver, Sender};
use document::Markers;
use tempfile::TempPath;

use crate::{
    Error, OutputSink, Stream, StreamMessage,
    process::{self, Generation},
    trace,
};

/// How scripts are run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Interpreter program, invoked with the script path as its only argument
    pub interpreter: String,

    /// File extension given to the temporary script, without the leading dot
    pub extension: String,

    /// Working directory of the interpreter (defaults to the current directory)
    pub working_directory: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            extension: "py".to_string(),
            working_directory: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Succeeded,
    Failed {
        /// `None` if the process could not be started or was killed by a signal
        exit_code: Option<i32>,
        /// Line taken from the error trace, if there was one
        error_line: Option<usize>,
    },
}

impl RunOutcome {
    /// Message for the status bar
    pub fn message(&self) -> &'static str {
        match self {
            RunOutcome::Succeeded => "Execution finished",
            RunOutcome::Failed { .. } => "Error occurred during execution",
        }
    }
}

struct ActiveRun {
    generation: Generation,
    /// `None` when the interpreter could not be started
    child: Option<Child>,
    script: TempPath,
    open_streams: usize,
    stderr: String,
}

/// Runs the editor contents in an external interpreter, one run at a time.
///
/// ```text
/// Idle --start--> Running --exit 0, no stderr--> Succeeded
///                         --otherwise----------> Failed
///                         --stop---------------> Idle
/// ```
///
/// The relay is owned by the UI thread. Output is read on background threads and delivered
/// through [`RunRelay::messages`]; feed those messages back in with [`RunRelay::on_message`]
/// or drain them with [`RunRelay::poll`].
pub struct RunRelay {
    config: RunConfig,
    state: RunState,
    tx: Sender<StreamMessage>,
    rx: Receiver<StreamMessage>,
    generation: Generation,
    active: Option<ActiveRun>,
}

impl RunRelay {
    pub fn new(config: RunConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            config,
            state: RunState::Idle,
            tx,
            rx,
            generation: Generation::default(),
            active: None,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Location of the temporary script of the current run
    pub fn script_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|run| &*run.script as &Path)
    }

    /// Channel carrying process output, for use in a `select!` loop
    pub fn messages(&self) -> Receiver<StreamMessage> {
        self.rx.clone()
    }

    /// Start running `source`.
    ///
    /// Rejected while a run is in progress; the running process and its output are left
    /// alone. If the interpreter cannot be started the failure is reported through the
    /// output stream and the run ends as [`RunOutcome::Failed`].
    #[tracing::instrument(skip(self, source, markers))]
    pub fn start(&mut self, source: &str, markers: &mut Markers) -> Result<(), Error> {
        if self.is_running() {
            tracing::warn!("rejecting run request, a run is already in progress");
            return Err(Error::AlreadyRunning);
        }

        let script = self.write_script(source)?;
        markers.clear_current_line();

        self.generation = self.generation.next();
        let generation = self.generation;

        let mut command = Command::new(&self.config.interpreter);
        command.arg(&*script).stdin(Stdio::null());
        if let Some(cwd) = &self.config.working_directory {
            command.current_dir(cwd);
        }

        let (child, open_streams) =
            match process::spawn_streaming(&mut command, generation, self.tx.clone()) {
                Ok(child) => (Some(child), 2),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        interpreter = %self.config.interpreter,
                        "could not start interpreter"
                    );
                    let _ = self.tx.send(StreamMessage::Output {
                        generation,
                        stream: Stream::Stderr,
                        text: format!("failed to start {}: {e}\n", self.config.interpreter),
                    });
                    (None, 0)
                }
            };

        tracing::debug!(?generation, script = %script.display(), "run started");
        self.active = Some(ActiveRun {
            generation,
            child,
            script,
            open_streams,
            stderr: String::new(),
        });
        self.state = RunState::Running;
        Ok(())
    }

    fn write_script(&self, source: &str) -> Result<TempPath, Error> {
        let suffix = format!(".{}", self.config.extension);
        let mut file = tempfile::Builder::new()
            .prefix("ezcode-")
            .suffix(&suffix)
            .tempfile()
            .map_err(Error::Script)?;
        file.write_all(source.as_bytes()).map_err(Error::Script)?;
        file.flush().map_err(Error::Script)?;
        // close our handle so the interpreter is the only reader
        Ok(file.into_temp_path())
    }

    /// Handle a message from [`RunRelay::messages`], returning the outcome if the run ended
    pub fn on_message(
        &mut self,
        message: StreamMessage,
        sink: &mut impl OutputSink,
        markers: &mut Markers,
    ) -> Option<RunOutcome> {
        self.handle(message, sink);
        self.check_exit(markers)
    }

    /// Deliver all pending output without blocking, returning the outcome if the run ended
    pub fn poll(
        &mut self,
        sink: &mut impl OutputSink,
        markers: &mut Markers,
    ) -> Option<RunOutcome> {
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message, sink);
        }
        self.check_exit(markers)
    }

    fn handle(&mut self, message: StreamMessage, sink: &mut impl OutputSink) {
        let Some(run) = self.active.as_mut() else {
            tracing::trace!("dropping output, no run in progress");
            return;
        };
        if message.generation() != run.generation {
            tracing::trace!(
                generation = ?message.generation(),
                "dropping output from a previous run"
            );
            return;
        }

        match message {
            StreamMessage::Output { stream, text, .. } => {
                if stream == Stream::Stderr {
                    run.stderr.push_str(&text);
                }
                sink.append(stream, &text);
            }
            StreamMessage::Closed { stream, .. } => {
                tracing::trace!(?stream, "stream closed");
                run.open_streams = run.open_streams.saturating_sub(1);
            }
        }
    }

    fn check_exit(&mut self, markers: &mut Markers) -> Option<RunOutcome> {
        let run = self.active.as_mut()?;
        if run.open_streams > 0 {
            return None;
        }

        let exit_code = match run.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => status.code(),
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "could not query process status");
                    None
                }
            },
            None => None,
        };

        let run = self.active.take()?;
        Some(self.finish(run, exit_code, markers))
    }

    #[tracing::instrument(skip(self, run, markers))]
    fn finish(
        &mut self,
        run: ActiveRun,
        exit_code: Option<i32>,
        markers: &mut Markers,
    ) -> RunOutcome {
        let ActiveRun { script, stderr, .. } = run;
        remove_script(script);

        markers.clear_current_line();
        let outcome = if exit_code == Some(0) && stderr.is_empty() {
            markers.clear_error_line();
            self.state = RunState::Succeeded;
            RunOutcome::Succeeded
        } else {
            let error_line = trace::last_error_line(&stderr);
            match error_line {
                Some(line) => markers.set_error_line(line),
                None => markers.clear_error_line(),
            }
            self.state = RunState::Failed;
            RunOutcome::Failed {
                exit_code,
                error_line,
            }
        };
        tracing::debug!(?outcome, "run finished");
        outcome
    }

    /// Kill the running process.
    ///
    /// Output that has already arrived is delivered to `sink`; anything the process writes
    /// afterwards is discarded.
    #[tracing::instrument(skip(self, sink))]
    pub fn stop(&mut self, sink: &mut impl OutputSink) -> Result<(), Error> {
        if !self.is_running() {
            return Err(Error::NotRunning);
        }

        while let Ok(message) = self.rx.try_recv() {
            self.handle(message, sink);
        }

        if let Some(mut run) = self.active.take() {
            if let Some(child) = run.child.as_mut() {
                kill(child);
            }
            remove_script(run.script);
        }
        self.state = RunState::Idle;
        tracing::debug!("run stopped");
        Ok(())
    }
}

impl Drop for RunRelay {
    fn drop(&mut self) {
        if let Some(child) = self.active.as_mut().and_then(|run| run.child.as_mut()) {
            kill(child);
        }
    }
}

fn kill(child: &mut Child) {
    match child.kill() {
        Ok(_) => {
            tracing::debug!("process terminated");
            let _ = child.wait();
        }
        Err(e) => tracing::warn!(error = %e, "could not terminate process"),
    }
}

fn remove_script(script: TempPath) {
    if let Err(e) = script.close() {
        tracing::debug!(error = %e, "could not remove temporary script");
    }
}
