use std::{
    fmt,
    io::Write,
    process::{Child, ChildStdin, Stdio},
};

use crossbeam_channel::Receiver;
use runner::{
    OutputSink, Stream, StreamMessage,
    process::{self, Generation},
};

use crate::{Answer, Error, PackageManager, is_confirmation_prompt, validate_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageEvent {
    /// The package manager is waiting for a yes/no answer, see [`PackageOperation::respond`]
    Prompt(String),
    Finished { success: bool },
}

/// A running `<package manager> install|uninstall <name>` command.
///
/// Output is streamed to the caller's sink. When the package manager asks for confirmation
/// the operation reports [`PackageEvent::Prompt`] and waits for [`PackageOperation::respond`].
pub struct PackageOperation {
    action: Action,
    name: String,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    rx: Receiver<StreamMessage>,
    open_streams: usize,
    /// Trailing unterminated line of stdout and stderr, so a prompt split across reads
    /// is still recognised
    partial_lines: [String; 2],
    awaiting_answer: bool,
    cancelled: bool,
    finished: bool,
}

impl PackageOperation {
    /// Validate `name` and start the package manager.
    ///
    /// An empty name is rejected before any process is started. A package manager that
    /// cannot be started is reported through the output stream and finishes unsuccessfully.
    #[tracing::instrument(skip(manager), fields(program = %manager.program))]
    pub fn start(manager: &PackageManager, action: Action, name: &str) -> Result<Self, Error> {
        let name = validate_name(name)?.to_string();

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut command = manager.command(action.as_str(), [name.as_str()]);
        command.stdin(Stdio::piped());

        let (mut child, open_streams) =
            match process::spawn_streaming(&mut command, Generation::default(), tx.clone()) {
                Ok(child) => (Some(child), 2),
                Err(e) => {
                    tracing::warn!(error = %e, "could not start package manager");
                    let _ = tx.send(StreamMessage::Output {
                        generation: Generation::default(),
                        stream: Stream::Stderr,
                        text: format!("failed to start {}: {e}\n", manager.program),
                    });
                    (None, 0)
                }
            };
        let stdin = child.as_mut().and_then(|child| child.stdin.take());

        tracing::debug!("package operation started");
        Ok(Self {
            action,
            name,
            child,
            stdin,
            rx,
            open_streams,
            partial_lines: Default::default(),
            awaiting_answer: false,
            cancelled: false,
            finished: false,
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Channel carrying the package manager output, for use in a `select!` loop
    pub fn messages(&self) -> Receiver<StreamMessage> {
        self.rx.clone()
    }

    /// Handle a message from [`PackageOperation::messages`]
    pub fn on_message(
        &mut self,
        message: StreamMessage,
        sink: &mut impl OutputSink,
    ) -> Option<PackageEvent> {
        self.handle(message, sink).or_else(|| self.check_exit())
    }

    /// Deliver all pending output without blocking
    pub fn poll(&mut self, sink: &mut impl OutputSink) -> Vec<PackageEvent> {
        let mut events = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            events.extend(self.handle(message, sink));
        }
        events.extend(self.check_exit());
        events
    }

    fn handle(
        &mut self,
        message: StreamMessage,
        sink: &mut impl OutputSink,
    ) -> Option<PackageEvent> {
        match message {
            StreamMessage::Output { stream, text, .. } => {
                sink.append(stream, &text);
                let awaiting_answer = self.awaiting_answer;
                let partial = &mut self.partial_lines[stream_index(stream)];
                partial.push_str(&text);

                let prompt = if awaiting_answer {
                    None
                } else {
                    partial
                        .lines()
                        .rev()
                        .find(|line| is_confirmation_prompt(line))
                        .map(|line| line.trim().to_string())
                };
                match prompt {
                    Some(prompt) => {
                        partial.clear();
                        tracing::debug!("package manager is asking for confirmation");
                        self.awaiting_answer = true;
                        Some(PackageEvent::Prompt(prompt))
                    }
                    None => {
                        let line_start = partial.rfind('\n').map_or(0, |i| i + 1);
                        partial.drain(..line_start);
                        None
                    }
                }
            }
            StreamMessage::Closed { .. } => {
                self.open_streams = self.open_streams.saturating_sub(1);
                None
            }
        }
    }

    fn check_exit(&mut self) -> Option<PackageEvent> {
        if self.finished || self.open_streams > 0 {
            return None;
        }

        let success = match self.child.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(Some(status)) => status.success(),
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "could not query package manager status");
                    false
                }
            },
            None => false,
        };

        self.finished = true;
        self.stdin = None;
        let success = success && !self.cancelled;
        tracing::debug!(%success, "package operation finished");
        Some(PackageEvent::Finished { success })
    }

    /// Answer the pending confirmation prompt.
    ///
    /// `y` is passed on to the package manager. `n` cancels the operation, and anything else
    /// is treated as invalid and also terminates it.
    #[tracing::instrument(skip(self, sink))]
    pub fn respond(&mut self, input: &str, sink: &mut impl OutputSink) -> Result<Answer, Error> {
        if !self.awaiting_answer {
            return Err(Error::NoPendingPrompt);
        }
        self.awaiting_answer = false;

        let answer = Answer::parse(input);
        match &answer {
            Answer::Yes => {
                if let Some(stdin) = self.stdin.as_mut() {
                    stdin.write_all(b"y\n")?;
                    stdin.flush()?;
                }
            }
            Answer::No => {
                sink.append(Stream::Stdout, "Operation cancelled\n");
                self.cancel();
            }
            Answer::Invalid(response) => {
                sink.append(
                    Stream::Stdout,
                    &format!("Command terminated.\nResponse is {response}\n"),
                );
                self.cancel();
            }
        }
        Ok(answer)
    }

    /// Kill the package manager. The operation still reports
    /// [`PackageEvent::Finished`] once its output has been drained.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.awaiting_answer = false;
        self.stdin = None;
        if let Some(child) = self.child.as_mut() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "could not kill package manager");
            }
        }
    }
}

impl Drop for PackageOperation {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn stream_index(stream: Stream) -> usize {
    match stream {
        Stream::Stdout => 0,
        Stream::Stderr => 1,
    }
}

