use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::Settings;
use crossbeam_channel::Receiver;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use document::{
    BreakpointSet, Buffer, Markers, SaveOutcome, Viewport, VisibleLine, line_at, visible_lines,
};
use eyre::WrapErr;
use packages::{
    Action, Answer, InstalledPackage, PackageEvent, PackageManager, PackageOperation,
};
use ratatui::{
    DefaultTerminal,
    layout::{Position, Rect},
    widgets::ListState,
};
use runner::{RunConfig, RunOutcome, RunRelay, StreamMessage};

use crate::{
    console::OutputConsole,
    explorer::FileExplorer,
    prompt::{Prompt, PromptKind},
    ui,
    widgets::editor::char_column_at,
};

const TICK: Duration = Duration::from_millis(50);
const SCROLL_STEP: usize = 3;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Editor,
    Explorer,
    Console,
}

/// Screen areas from the last draw, used to route mouse clicks
#[derive(Debug, Default, Clone, Copy)]
pub struct Areas {
    pub explorer: Rect,
    pub gutter: Rect,
    pub editor: Rect,
    pub console: Rect,
}

pub enum PackagesOverlay {
    Hidden,
    Loading(oneshot::Receiver<Result<Vec<InstalledPackage>, packages::Error>>),
    Loaded(Vec<InstalledPackage>),
}

pub struct App {
    pub(crate) buffer: Buffer,
    pub(crate) breakpoints: BreakpointSet,
    pub(crate) markers: Markers,
    pub(crate) debugging: bool,
    pub(crate) relay: RunRelay,

    package_manager: PackageManager,
    pub(crate) package_op: Option<PackageOperation>,
    /// Output channel of `package_op` has disconnected, only its exit is left to collect
    package_streams_closed: bool,
    pub(crate) packages_overlay: PackagesOverlay,

    pub(crate) console: OutputConsole,
    pub(crate) explorer: FileExplorer,
    pub(crate) explorer_list: ListState,
    pub(crate) prompt: Option<Prompt>,
    pub(crate) status: String,
    pub(crate) focus: Focus,
    pub(crate) show_explorer: bool,
    pub(crate) show_console: bool,
    pub(crate) console_log: bool,
    pub(crate) tab_width: usize,

    /// Index of the first line shown in the editor
    pub(crate) scroll: usize,
    /// Bring the cursor into view on the next draw. Cleared once it has, so the mouse
    /// wheel can scroll away from the cursor.
    follow_cursor: bool,
    pub(crate) areas: Areas,

    logs: Receiver<String>,
    quit_armed: bool,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings, root: impl Into<PathBuf>, logs: Receiver<String>) -> Self {
        let relay = RunRelay::new(RunConfig {
            interpreter: settings.interpreter.clone(),
            extension: settings.source_extension.clone(),
            working_directory: None,
        });
        let package_manager = PackageManager::new(settings.package_manager.clone())
            .with_args(settings.package_manager_args.iter().cloned());

        Self {
            buffer: Buffer::new(),
            breakpoints: BreakpointSet::new(),
            markers: Markers::default(),
            debugging: false,
            relay,
            package_manager,
            package_op: None,
            package_streams_closed: false,
            packages_overlay: PackagesOverlay::Hidden,
            console: OutputConsole::default(),
            explorer: FileExplorer::new(root, settings.source_extension.clone()),
            explorer_list: ListState::default(),
            prompt: None,
            status: "Ready".to_string(),
            focus: Focus::Editor,
            show_explorer: settings.show_explorer,
            show_console: settings.show_console,
            console_log: settings.console_log,
            tab_width: settings.tab_width.max(1),
            scroll: 0,
            follow_cursor: true,
            areas: Areas::default(),
            logs,
            quit_armed: false,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> eyre::Result<()> {
        // set up background thread polling for terminal events
        let (tx, input) = crossbeam_channel::unbounded();
        std::thread::spawn(move || {
            loop {
                match event::read() {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "error reading from event stream");
                        break;
                    }
                }
            }
        });

        let logs = self.logs.clone();
        let run_messages = self.relay.messages();

        loop {
            if self.should_quit {
                tracing::info!("terminating application");
                return Ok(());
            }

            terminal
                .draw(|frame| ui::draw(frame, &mut self))
                .context("drawing frame")?;

            let package_messages = match &self.package_op {
                Some(op) if !self.package_streams_closed => op.messages(),
                _ => crossbeam_channel::never(),
            };

            crossbeam_channel::select! {
                recv(input) -> msg => {
                    let event = msg.context("terminal input closed")?;
                    self.handle_event(event);
                },
                recv(run_messages) -> msg => {
                    if let Ok(message) = msg {
                        self.on_run_message(message);
                    }
                },
                recv(package_messages) -> msg => match msg {
                    Ok(message) => self.on_package_message(message),
                    Err(_) => self.package_streams_closed = true,
                },
                recv(logs) -> msg => {
                    if let Ok(line) = msg {
                        self.on_log(line);
                    }
                },
                default(TICK) => self.tick(),
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn show_message(&mut self, title: &str, text: impl Into<String>) {
        self.prompt = Some(Prompt::message(title, text));
    }

    fn show_error(&mut self, title: &str, error: impl std::fmt::Display) {
        tracing::warn!(error = %error, "{title}");
        self.show_message(title, error.to_string());
    }

    /// Collect output, process exits and background results that did not arrive through
    /// the event loop
    pub fn tick(&mut self) {
        if let Some(outcome) = self.relay.poll(&mut self.console, &mut self.markers) {
            self.finish_run(outcome);
        }

        if let Some(op) = self.package_op.as_mut() {
            let events = op.poll(&mut self.console);
            for event in events {
                self.on_package_event(event);
            }
        }

        self.poll_package_list();

        while let Ok(line) = self.logs.try_recv() {
            self.on_log(line);
        }
    }

    fn on_log(&mut self, line: String) {
        if self.console_log {
            self.console.message(line);
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    // files

    pub fn open_file(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if path.is_dir() {
            self.explorer.set_root(path);
            self.set_status(format!("Browsing {}", path.display()));
            return;
        }

        match self.buffer.open(path) {
            Ok(()) => {
                self.markers = Markers::default();
                self.scroll = 0;
                self.follow_cursor = true;
                self.focus = Focus::Editor;
                tracing::info!(path = %path.display(), "file opened");
                self.set_status(format!("Opened {}", path.display()));
            }
            Err(e) => self.show_error("Could not open file", e),
        }
    }

    fn save(&mut self) {
        match self.buffer.save() {
            Ok(SaveOutcome::Saved(path)) => {
                tracing::info!(path = %path.display(), "file saved");
                self.set_status(format!("Saved {}", path.display()));
                self.explorer.refresh();
            }
            Ok(SaveOutcome::NeedsPath) => self.prompt_save_as(),
            Err(e) => self.show_error("Could not save file", e),
        }
    }

    fn save_as(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            self.show_message("Save as", "No file name given");
            return;
        }

        let path = PathBuf::from(input);
        match self.buffer.save_as(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "file saved");
                self.set_status(format!("Saved as {}", path.display()));
                self.explorer.refresh();
            }
            Err(e) => self.show_error("Could not save file", e),
        }
    }

    fn prompt_open(&mut self) {
        let initial = format!("{}/", self.explorer.root().display());
        self.prompt =
            Some(Prompt::new(PromptKind::OpenPath, "Open", "File to open:").with_input(initial));
    }

    fn prompt_save_as(&mut self) {
        let initial = match self.buffer.path() {
            Some(path) => path.to_path_buf(),
            None => self
                .explorer
                .root()
                .join(format!("untitled.{}", self.relay.config().extension)),
        };
        self.prompt = Some(
            Prompt::new(PromptKind::SaveAsPath, "Save as", "Save to:")
                .with_input(initial.display().to_string()),
        );
    }

    // running

    fn run_script(&mut self) {
        let source = self.buffer.text();
        match self.relay.start(&source, &mut self.markers) {
            Ok(()) => {
                let name = self
                    .buffer
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "untitled".to_string());
                tracing::info!(interpreter = %self.relay.config().interpreter, "run started");
                self.console.message(format!("---- Running {name} ----"));
                self.set_status("Running...");
            }
            Err(runner::Error::AlreadyRunning) => {
                self.set_status("A run is already in progress");
            }
            Err(e) => self.show_error("Could not run script", e),
        }
    }

    fn stop_script(&mut self) {
        match self.relay.stop(&mut self.console) {
            Ok(()) => {
                self.markers.clear_current_line();
                self.console.message("Execution stopped");
                self.set_status("Execution stopped");
            }
            Err(runner::Error::NotRunning) => self.set_status("Nothing is running"),
            Err(e) => self.show_error("Could not stop script", e),
        }
    }

    fn on_run_message(&mut self, message: StreamMessage) {
        if let Some(outcome) = self
            .relay
            .on_message(message, &mut self.console, &mut self.markers)
        {
            self.finish_run(outcome);
        }
    }

    fn finish_run(&mut self, outcome: RunOutcome) {
        tracing::info!(?outcome, "run finished");
        self.console.message(outcome.message());
        match outcome {
            RunOutcome::Failed {
                error_line: Some(line),
                ..
            } => self.set_status(format!("{} (line {line})", outcome.message())),
            _ => self.set_status(outcome.message()),
        }
    }

    // debugging

    fn toggle_debugging(&mut self) {
        self.debugging = !self.debugging;
        tracing::debug!(debugging = self.debugging, "debugging mode toggled");
        if self.debugging {
            self.set_status("Debugging mode enabled");
        } else {
            self.set_status("Debugging mode disabled");
        }
    }

    fn toggle_breakpoint(&mut self, line: usize) {
        if !self.debugging {
            self.set_status("Enable debugging mode (F8) to set breakpoints");
            return;
        }
        if line == 0 || line > self.buffer.line_count() {
            return;
        }
        if self.breakpoints.toggle(line) {
            self.set_status(format!("Breakpoint set on line {line}"));
        } else {
            self.set_status(format!("Breakpoint removed from line {line}"));
        }
    }

    fn clear_breakpoints(&mut self) {
        if !self.debugging {
            self.set_status("Enable debugging mode (F8) to clear breakpoints");
            return;
        }
        self.breakpoints.clear();
        self.set_status("All breakpoints removed");
    }

    // packages

    fn prompt_package_name(&mut self, action: Action) {
        self.prompt = Some(Prompt::new(
            PromptKind::PackageName(action),
            noun(action),
            format!("Package to {action}:"),
        ));
    }

    fn confirm_package(&mut self, action: Action, input: &str) {
        match packages::validate_name(input) {
            Ok(name) => {
                self.prompt = Some(Prompt::new(
                    PromptKind::ConfirmPackage(action, name.to_string()),
                    "Confirm",
                    format!("Are you sure you want to {action} {name}? (y/n)"),
                ));
            }
            Err(e) => {
                self.console.message(format!("Invalid input: {e}"));
                self.show_error("Invalid input", e);
            }
        }
    }

    fn start_package_operation(&mut self, action: Action, name: &str) {
        if self.package_op.is_some() {
            self.set_status("A package operation is already in progress");
            return;
        }

        match PackageOperation::start(&self.package_manager, action, name) {
            Ok(op) => {
                self.console.message(format!(
                    "---- {} {action} {} ----",
                    self.package_manager.program,
                    op.name()
                ));
                self.set_status(format!("Running {action} {}...", op.name()));
                self.package_op = Some(op);
                self.package_streams_closed = false;
            }
            Err(e) => {
                self.console.message(format!("Invalid input: {e}"));
                self.show_error("Invalid input", e);
            }
        }
    }

    fn respond_to_package_manager(&mut self, input: &str) {
        let Some(op) = self.package_op.as_mut() else {
            return;
        };
        let action = op.action();
        match op.respond(input, &mut self.console) {
            Ok(Answer::Yes) => self.set_status("Continuing..."),
            Ok(Answer::No) => self.set_status(format!("{} cancelled", noun(action))),
            Ok(Answer::Invalid(_)) => self.set_status("Command terminated"),
            Err(e) => self.show_error("Could not answer package manager", e),
        }
    }

    fn on_package_message(&mut self, message: StreamMessage) {
        let Some(op) = self.package_op.as_mut() else {
            return;
        };
        if let Some(event) = op.on_message(message, &mut self.console) {
            self.on_package_event(event);
        }
    }

    fn on_package_event(&mut self, event: PackageEvent) {
        match event {
            PackageEvent::Prompt(text) => {
                self.prompt = Some(Prompt::new(
                    PromptKind::PackageAnswer,
                    "Package manager",
                    format!("{text} (y/n)"),
                ));
            }
            PackageEvent::Finished { success } => {
                let Some(op) = self.package_op.take() else {
                    return;
                };
                if matches!(&self.prompt, Some(p) if p.kind == PromptKind::PackageAnswer) {
                    self.prompt = None;
                }
                let message = if success {
                    format!("{} of {} finished", noun(op.action()), op.name())
                } else {
                    format!("{} of {} failed", noun(op.action()), op.name())
                };
                tracing::info!(
                    action = %op.action(),
                    name = op.name(),
                    success,
                    "package operation finished"
                );
                self.console.message(&message);
                self.set_status(message);
                self.package_streams_closed = false;
            }
        }
    }

    fn list_packages(&mut self) {
        tracing::debug!("listing installed packages");
        let rx = packages::list_installed(&self.package_manager);
        self.packages_overlay = PackagesOverlay::Loading(rx);
    }

    fn poll_package_list(&mut self) {
        let result = match &self.packages_overlay {
            PackagesOverlay::Loading(rx) => rx.try_recv(),
            _ => return,
        };
        match result {
            Ok(Ok(packages)) => self.packages_overlay = PackagesOverlay::Loaded(packages),
            Ok(Err(e)) => {
                self.packages_overlay = PackagesOverlay::Hidden;
                self.show_error("Could not list packages", e);
            }
            Err(oneshot::TryRecvError::Empty) => {}
            Err(oneshot::TryRecvError::Disconnected) => {
                self.packages_overlay = PackagesOverlay::Hidden;
                self.show_error("Could not list packages", packages::Error::WorkerGone);
            }
        }
    }

    // input

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }

        if !matches!(self.packages_overlay, PackagesOverlay::Hidden) {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                self.packages_overlay = PackagesOverlay::Hidden;
            }
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !(ctrl && key.code == KeyCode::Char('q')) {
            self.quit_armed = false;
        }

        match key.code {
            KeyCode::Char('q') if ctrl => self.quit(),
            KeyCode::Char('o') if ctrl => self.prompt_open(),
            KeyCode::Char('s') if ctrl => self.save(),
            KeyCode::F(12) => self.prompt_save_as(),
            KeyCode::F(5) if key.modifiers.contains(KeyModifiers::SHIFT) => self.stop_script(),
            KeyCode::F(5) => self.run_script(),
            KeyCode::F(6) => self.stop_script(),
            KeyCode::F(8) => self.toggle_debugging(),
            KeyCode::F(9) if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.clear_breakpoints()
            }
            KeyCode::F(9) => self.toggle_breakpoint(self.buffer.cursor_line_number()),
            KeyCode::Char('b') if ctrl => {
                self.show_explorer = !self.show_explorer;
                if !self.show_explorer && self.focus == Focus::Explorer {
                    self.focus = Focus::Editor;
                }
            }
            KeyCode::Char('j') if ctrl => {
                self.show_console = !self.show_console;
                if !self.show_console && self.focus == Focus::Console {
                    self.focus = Focus::Editor;
                }
            }
            KeyCode::Char('l') if ctrl => self.console.clear(),
            KeyCode::Char('g') if ctrl => {
                self.console_log = !self.console_log;
                if self.console_log {
                    self.set_status("Console log capture enabled");
                } else {
                    self.set_status("Console log capture disabled");
                }
            }
            KeyCode::F(2) => self.prompt_package_name(Action::Install),
            KeyCode::F(3) => self.prompt_package_name(Action::Uninstall),
            KeyCode::F(4) => self.list_packages(),
            KeyCode::Tab => self.focus = self.next_focus(),
            _ => match self.focus {
                Focus::Editor => self.handle_editor_key(key),
                Focus::Explorer => self.handle_explorer_key(key.code),
                Focus::Console => self.handle_console_key(key.code),
            },
        }
    }

    fn quit(&mut self) {
        if self.buffer.is_modified() && !self.quit_armed {
            self.quit_armed = true;
            self.set_status("Unsaved changes, press Ctrl-Q again to quit");
            return;
        }
        self.should_quit = true;
    }

    fn next_focus(&self) -> Focus {
        let order = [Focus::Editor, Focus::Console, Focus::Explorer];
        let start = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        (1..=order.len())
            .map(|i| order[(start + i) % order.len()])
            .find(|f| match f {
                Focus::Editor => true,
                Focus::Console => self.show_console,
                Focus::Explorer => self.show_explorer,
            })
            .unwrap_or(Focus::Editor)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };

        match (prompt.kind.clone(), key.code) {
            (PromptKind::Message, _) => self.prompt = None,
            (
                PromptKind::ConfirmPackage(action, name),
                KeyCode::Char('y' | 'Y') | KeyCode::Enter,
            ) => {
                self.prompt = None;
                self.start_package_operation(action, &name);
            }
            (PromptKind::ConfirmPackage(action, _), KeyCode::Char('n' | 'N') | KeyCode::Esc) => {
                self.prompt = None;
                let message = format!("{} cancelled", noun(action));
                self.console.message(&message);
                self.set_status(message);
            }
            (PromptKind::ConfirmPackage(..), _) => {}
            (PromptKind::PackageAnswer, KeyCode::Esc) => {
                self.prompt = None;
                self.respond_to_package_manager("n");
            }
            (_, KeyCode::Esc) => self.prompt = None,
            (kind, KeyCode::Enter) => {
                let input = std::mem::take(&mut prompt.input);
                self.prompt = None;
                self.submit_prompt(kind, &input);
            }
            (_, KeyCode::Char(c)) => prompt.enter_char(c),
            (_, KeyCode::Backspace) => prompt.delete_char(),
            (_, KeyCode::Left) => prompt.move_cursor_left(),
            (_, KeyCode::Right) => prompt.move_cursor_right(),
            _ => {}
        }
    }

    fn submit_prompt(&mut self, kind: PromptKind, input: &str) {
        match kind {
            PromptKind::OpenPath => {
                let path = input.trim();
                if path.is_empty() {
                    self.show_message("Open", "No file name given");
                } else {
                    self.open_file(path);
                }
            }
            PromptKind::SaveAsPath => self.save_as(input),
            PromptKind::PackageName(action) => self.confirm_package(action, input),
            PromptKind::PackageAnswer => self.respond_to_package_manager(input),
            PromptKind::ConfirmPackage(..) | PromptKind::Message => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let page = usize::from(self.areas.editor.height.max(1));
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        self.follow_cursor = true;
        match key.code {
            KeyCode::Char(c) if plain => self.buffer.insert_char(c),
            KeyCode::Enter => self.buffer.insert_newline(),
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(1),
            KeyCode::Down => self.buffer.move_down(1),
            KeyCode::PageUp => self.buffer.move_up(page),
            KeyCode::PageDown => self.buffer.move_down(page),
            KeyCode::Home => self.buffer.move_home(),
            KeyCode::End => self.buffer.move_end(),
            _ => {}
        }
    }

    fn handle_explorer_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.explorer.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.explorer.select_previous(),
            KeyCode::Enter | KeyCode::Right => {
                if let Some(path) = self.explorer.activate() {
                    self.open_file(path);
                }
            }
            KeyCode::Backspace | KeyCode::Left => self.explorer.go_up(),
            KeyCode::Char('.') => self.explorer.toggle_show_all(),
            KeyCode::Char('r') => self.explorer.refresh(),
            _ => {}
        }
    }

    fn handle_console_key(&mut self, code: KeyCode) {
        let page = usize::from(self.areas.console.height.max(1));
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.console.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.console.scroll_down(1),
            KeyCode::PageUp => self.console.scroll_up(page),
            KeyCode::PageDown => self.console.scroll_down(page),
            KeyCode::End => self.console.scroll_down(usize::MAX),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.prompt.is_some() || !matches!(self.packages_overlay, PackagesOverlay::Hidden) {
            return;
        }

        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.areas.gutter.contains(position) {
                    let y = f32::from(mouse.row - self.areas.gutter.y);
                    let lines = self.visible_lines(self.areas.gutter.height);
                    if let Some(line) = line_at(lines, y) {
                        self.toggle_breakpoint(line);
                    }
                } else if self.areas.editor.contains(position) {
                    self.focus = Focus::Editor;
                    self.follow_cursor = true;
                    let line = (self.scroll + usize::from(mouse.row - self.areas.editor.y))
                        .min(self.buffer.line_count().saturating_sub(1));
                    let screen_column = usize::from(mouse.column - self.areas.editor.x);
                    let column = self
                        .buffer
                        .line(line)
                        .map(|text| char_column_at(text, screen_column, self.tab_width))
                        .unwrap_or(0);
                    self.buffer.move_to(line, column);
                } else if self.show_explorer && self.areas.explorer.contains(position) {
                    self.focus = Focus::Explorer;
                    // first row is the border
                    let Some(row) = (mouse.row - self.areas.explorer.y).checked_sub(1) else {
                        return;
                    };
                    let index = self.explorer_list.offset() + usize::from(row);
                    if index >= self.explorer.entries().len() {
                        return;
                    }
                    if index == self.explorer.selected() {
                        if let Some(path) = self.explorer.activate() {
                            self.open_file(path);
                        }
                    } else {
                        self.explorer.select(index);
                    }
                } else if self.show_console && self.areas.console.contains(position) {
                    self.focus = Focus::Console;
                }
            }
            MouseEventKind::ScrollUp => {
                if self.show_console && self.areas.console.contains(position) {
                    self.console.scroll_up(SCROLL_STEP);
                } else {
                    self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                }
            }
            MouseEventKind::ScrollDown => {
                if self.show_console && self.areas.console.contains(position) {
                    self.console.scroll_down(SCROLL_STEP);
                } else {
                    let last = self.buffer.line_count().saturating_sub(1);
                    self.scroll = (self.scroll + SCROLL_STEP).min(last);
                }
            }
            _ => {}
        }
    }

    // layout

    /// Lines of the editor visible in a pane `height` rows tall, one row per line
    pub(crate) fn visible_lines(&self, height: u16) -> Vec<VisibleLine> {
        let remaining = self.buffer.line_count().saturating_sub(self.scroll);
        visible_lines(
            std::iter::repeat_n(1.0, remaining),
            self.scroll + 1,
            0.0,
            Viewport::with_height(f32::from(height)),
        )
        .collect()
    }

    /// Scroll so the cursor line is inside a pane `height` rows tall, if the cursor has
    /// moved since the last call
    pub(crate) fn scroll_to_cursor(&mut self, height: u16) {
        if !std::mem::take(&mut self.follow_cursor) {
            return;
        }
        let height = usize::from(height.max(1));
        let line = self.buffer.cursor().line;
        if line < self.scroll {
            self.scroll = line;
        } else if line >= self.scroll + height {
            self.scroll = line + 1 - height;
        }
    }
}

/// Name of the operation for messages, e.g. "Installation cancelled"
fn noun(action: Action) -> &'static str {
    match action {
        Action::Install => "Installation",
        Action::Uninstall => "Uninstallation",
    }
}
