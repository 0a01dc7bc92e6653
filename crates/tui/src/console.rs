use runner::{OutputSink, Stream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Stdout,
    Stderr,
    /// Messages from the editor itself
    Info,
}

impl From<Stream> for LineKind {
    fn from(stream: Stream) -> Self {
        match stream {
            Stream::Stdout => LineKind::Stdout,
            Stream::Stderr => LineKind::Stderr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub kind: LineKind,
    pub text: String,
    /// Still accepting text, i.e. no newline seen yet
    open: bool,
}

/// The output console: program output, package manager output and editor messages, in arrival
/// order.
#[derive(Debug, Default)]
pub struct OutputConsole {
    lines: Vec<ConsoleLine>,
    /// Lines scrolled back from the bottom
    scroll: usize,
}

impl OutputConsole {
    pub fn lines(&self) -> &[ConsoleLine] {
        &self.lines
    }

    /// Lines to show, without the empty line left open after a trailing newline
    pub fn display_lines(&self) -> &[ConsoleLine] {
        match self.lines.last() {
            Some(last) if last.open && last.text.is_empty() => &self.lines[..self.lines.len() - 1],
            _ => &self.lines,
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll = 0;
    }

    pub fn push(&mut self, kind: LineKind, text: &str) {
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            match self.lines.last_mut() {
                Some(last) if last.open && last.kind == kind => last.text.push_str(first),
                _ => self.start_line(kind, first),
            }
        }
        for piece in pieces {
            self.start_line(kind, piece);
        }
    }

    /// Write a whole line, starting on a fresh line if the previous output did not end with one
    pub fn message(&mut self, text: impl AsRef<str>) {
        self.start_line(LineKind::Info, text.as_ref());
        if let Some(last) = self.lines.last_mut() {
            last.open = false;
        }
    }

    fn start_line(&mut self, kind: LineKind, text: &str) {
        if let Some(last) = self.lines.last_mut() {
            last.open = false;
        }
        self.lines.push(ConsoleLine {
            kind,
            text: text.to_string(),
            open: true,
        });
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_up(&mut self, n: usize) {
        let max = self.display_lines().len().saturating_sub(1);
        self.scroll = (self.scroll + n).min(max);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }
}

impl OutputSink for OutputConsole {
    fn append(&mut self, stream: Stream, text: &str) {
        self.push(stream.into(), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_partial_lines() {
        let mut console = OutputConsole::default();
        console.append(Stream::Stdout, "hel");
        console.append(Stream::Stdout, "lo\nwor");
        console.append(Stream::Stdout, "ld\n");

        assert_eq!(console.text(), "hello\nworld\n");
        let shown: Vec<&str> = console
            .display_lines()
            .iter()
            .map(|line| line.text.as_str())
            .collect();
        assert_eq!(shown, vec!["hello", "world"]);
    }

    #[test]
    fn streams_do_not_share_lines() {
        let mut console = OutputConsole::default();
        console.append(Stream::Stdout, "partial");
        console.append(Stream::Stderr, "Traceback\n");

        let kinds: Vec<LineKind> = console.display_lines().iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LineKind::Stdout, LineKind::Stderr]);
    }

    #[test]
    fn messages_start_on_a_new_line() {
        let mut console = OutputConsole::default();
        console.append(Stream::Stdout, "no newline");
        console.message("Execution finished");
        console.append(Stream::Stdout, "next");

        let shown: Vec<&str> = console
            .display_lines()
            .iter()
            .map(|line| line.text.as_str())
            .collect();
        assert_eq!(shown, vec!["no newline", "Execution finished", "next"]);
    }

    #[test]
    fn scrolling_is_bounded() {
        let mut console = OutputConsole::default();
        console.append(Stream::Stdout, "a\nb\nc\n");
        console.scroll_up(10);
        assert_eq!(console.scroll(), 2);
        console.scroll_down(5);
        assert_eq!(console.scroll(), 0);
    }
}
