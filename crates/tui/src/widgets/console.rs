use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Paragraph, Widget},
};

use crate::console::{LineKind, OutputConsole};

/// The bottom of the console, scrolled back by [`OutputConsole::scroll`] lines
pub struct ConsoleView<'a> {
    console: &'a OutputConsole,
}

impl<'a> ConsoleView<'a> {
    pub fn new(console: &'a OutputConsole) -> Self {
        Self { console }
    }
}

impl Widget for ConsoleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.console.display_lines();
        let end = lines.len().saturating_sub(self.console.scroll());
        let start = end.saturating_sub(area.height as usize);

        let lines: Vec<Line> = lines[start..end]
            .iter()
            .map(|line| {
                let style = match line.kind {
                    LineKind::Stdout => Style::default(),
                    LineKind::Stderr => Style::default().fg(Color::Red),
                    LineKind::Info => Style::default().fg(Color::Cyan).italic(),
                };
                Line::styled(line.text.as_str(), style)
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}
