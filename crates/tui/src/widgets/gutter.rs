use document::DrawCommand;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

pub const BREAKPOINT_SYMBOL: &str = "●";
pub const POINTER_SYMBOL: &str = "→";

/// Columns taken by the markers in front of the line number
const MARKER_COLUMNS: u16 = 2;

/// Paints gutter draw commands: `●→ 12 `
pub struct GutterView<'a> {
    commands: &'a [DrawCommand],
}

impl<'a> GutterView<'a> {
    pub fn new(commands: &'a [DrawCommand]) -> Self {
        Self { commands }
    }

    /// Width of a gutter showing `digits` wide line numbers
    pub fn width(digits: usize) -> u16 {
        MARKER_COLUMNS + digits as u16 + 1
    }
}

impl Widget for GutterView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for command in self.commands {
            let offset = command.top().max(0.0) as u16;
            if offset >= area.height {
                continue;
            }
            let y = area.y + offset;
            match command {
                DrawCommand::LineNumber { text, .. } => {
                    let width = area.width.saturating_sub(MARKER_COLUMNS) as usize;
                    buf.set_stringn(
                        area.x + MARKER_COLUMNS,
                        y,
                        text,
                        width,
                        Style::default().fg(Color::DarkGray),
                    );
                }
                DrawCommand::BreakpointMarker { .. } => {
                    buf.set_string(area.x, y, BREAKPOINT_SYMBOL, Style::default().fg(Color::Red));
                }
                DrawCommand::ExecutionPointer { .. } if area.width > 1 => {
                    buf.set_string(
                        area.x + 1,
                        y,
                        POINTER_SYMBOL,
                        Style::default().fg(Color::Yellow),
                    );
                }
                DrawCommand::ExecutionPointer { .. } => {}
            }
        }
    }
}
