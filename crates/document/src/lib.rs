//! Toolkit independent model of an editing pane: the text buffer, the lines visible in a
//! viewport, breakpoints and the decorations drawn in the gutter.
mod breakpoints;
mod buffer;
pub mod gutter;
mod highlight;
mod line_index;
mod markers;

pub use breakpoints::BreakpointSet;
pub use buffer::{Buffer, Cursor, Error, SaveOutcome};
pub use gutter::DrawCommand;
pub use highlight::{HighlightKind, HighlightSpan, Highlighter, KEYWORDS};
pub use line_index::{Viewport, VisibleLine, VisibleLines, line_at, visible_lines};
pub use markers::Markers;
