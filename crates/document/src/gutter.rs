//! Decides what the gutter beside the text shows for each visible line.
//!
//! Rendering is split in two: this module produces toolkit independent [`DrawCommand`]s and
//! the front-end turns them into whatever its painter understands.
use crate::{BreakpointSet, VisibleLine};

/// A single decoration to paint in the gutter
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Line number, already right-aligned to the gutter width
    LineNumber { line: usize, top: f32, text: String },
    /// The line carries a breakpoint
    BreakpointMarker { line: usize, top: f32 },
    /// The line is about to execute
    ExecutionPointer { line: usize, top: f32 },
}

impl DrawCommand {
    pub fn line(&self) -> usize {
        match self {
            DrawCommand::LineNumber { line, .. }
            | DrawCommand::BreakpointMarker { line, .. }
            | DrawCommand::ExecutionPointer { line, .. } => *line,
        }
    }

    pub fn top(&self) -> f32 {
        match self {
            DrawCommand::LineNumber { top, .. }
            | DrawCommand::BreakpointMarker { top, .. }
            | DrawCommand::ExecutionPointer { top, .. } => *top,
        }
    }
}

/// Number of digit cells needed to show every line number of a `line_count` line document
pub fn digits(line_count: usize) -> usize {
    let mut n = line_count.max(1);
    let mut digits = 0;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// Produce the draw commands for `lines`.
///
/// Every line gets its number; breakpoint and execution pointer markers are added
/// independently, so a line can carry both. Line 0 is not a valid line number and is
/// skipped.
pub fn render(
    lines: impl IntoIterator<Item = VisibleLine>,
    breakpoints: &BreakpointSet,
    current_line: Option<usize>,
    width: usize,
) -> Vec<DrawCommand> {
    let mut commands = Vec::new();
    for VisibleLine { number, top, .. } in lines {
        if number == 0 {
            continue;
        }

        commands.push(DrawCommand::LineNumber {
            line: number,
            top,
            text: format!("{number:>width$}"),
        });

        if breakpoints.contains(number) {
            commands.push(DrawCommand::BreakpointMarker { line: number, top });
        }

        if current_line == Some(number) {
            commands.push(DrawCommand::ExecutionPointer { line: number, top });
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Viewport, visible_lines};

    fn lines(count: usize) -> impl Iterator<Item = VisibleLine> + Clone {
        visible_lines(vec![1.0; count], 1, 0.0, Viewport::with_height(count as f32))
    }

    #[test]
    fn digit_widths() {
        assert_eq!(digits(0), 1);
        assert_eq!(digits(9), 1);
        assert_eq!(digits(10), 2);
        assert_eq!(digits(999), 3);
        assert_eq!(digits(1000), 4);
    }

    #[test]
    fn numbers_are_right_aligned() {
        let commands = render(lines(3), &BreakpointSet::new(), None, 3);
        assert_eq!(
            commands[0],
            DrawCommand::LineNumber {
                line: 1,
                top: 0.0,
                text: "  1".to_string()
            }
        );
        assert_eq!(commands.len(), 3);
    }

    #[test]
    fn breakpoint_marker() {
        let mut breakpoints = BreakpointSet::new();
        breakpoints.toggle(2);

        let commands = render(lines(3), &breakpoints, None, 1);
        let markers: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::BreakpointMarker { .. }))
            .collect();
        assert_eq!(markers, vec![&DrawCommand::BreakpointMarker { line: 2, top: 1.0 }]);
    }

    #[test]
    fn breakpoint_and_current_line_both_drawn() {
        let mut breakpoints = BreakpointSet::new();
        breakpoints.toggle(2);

        let commands = render(lines(3), &breakpoints, Some(2), 1);
        let on_line_two: Vec<_> = commands.iter().filter(|c| c.line() == 2).collect();
        assert_eq!(
            on_line_two,
            vec![
                &DrawCommand::LineNumber {
                    line: 2,
                    top: 1.0,
                    text: "2".to_string()
                },
                &DrawCommand::BreakpointMarker { line: 2, top: 1.0 },
                &DrawCommand::ExecutionPointer { line: 2, top: 1.0 },
            ]
        );
    }

    #[test]
    fn current_line_outside_viewport_draws_nothing() {
        let commands = render(lines(3), &BreakpointSet::new(), Some(50), 1);
        assert!(
            !commands
                .iter()
                .any(|c| matches!(c, DrawCommand::ExecutionPointer { .. }))
        );
    }

    #[test]
    fn invalid_line_numbers_are_ignored() {
        let bogus = VisibleLine {
            number: 0,
            top: 0.0,
            bottom: 1.0,
        };
        let commands = render([bogus], &BreakpointSet::new(), Some(0), 1);
        assert!(commands.is_empty());
    }
}
