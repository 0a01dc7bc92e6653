//! Maps a viewport onto the lines of a document.
//!
//! The index is recomputed on every repaint: line heights change whenever the font or the
//! text changes, so nothing here is cached.
use std::iter::FusedIterator;

/// Visible vertical extent of the editing area, in screen-space units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f32,
    pub bottom: f32,
}

impl Viewport {
    pub fn new(top: f32, bottom: f32) -> Self {
        Self { top, bottom }
    }

    /// Viewport of `height` units starting at the origin
    pub fn with_height(height: f32) -> Self {
        Self::new(0.0, height)
    }
}

/// A line that is at least partially inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleLine {
    /// Line number (1-indexed)
    pub number: usize,
    pub top: f32,
    pub bottom: f32,
}

impl VisibleLine {
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.bottom
    }
}

/// Lazy sequence of [`VisibleLine`]s, see [`visible_lines`]
#[derive(Debug, Clone)]
pub struct VisibleLines<I> {
    heights: I,
    number: usize,
    top: f32,
    viewport: Viewport,
    finished: bool,
}

/// Compute the lines visible in `viewport`.
///
/// `heights` yields the rendered height of each line starting with line `first_line`
/// (1-indexed), whose top edge sits at `content_offset`. Negative heights are treated as
/// zero. The sequence ends at the first line whose top edge is below the viewport, or when
/// `heights` runs out.
pub fn visible_lines<I>(
    heights: I,
    first_line: usize,
    content_offset: f32,
    viewport: Viewport,
) -> VisibleLines<I::IntoIter>
where
    I: IntoIterator<Item = f32>,
{
    VisibleLines {
        heights: heights.into_iter(),
        number: first_line.max(1),
        top: content_offset,
        viewport,
        finished: false,
    }
}

impl<I> Iterator for VisibleLines<I>
where
    I: Iterator<Item = f32>,
{
    type Item = VisibleLine;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            if self.top > self.viewport.bottom {
                self.finished = true;
                break;
            }

            let Some(height) = self.heights.next() else {
                self.finished = true;
                break;
            };

            // f32::max also maps NaN to zero
            let top = self.top;
            let bottom = top + height.max(0.0);
            let number = self.number;

            self.top = bottom;
            self.number += 1;

            if bottom >= self.viewport.top {
                return Some(VisibleLine {
                    number,
                    top,
                    bottom,
                });
            }
        }
        None
    }
}

impl<I> FusedIterator for VisibleLines<I> where I: Iterator<Item = f32> {}

/// Find the line under the screen y coordinate `y`
pub fn line_at(lines: impl IntoIterator<Item = VisibleLine>, y: f32) -> Option<usize> {
    lines
        .into_iter()
        .find(|line| line.contains(y))
        .map(|line| line.number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(lines: impl Iterator<Item = VisibleLine>) -> Vec<usize> {
        lines.map(|l| l.number).collect()
    }

    #[test]
    fn uniform_heights_fill_viewport() {
        let lines: Vec<_> =
            visible_lines(std::iter::repeat_n(10.0, 100), 1, 0.0, Viewport::with_height(35.0))
                .collect();

        assert_eq!(numbers(lines.iter().copied()), vec![1, 2, 3, 4]);
        assert_eq!(lines[3].top, 30.0);
        assert_eq!(lines[3].bottom, 40.0);
    }

    #[test]
    fn scrolled_document_starts_at_first_visible_line() {
        // first visible line is 11, partially scrolled out of view
        let lines: Vec<_> =
            visible_lines(std::iter::repeat_n(10.0, 90), 11, -4.0, Viewport::with_height(20.0))
                .collect();

        assert_eq!(numbers(lines.iter().copied()), vec![11, 12, 13]);
        assert_eq!(lines[0].top, -4.0);
    }

    #[test]
    fn lines_above_viewport_are_skipped() {
        let lines = visible_lines([10.0; 10], 1, 0.0, Viewport::new(25.0, 45.0));
        assert_eq!(numbers(lines), vec![3, 4, 5]);
    }

    #[test]
    fn empty_document() {
        let lines = visible_lines(Vec::<f32>::new(), 1, 0.0, Viewport::with_height(100.0));
        assert_eq!(lines.count(), 0);
    }

    #[test]
    fn short_document_ends_early() {
        let lines = visible_lines([1.0, 1.0], 1, 0.0, Viewport::with_height(50.0));
        assert_eq!(numbers(lines), vec![1, 2]);
    }

    #[test]
    fn negative_heights_are_clamped() {
        let lines: Vec<_> =
            visible_lines([1.0, -5.0, 1.0], 1, 0.0, Viewport::with_height(10.0)).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].height(), 0.0);
        assert_eq!(lines[2].top, 1.0);
    }

    #[test]
    fn sequence_is_restartable() {
        let lines = visible_lines(vec![2.0; 5], 1, 0.0, Viewport::with_height(4.0));
        let first: Vec<_> = lines.clone().collect();
        let second: Vec<_> = lines.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn variable_heights() {
        let lines: Vec<_> =
            visible_lines([1.0, 3.0, 2.0, 1.0], 1, 0.0, Viewport::with_height(4.5)).collect();
        assert_eq!(
            lines,
            vec![
                VisibleLine {
                    number: 1,
                    top: 0.0,
                    bottom: 1.0,
                },
                VisibleLine {
                    number: 2,
                    top: 1.0,
                    bottom: 4.0,
                },
                VisibleLine {
                    number: 3,
                    top: 4.0,
                    bottom: 6.0,
                },
            ]
        );
    }

    #[test]
    fn hit_testing() {
        let lines = visible_lines([1.0; 10], 5, 0.0, Viewport::with_height(3.0));
        assert_eq!(line_at(lines.clone(), 0.0), Some(5));
        assert_eq!(line_at(lines.clone(), 2.5), Some(7));
        assert_eq!(line_at(lines, 20.0), None);
    }
}
