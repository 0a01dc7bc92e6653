use std::{borrow::Cow, ops::Range};

use document::{HighlightKind, HighlightSpan, Highlighter, VisibleLine};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Text of the visible lines with keyword and error line highlighting
pub struct EditorView<'a> {
    lines: &'a [String],
    visible: &'a [VisibleLine],
    error_line: Option<usize>,
    tab_width: usize,
    highlighter: Highlighter,
}

impl<'a> EditorView<'a> {
    pub fn new(lines: &'a [String], visible: &'a [VisibleLine], error_line: Option<usize>) -> Self {
        Self {
            lines,
            visible,
            error_line,
            tab_width: 4,
            highlighter: Highlighter::new(),
        }
    }

    pub fn tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for visible in self.visible {
            let offset = visible.top.max(0.0) as u16;
            if offset >= area.height {
                continue;
            }
            let Some(text) = visible
                .number
                .checked_sub(1)
                .and_then(|index| self.lines.get(index))
            else {
                continue;
            };

            let text = expand_tabs(text, self.tab_width);
            let spans = self
                .highlighter
                .highlight_line(visible.number, &text, self.error_line);
            let y = area.y + offset;
            if spans.iter().any(|s| s.kind == HighlightKind::ErrorLine) {
                buf.set_style(Rect::new(area.x, y, area.width, 1), error_style());
            }
            buf.set_line(area.x, y, &styled_line(&text, &spans), area.width);
        }
    }
}

/// Replace tabs with spaces up to the next tab stop
pub fn expand_tabs(text: &str, tab_width: usize) -> Cow<'_, str> {
    if !text.contains('\t') {
        return Cow::Borrowed(text);
    }
    let tab_width = tab_width.max(1);
    let mut expanded = String::with_capacity(text.len());
    let mut width = 0;
    for c in text.chars() {
        if c == '\t' {
            let pad = tab_width - width % tab_width;
            expanded.extend(std::iter::repeat_n(' ', pad));
            width += pad;
        } else {
            expanded.push(c);
            width += 1;
        }
    }
    Cow::Owned(expanded)
}

/// Screen column of character `column` of `text` once tabs are expanded
pub fn display_column(text: &str, column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    text.chars().take(column).fold(0, |width, c| {
        if c == '\t' {
            width + tab_width - width % tab_width
        } else {
            width + 1
        }
    })
}

/// Character index of `text` drawn at `screen_column`, the inverse of [`display_column`].
///
/// A column inside an expanded tab maps to the tab itself; a column past the end maps to
/// the end of the line.
pub fn char_column_at(text: &str, screen_column: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    let mut width = 0;
    for (index, c) in text.chars().enumerate() {
        width = if c == '\t' {
            width + tab_width - width % tab_width
        } else {
            width + 1
        };
        if screen_column < width {
            return index;
        }
    }
    text.chars().count()
}

fn error_style() -> Style {
    Style::default().bg(Color::Red).fg(Color::White)
}

fn keyword_style() -> Style {
    Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::BOLD)
}

/// Split `text` at every span boundary and layer the span styles, later spans on top
pub fn styled_line<'t>(text: &'t str, spans: &[HighlightSpan]) -> Line<'t> {
    let mut boundaries: Vec<usize> = spans
        .iter()
        .flat_map(|s| [s.range.start, s.range.end])
        .chain([0, text.len()])
        .filter(|&b| b <= text.len() && text.is_char_boundary(b))
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let segments = boundaries.windows(2).map(|w| w[0]..w[1]);
    Line::from(
        segments
            .map(|segment| Span::styled(&text[segment.clone()], style_for(&segment, spans)))
            .collect::<Vec<_>>(),
    )
}

fn style_for(segment: &Range<usize>, spans: &[HighlightSpan]) -> Style {
    spans
        .iter()
        .filter(|s| s.range.start <= segment.start && segment.end <= s.range.end)
        .fold(Style::default(), |style, span| match span.kind {
            HighlightKind::ErrorLine => style.patch(error_style()),
            HighlightKind::Keyword => style.patch(keyword_style()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_styled() {
        let text = "def main(): return 1";
        let spans = Highlighter::new().highlight_line(1, text, None);
        let line = styled_line(text, &spans);

        let pieces: Vec<(&str, Style)> = line
            .spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style))
            .collect();
        assert_eq!(
            pieces,
            vec![
                ("def", keyword_style()),
                (" main(): ", Style::default()),
                ("return", keyword_style()),
                (" 1", Style::default()),
            ]
        );
    }

    #[test]
    fn error_line_is_layered_under_keywords() {
        let text = "if x";
        let spans = Highlighter::new().highlight_line(3, text, Some(3));
        let line = styled_line(text, &spans);

        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].style, error_style().patch(keyword_style()));
        assert_eq!(line.spans[1].style, error_style());
    }

    #[test]
    fn tabs_expand_to_tab_stops() {
        assert_eq!(expand_tabs("\tif x:", 4), "    if x:");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(display_column("ab\tc", 3, 4), 4);
        assert_eq!(display_column("ab\tc", 2, 4), 2);
    }

    #[test]
    fn screen_columns_map_back_through_tabs() {
        assert_eq!(char_column_at("\tx", 0, 4), 0);
        assert_eq!(char_column_at("\tx", 3, 4), 0);
        assert_eq!(char_column_at("\tx", 4, 4), 1);
        assert_eq!(char_column_at("\tx", 20, 4), 2);
        assert_eq!(char_column_at("ab\tc", 3, 4), 2);
        assert_eq!(char_column_at("ab\tc", 4, 4), 3);
    }

    #[test]
    fn empty_line() {
        let line = styled_line("", &[]);
        assert!(line.spans.is_empty());
    }
}
