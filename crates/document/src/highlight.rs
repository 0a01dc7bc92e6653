use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Words highlighted as keywords
pub const KEYWORDS: &[&str] = &[
    "def", "class", "import", "from", "return", "if", "elif", "else", "while", "for", "try",
    "except",
];

static KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = KEYWORDS.join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("keyword pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    Keyword,
    /// The whole line is the one the last failed run pointed at
    ErrorLine,
}

/// Styled byte range within a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSpan {
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

/// Fixed keyword highlighter.
///
/// Each line is matched on its own against the keyword list; there is no language aware
/// parsing and no state carried between lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct Highlighter;

impl Highlighter {
    pub fn new() -> Self {
        Self
    }

    /// Spans for line `line_number` (1-indexed) containing `text`.
    ///
    /// When the line is the error line, a span covering the full line comes first so that
    /// keyword spans can be layered on top of it.
    pub fn highlight_line(
        &self,
        line_number: usize,
        text: &str,
        error_line: Option<usize>,
    ) -> Vec<HighlightSpan> {
        let mut spans = Vec::new();
        if error_line.is_some_and(|l| l == line_number) {
            spans.push(HighlightSpan {
                range: 0..text.len(),
                kind: HighlightKind::ErrorLine,
            });
        }

        spans.extend(KEYWORD_PATTERN.find_iter(text).map(|m| HighlightSpan {
            range: m.range(),
            kind: HighlightKind::Keyword,
        }));
        spans
    }
}
