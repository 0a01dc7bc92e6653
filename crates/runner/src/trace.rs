use std::sync::LazyLock;

use regex::Regex;

static TRACE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"File "[^"]*", line (\d+)"#).expect("trace pattern is valid"));

/// Line number of the last `File "<path>", line <N>` entry in an error trace.
///
/// The innermost frame of a traceback is printed last, so the last match wins.
pub fn last_error_line(text: &str) -> Option<usize> {
    TRACE_LINE
        .captures_iter(text)
        .filter_map(|captures| captures.get(1)?.as_str().parse().ok())
        .last()
}
