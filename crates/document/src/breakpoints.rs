use std::collections::BTreeSet;

/// Lines the user has marked in the gutter.
///
/// Breakpoints are cosmetic: nothing pauses on them. The set lives for the editing session
/// and is never written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakpointSet {
    lines: BTreeSet<usize>,
}

impl BreakpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the breakpoint if absent, remove it if present.
    ///
    /// Returns whether `line` is a breakpoint afterwards. Line numbers are 1-indexed, so
    /// line 0 is ignored.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, line: usize) -> bool {
        if line == 0 {
            tracing::debug!("ignoring breakpoint on invalid line");
            return false;
        }

        if self.lines.remove(&line) {
            tracing::debug!("breakpoint removed");
            false
        } else {
            self.lines.insert(line);
            tracing::debug!("breakpoint added");
            true
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.lines.contains(&line)
    }

    /// Breakpoint lines in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Remove every breakpoint. Only called on an explicit user request.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
