/// Execution related line markers shared by the gutter and the highlighter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    /// Line about to execute (1-indexed)
    current_line: Option<usize>,
    /// Line reported by the last failed run (1-indexed)
    error_line: Option<usize>,
}

impl Markers {
    pub fn current_line(&self) -> Option<usize> {
        self.current_line
    }

    pub fn error_line(&self) -> Option<usize> {
        self.error_line
    }

    pub fn set_current_line(&mut self, line: usize) {
        self.current_line = (line > 0).then_some(line);
    }

    pub fn clear_current_line(&mut self) {
        self.current_line = None;
    }

    pub fn set_error_line(&mut self, line: usize) {
        self.error_line = (line > 0).then_some(line);
    }

    pub fn clear_error_line(&mut self) {
        self.error_line = None;
    }
}
