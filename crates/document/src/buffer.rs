use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of [`Buffer::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// The buffer has never been saved, so the caller must ask for a path
    NeedsPath,
}

/// Cursor position, both coordinates 0-indexed. `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

/// The text being edited, plus where it lives on disk
#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    cursor: Cursor,
    path: Option<PathBuf>,
    modified: bool,
}

impl Default for Buffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            path: None,
            modified: false,
        }
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::default();
        buffer.set_text(text);
        buffer
    }

    /// Replace the contents, moving the cursor to the start
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.cursor = Cursor::default();
        self.modified = false;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Line number (1-indexed) holding the cursor
    pub fn cursor_line_number(&self) -> usize {
        self.cursor.line + 1
    }

    /// File the buffer was loaded from or last saved to. `None` for an unsaved buffer.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Load the full contents of `path`.
    ///
    /// On failure the buffer, including its path, is left untouched.
    #[tracing::instrument(skip(self), fields(path = %path.as_ref().display()))]
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.set_text(&contents);
        self.path = Some(path.to_path_buf());
        tracing::debug!(lines = self.lines.len(), "file opened");
        Ok(())
    }

    /// Write to the known path, or report that one is needed
    pub fn save(&mut self) -> Result<SaveOutcome, Error> {
        let Some(path) = self.path.clone() else {
            return Ok(SaveOutcome::NeedsPath);
        };
        self.write_to(&path)?;
        Ok(SaveOutcome::Saved(path))
    }

    /// Write to `path` and remember it for later saves.
    ///
    /// On failure the previous path is kept.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), Error> {
        let path = path.into();
        self.write_to(&path)?;
        self.path = Some(path);
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %path.display()))]
    fn write_to(&mut self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.text()).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        self.modified = false;
        tracing::debug!("file saved");
        Ok(())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let index = self.byte_index();
        self.lines[self.cursor.line].insert(index, c);
        self.cursor.column += 1;
        self.modified = true;
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    pub fn insert_newline(&mut self) {
        let index = self.byte_index();
        let rest = self.lines[self.cursor.line].split_off(index);
        self.lines.insert(self.cursor.line + 1, rest);
        self.cursor = Cursor {
            line: self.cursor.line + 1,
            column: 0,
        };
        self.modified = true;
    }

    /// Delete the character before the cursor, joining lines at the start of a line
    pub fn backspace(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
            let index = self.byte_index();
            self.lines[self.cursor.line].remove(index);
            self.modified = true;
        } else if self.cursor.line > 0 {
            let current = self.lines.remove(self.cursor.line);
            self.cursor.line -= 1;
            self.cursor.column = self.lines[self.cursor.line].chars().count();
            self.lines[self.cursor.line].push_str(&current);
            self.modified = true;
        }
    }

    /// Delete the character under the cursor, joining lines at the end of a line
    pub fn delete(&mut self) {
        let line_len = self.current_line_len();
        if self.cursor.column < line_len {
            let index = self.byte_index();
            self.lines[self.cursor.line].remove(index);
            self.modified = true;
        } else if self.cursor.line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor.line + 1);
            self.lines[self.cursor.line].push_str(&next);
            self.modified = true;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor.column > 0 {
            self.cursor.column -= 1;
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.column = self.current_line_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor.column < self.current_line_len() {
            self.cursor.column += 1;
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.cursor.column = 0;
        }
    }

    pub fn move_up(&mut self, count: usize) {
        self.cursor.line = self.cursor.line.saturating_sub(count);
        self.clamp_column();
    }

    pub fn move_down(&mut self, count: usize) {
        self.cursor.line = (self.cursor.line + count).min(self.lines.len() - 1);
        self.clamp_column();
    }

    pub fn move_home(&mut self) {
        self.cursor.column = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor.column = self.current_line_len();
    }

    /// Place the cursor, clamping to the buffer contents
    pub fn move_to(&mut self, line: usize, column: usize) {
        self.cursor.line = line.min(self.lines.len() - 1);
        self.cursor.column = column;
        self.clamp_column();
    }

    fn clamp_column(&mut self) {
        self.cursor.column = self.cursor.column.min(self.current_line_len());
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor.line].chars().count()
    }

    fn byte_index(&self) -> usize {
        let line = &self.lines[self.cursor.line];
        line.char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor.column)
            .unwrap_or(line.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips_trailing_newline() {
        let buffer = Buffer::from_text("a\nb\n");
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.text(), "a\nb\n");
    }

    #[test]
    fn editing() {
        let mut buffer = Buffer::new();
        buffer.insert_str("print(1)");
        buffer.insert_newline();
        buffer.insert_str("x");
        assert_eq!(buffer.text(), "print(1)\nx");
        assert_eq!(buffer.cursor_line_number(), 2);
        assert!(buffer.is_modified());

        buffer.backspace();
        buffer.backspace();
        assert_eq!(buffer.text(), "print(1)");
        assert_eq!(buffer.cursor(), Cursor { line: 0, column: 8 });
    }

    #[test]
    fn multibyte_characters() {
        let mut buffer = Buffer::from_text("héllo");
        buffer.move_to(0, 2);
        buffer.insert_char('x');
        assert_eq!(buffer.text(), "héxllo");
        buffer.move_left();
        buffer.move_left();
        buffer.delete();
        assert_eq!(buffer.text(), "hxllo");
    }

    #[test]
    fn delete_joins_lines() {
        let mut buffer = Buffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut buffer = Buffer::from_text("long line\nx\nanother");
        buffer.move_end();
        buffer.move_down(1);
        assert_eq!(buffer.cursor(), Cursor { line: 1, column: 1 });
        buffer.move_down(10);
        assert_eq!(buffer.cursor().line, 2);
        buffer.move_up(10);
        assert_eq!(buffer.cursor().line, 0);
    }

    #[test]
    fn save_without_path_needs_path() {
        let mut buffer = Buffer::from_text("x = 1");
        assert_eq!(buffer.save().unwrap(), SaveOutcome::NeedsPath);
    }

    #[test]
    fn save_as_then_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.py");

        let mut buffer = Buffer::from_text("x = 1\n");
        buffer.save_as(&path).unwrap();
        assert_eq!(buffer.path(), Some(path.as_path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 1\n");

        buffer.move_to(0, 5);
        buffer.insert_str("0");
        assert_eq!(buffer.save().unwrap(), SaveOutcome::Saved(path.clone()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x = 10\n");
        assert!(!buffer.is_modified());
    }

    #[test]
    fn open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.py");
        std::fs::write(&path, "print('hi')\n").unwrap();

        let mut buffer = Buffer::new();
        buffer.open(&path).unwrap();
        assert_eq!(buffer.line(0), Some("print('hi')"));
        assert_eq!(buffer.path(), Some(path.as_path()));
    }

    #[test]
    fn failed_open_leaves_buffer_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = Buffer::from_text("keep me");

        let err = buffer.open(dir.path().join("missing.py")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert_eq!(buffer.text(), "keep me");
        assert_eq!(buffer.path(), None);
    }

    #[test]
    fn failed_save_as_keeps_previous_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.py");
        let mut buffer = Buffer::from_text("x");
        buffer.save_as(&good).unwrap();

        let bad = dir.path().join("no-such-dir").join("bad.py");
        assert!(buffer.save_as(&bad).is_err());
        assert_eq!(buffer.path(), Some(good.as_path()));
    }
}
