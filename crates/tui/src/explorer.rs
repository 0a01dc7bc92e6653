use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Listing of one directory: sub-directories first, then source files
#[derive(Debug)]
pub struct FileExplorer {
    root: PathBuf,
    extension: String,
    show_all: bool,
    entries: Vec<Entry>,
    selected: usize,
}

impl FileExplorer {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        let mut explorer = Self {
            root: root.into(),
            extension: extension.into(),
            show_all: false,
            entries: Vec::new(),
            selected: 0,
        };
        explorer.refresh();
        explorer
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.selected)
    }

    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
        self.selected = 0;
        self.refresh();
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
        self.refresh();
    }

    /// Re-read the directory. An unreadable directory shows as empty.
    pub fn refresh(&mut self) {
        self.entries = match read_entries(&self.root, &self.extension, self.show_all) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, root = %self.root.display(), "could not list directory");
                Vec::new()
            }
        };
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1).min(self.entries.len() - 1);
        }
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.entries.len().saturating_sub(1));
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Go into the selected directory, or return the selected file
    pub fn activate(&mut self) -> Option<PathBuf> {
        let entry = self.selected_entry()?.clone();
        if entry.is_dir {
            self.set_root(entry.path);
            None
        } else {
            Some(entry.path)
        }
    }

    pub fn go_up(&mut self) {
        if let Some(parent) = self.root.parent().map(Path::to_path_buf) {
            self.set_root(parent);
        }
    }
}

fn read_entries(root: &Path, extension: &str, show_all: bool) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for dir_entry in std::fs::read_dir(root)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') && !show_all {
            continue;
        }
        let is_dir = path.is_dir();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if is_dir || show_all || matches {
            entries.push(Entry { name, path, is_dir });
        }
    }
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(explorer: &FileExplorer) -> Vec<&str> {
        explorer.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn lists_directories_then_source_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("main.py"), "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.py"), "").unwrap();
        std::fs::write(dir.path().join(".hidden.py"), "").unwrap();

        let mut explorer = FileExplorer::new(dir.path(), "py");
        assert_eq!(names(&explorer), vec!["pkg", "a.py", "main.py"]);

        explorer.toggle_show_all();
        assert_eq!(
            names(&explorer),
            vec!["pkg", ".hidden.py", "a.py", "main.py", "notes.txt"]
        );
    }

    #[test]
    fn navigates_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg").join("mod.py"), "").unwrap();

        let mut explorer = FileExplorer::new(dir.path(), "py");
        assert_eq!(explorer.activate(), None);
        assert_eq!(explorer.root(), dir.path().join("pkg"));
        assert_eq!(explorer.activate(), Some(dir.path().join("pkg").join("mod.py")));

        explorer.go_up();
        assert_eq!(explorer.root(), dir.path());
    }

    #[test]
    fn selection_stays_in_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.py"), "").unwrap();

        let mut explorer = FileExplorer::new(dir.path(), "py");
        explorer.select_next();
        explorer.select_next();
        assert_eq!(explorer.selected(), 0);
        explorer.select_previous();
        assert_eq!(explorer.selected(), 0);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut explorer = FileExplorer::new(dir.path().join("gone"), "py");
        assert!(explorer.entries().is_empty());
        assert_eq!(explorer.activate(), None);
    }
}
