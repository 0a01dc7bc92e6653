use packages::Action;

/// What a modal prompt is asking for, and so what happens when it is submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    OpenPath,
    SaveAsPath,
    PackageName(Action),
    /// Confirm starting `action` on the named package
    ConfirmPackage(Action, String),
    /// Forward a reply to a package manager that is waiting for one
    PackageAnswer,
    /// Informational dialog, closed by any key
    Message,
}

impl PromptKind {
    pub fn takes_input(&self) -> bool {
        matches!(
            self,
            PromptKind::OpenPath
                | PromptKind::SaveAsPath
                | PromptKind::PackageName(_)
                | PromptKind::PackageAnswer
        )
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub title: String,
    pub text: String,
    pub input: String,
    character_index: usize,
}

impl Prompt {
    pub fn new(kind: PromptKind, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            text: text.into(),
            input: String::new(),
            character_index: 0,
        }
    }

    pub fn message(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(PromptKind::Message, title, text)
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = input.into();
        self.character_index = self.input.chars().count();
        self
    }

    pub fn character_index(&self) -> usize {
        self.character_index
    }

    pub fn move_cursor_left(&mut self) {
        let cursor_moved_left = self.character_index.saturating_sub(1);
        self.character_index = self.clamp_cursor(cursor_moved_left);
    }

    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.character_index.saturating_add(1);
        self.character_index = self.clamp_cursor(cursor_moved_right);
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.input.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.character_index == 0 {
            return;
        }
        let before = self.input.chars().take(self.character_index - 1);
        let after = self.input.chars().skip(self.character_index);
        self.input = before.chain(after).collect();
        self.move_cursor_left();
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.character_index)
            .unwrap_or(self.input.len())
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_input() {
        let mut prompt = Prompt::new(PromptKind::OpenPath, "Open", "Path:").with_input("né.py");
        assert_eq!(prompt.character_index(), 5);

        prompt.move_cursor_left();
        prompt.move_cursor_left();
        prompt.move_cursor_left();
        prompt.delete_char();
        assert_eq!(prompt.input, "n.py");

        prompt.enter_char('o');
        assert_eq!(prompt.input, "no.py");
        assert_eq!(prompt.character_index(), 2);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut prompt = Prompt::new(PromptKind::PackageAnswer, "Answer", "");
        prompt.delete_char();
        prompt.move_cursor_left();
        prompt.move_cursor_right();
        assert_eq!(prompt.character_index(), 0);
        assert!(prompt.input.is_empty());
    }
}
