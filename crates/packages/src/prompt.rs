use std::sync::LazyLock;

use regex::Regex;

static YES_NO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\[(]\s*y(?:es)?\s*/\s*n(?:o)?\s*[\])]").expect("prompt pattern is valid")
});

/// Whether `text` asks the user for a yes/no confirmation, e.g. `Proceed (Y/n)?`
pub fn is_confirmation_prompt(text: &str) -> bool {
    YES_NO.is_match(text)
}

/// The user's reply to a confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    /// Anything other than `y` or `n`
    Invalid(String),
}

impl Answer {
    /// Case-insensitive `y`/`n`; surrounding whitespace is ignored
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "y" | "Y" => Answer::Yes,
            "n" | "N" => Answer::No,
            _ => Answer::Invalid(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_prompts() {
        assert!(is_confirmation_prompt("Proceed (Y/n)? "));
        assert!(is_confirmation_prompt("Continue? [y/N]"));
        assert!(is_confirmation_prompt("Are you sure (yes/no)"));
        assert!(!is_confirmation_prompt("Successfully installed foo-1.0"));
        assert!(!is_confirmation_prompt("y/n without brackets"));
    }

    #[test]
    fn parses_answers() {
        assert_eq!(Answer::parse("y"), Answer::Yes);
        assert_eq!(Answer::parse("Y\n"), Answer::Yes);
        assert_eq!(Answer::parse("n"), Answer::No);
        assert_eq!(Answer::parse("N"), Answer::No);
        assert_eq!(Answer::parse("yes"), Answer::Invalid("yes".to_string()));
        assert_eq!(Answer::parse(""), Answer::Invalid(String::new()));
    }
}
