//! User settings, read from `config.toml` in the platform configuration directory.
//!
//! Every field is optional in the file; anything left out takes its default.

use std::path::{Path, PathBuf};

use eyre::WrapErr;
use serde::Deserialize;

const APP_NAME: &str = "ezcode";
const FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Program used to run scripts
    pub interpreter: String,

    /// Package manager program
    pub package_manager: String,

    /// Arguments placed before the package manager subcommand, e.g. `["-m", "pip"]`
    pub package_manager_args: Vec<String>,

    /// Extension of source files, without the dot
    pub source_extension: String,

    pub show_explorer: bool,
    pub show_console: bool,

    /// Copy log messages into the output console
    pub console_log: bool,

    pub tab_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interpreter: first_on_path(&["python3", "python"]),
            package_manager: first_on_path(&["pip3", "pip"]),
            package_manager_args: Vec::new(),
            source_extension: "py".to_string(),
            show_explorer: true,
            show_console: true,
            console_log: false,
            tab_width: 4,
        }
    }
}

/// First of `candidates` found on `PATH`, or the last one if none are
fn first_on_path(candidates: &[&str]) -> String {
    candidates
        .iter()
        .find(|candidate| which::which(candidate).is_ok())
        .or(candidates.last())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

impl Settings {
    /// Settings file in the user's configuration directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(FILE_NAME))
    }

    /// Load from the default location, falling back to defaults if there is no such file
    pub fn load() -> eyre::Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("no configuration directory, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`.
    ///
    /// A missing file gives the default settings, a malformed one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let span = tracing::debug_span!("Settings", path = %path.display());
        let _guard = span.enter();

        if !path.is_file() {
            tracing::debug!("settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings = Self::parse(&contents)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        tracing::debug!(?settings, "settings loaded");
        Ok(settings)
    }

    pub fn parse(contents: &str) -> eyre::Result<Self> {
        let settings: Self = toml::from_str(contents).context("invalid settings")?;
        Ok(settings)
    }
}
