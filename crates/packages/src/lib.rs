//! Installing, removing and listing packages through an external package manager.
mod error;
mod list;
mod operation;
mod prompt;

pub use error::Error;
pub use list::{InstalledPackage, list_installed, parse_package_list};
pub use operation::{Action, PackageEvent, PackageOperation};
pub use prompt::{Answer, is_confirmation_prompt};

/// External package manager invocation, e.g. `pip` or `python3 -m pip`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    pub program: String,
    /// Arguments placed before the subcommand
    pub args: Vec<String>,
}

impl PackageManager {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Command running `subcommand` followed by `args`
    pub(crate) fn command<'a>(
        &self,
        subcommand: &str,
        args: impl IntoIterator<Item = &'a str>,
    ) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args).arg(subcommand).args(args);
        command
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        Self::new("pip")
    }
}

/// Check a package name typed by the user, returning it without surrounding whitespace
pub fn validate_name(name: &str) -> Result<&str, Error> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyPackageName);
    }
    Ok(name)
}
