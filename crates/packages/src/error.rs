use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("package name cannot be empty")]
    EmptyPackageName,

    /// A response was given while the package manager was not asking for one
    #[error("no confirmation is pending")]
    NoPendingPrompt,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("listing packages failed with status {status:?}: {stderr}")]
    ListFailed { status: Option<i32>, stderr: String },

    /// The background worker went away without reporting a result
    #[error("package list worker stopped unexpectedly")]
    WorkerGone,
}
