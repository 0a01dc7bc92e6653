use std::io;

/// Errors reported by the [`RunRelay`](crate::RunRelay)
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A run was requested while another one is in progress
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// Stop was requested with no run in progress
    #[error("no run in progress")]
    NotRunning,

    /// The source text could not be written to its temporary file
    #[error("writing script to temporary file: {0}")]
    Script(#[source] io::Error),
}
