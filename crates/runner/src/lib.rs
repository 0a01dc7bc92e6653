//! Runs the contents of the editor in an external interpreter and relays its output back.
//!
//! The interpreter always runs out of process. Its output is read on background threads and
//! handed to the UI thread over a channel, so a long running script never blocks input.
mod error;
pub mod process;
mod relay;
mod sink;
mod trace;

pub use error::Error;
pub use process::{Generation, Stream, StreamMessage};
pub use relay::{RunConfig, RunOutcome, RunRelay, RunState};
pub use sink::OutputSink;
pub use trace::last_error_line;
