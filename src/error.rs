use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::TargetSelectionMode;

/// Errors raised by the FIFO command channel.
///
/// All of these are recovered locally: the supervisor reports them through
/// the notification capability (or a debug log) and keeps running. None of
/// them terminate the process or the event loop.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The pipe object could not be created.
    #[error("couldn't create FIFO at {path}: {source}")]
    Creation { path: PathBuf, source: io::Error },

    /// A stale or active pipe object could not be deleted.
    #[error("couldn't remove {path}: {source}")]
    Removal { path: PathBuf, source: io::Error },

    /// No window matched the configured target selection mode.
    #[error("no {mode} window to run command in")]
    NoTarget { mode: TargetSelectionMode },
}
