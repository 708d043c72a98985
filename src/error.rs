//! Shared error and result types

/// Top level tricol Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Top level error type returned by tricol
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An index passed to [`crate::column::Column::swap`] was outside the
    /// bounds of the column's window list
    #[error("index out of range: {index} (len = {len})")]
    OutOfRange {
        /// the length of the collection that was indexed
        len: usize,
        /// the offending index
        index: usize,
    },

    /// Something went wrong talking to the display server
    #[error("transport error: {0}")]
    Transport(String),

    /// The on-disk configuration file could not be parsed
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Spawning an external command (terminal, launcher, locker) failed
    #[error("failed to spawn '{cmd}': {reason}")]
    Spawn {
        /// the command that was attempted
        cmd: String,
        /// why it failed
        reason: String,
    },

    /// An [IO Error][std::io::Error] was encountered
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
