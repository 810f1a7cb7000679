//! Unified error type for hookmux.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HookmuxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A chain named a command that resolves nowhere — neither under the
    /// type-specific helper directory nor under `_common`, in any tier.
    /// Distinct from a tool that was found and then failed at runtime.
    #[error("command `{command}` in chain `{chain}` not found under `{type_dir}` or `{common_dir}`")]
    UnresolvedCommand {
        command: String,
        chain: String,
        type_dir: String,
        common_dir: String,
    },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HookmuxError>;
