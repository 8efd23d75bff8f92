//! Error taxonomy shared by the L1-L6 primitives.

use std::io;
use thiserror::Error;

/// Failure variants that can occur inside the shared primitives, independent
/// of which of sort/factor/od is the caller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying stream or filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A bounded reallocation could not grow within its budget.
    #[error("allocation exceeded bound of {limit} bytes")]
    AllocBound {
        /// The `nmax` budget that was exceeded.
        limit: usize,
    },

    /// [`crate::canonicalize`] found a symlink cycle.
    #[error("too many levels of symbolic links")]
    Loop,

    /// The current working directory could not be determined.
    #[error("cannot get current working directory: {0}")]
    NoCwd(io::Error),
}
