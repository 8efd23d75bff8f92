use thiserror::Error;

/// Everything that can go wrong while parsing options or running a sort.
#[derive(Debug, Error)]
pub enum SortError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] coreutils_core::CoreError),

    #[error("invalid key spec {0:?}: {1}")]
    BadKeySpec(String, &'static str),

    #[error("input is not sorted: {file}:{line}")]
    CheckFailed { file: String, line: usize },

    #[error("could not create temporary file: {0}")]
    TempFile(std::io::Error),

    #[error("{0} open files exceeds the merge fan-in limit")]
    TooManyInputs(usize),
}

impl SortError {
    /// Matches GNU sort's exit status convention: 0 success, 1 unsorted
    /// input under `--check`, 2 a real error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::CheckFailed { .. } => 1,
            _ => 2,
        }
    }
}
