use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactorError {
    #[error("{0:?} is not a valid positive integer")]
    NotAPositiveInteger(String),

    #[error("{0:?} is too large")]
    TooLarge(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FactorError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
