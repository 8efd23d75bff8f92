use thiserror::Error;

#[derive(Debug, Error)]
pub enum OdError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] coreutils_core::CoreError),

    #[error("invalid type string {0:?}")]
    BadTypeSpec(String),

    #[error("invalid offset {0:?}")]
    BadOffset(String),
}

impl OdError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
