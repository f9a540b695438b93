use thiserror::Error;

pub type XetResult<T> = Result<T, XetError>;

#[derive(Debug, Error)]
pub enum XetError {
    #[error("target chunk size must be a power of 2, got {0}")]
    TargetNotPowerOfTwo(usize),

    #[error("target chunk size {size} must be greater than the hash window ({window})")]
    TargetTooSmall { size: usize, window: usize },

    #[error("target chunk size {0} is too large")]
    TargetTooLarge(usize),

    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("invalid hash hex: {0}")]
    InvalidHex(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
