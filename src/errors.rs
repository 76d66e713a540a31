use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("format error: {0}")]
    Format(String),
    #[error("cryptography error: {0}")]
    Crypto(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
