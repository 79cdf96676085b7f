use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyfileError {
    #[error("Keyfile format error(line {line}: {text})")]
    Format { line: usize, text: String },

    #[error("Keyfile is missing field {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key modulus of `{0}` bytes is too short for signing")]
    KeyTooShort(usize),

    #[error("Data of `{actual}` bytes exceeds the maximum `{max}` bytes for this key")]
    DataTooLarge { max: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Keyfile(#[from] KeyfileError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Output(#[from] std::io::Error),
}
