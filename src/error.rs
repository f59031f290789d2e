use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnigmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Index {index} is out of range for an alphabet of {size} symbols")]
    OutOfRange { index: usize, size: usize },

    #[error("Symbol '{0}' is not in the alphabet")]
    SymbolNotFound(char),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EnigmaError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EnigmaError>;
