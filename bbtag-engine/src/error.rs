use thiserror::Error;

pub type BbResult<T> = Result<T, BbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BbError {
    #[error("Selection {start}..{end} is out of bounds for a buffer of {len} characters")]
    SelectionOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Selection start {start} is after its end {end}")]
    InvertedSelection { start: usize, end: usize },

    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("Invalid color value '{value}': {reason}")]
    InvalidColor { value: String, reason: String },

    #[error("Unknown command '{command}'")]
    UnknownCommand { command: String },

    #[error("Command '{command}' requires a value")]
    MissingCommandValue { command: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_yaml::Error> for BbError {
    fn from(err: serde_yaml::Error) -> Self {
        BbError::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for BbError {
    fn from(err: std::io::Error) -> Self {
        BbError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BbError {
    fn from(err: serde_json::Error) -> Self {
        BbError::DeserializationError(err.to_string())
    }
}
