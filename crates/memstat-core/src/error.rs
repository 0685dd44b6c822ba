use thiserror::Error;

/// Canonical result for memstat.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid memory size '{0}'")]
    InvalidSize(String),

    #[error("Invalid memstat mode '{0}' (expected 'off', 'collect' or 'print')")]
    InvalidMode(String),

    #[error("Invalid compiler kind '{0}'")]
    InvalidCompiler(String),

    // Core does no I/O itself; the CLI maps file errors into this variant.
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Trace error: {0}")]
    Trace(String),

    #[error("Compilation memory statistic already initialized")]
    AlreadyInitialized,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Trace(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
