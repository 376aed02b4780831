//! Error types for plugseek.
//!
//! Discovery and wildcard matching never fail; these errors come from the
//! fallible edges: loading configuration, parsing versions and log levels,
//! and the module registry.

use thiserror::Error;

/// Result type for plugseek operations.
pub type Result<T> = std::result::Result<T, Error>;

/// plugseek error types.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(String),

    /// Configuration parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Version string could not be parsed.
    #[error("Invalid version '{0}': expected <major>.<minor>")]
    VersionParse(String),

    /// Unknown log level in a channel filter.
    #[error("Unknown log level '{0}': valid options are verbose, info, warn, error, fatal, disable")]
    UnknownLogLevel(String),

    /// A module with the same name is already registered.
    #[error("Module already registered: {0}")]
    AlreadyRegistered(String),

    /// A library path from which no module name can be derived.
    #[error("Invalid module '{path}': {reason}")]
    InvalidModule { path: String, reason: String },

    /// Module not found.
    #[error("Module not found: {0}")]
    NotFound(String),

    /// A global log subscriber could not be installed.
    #[error("Logging init error: {0}")]
    LoggingInit(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::ConfigParse(e.to_string())
    }
}
