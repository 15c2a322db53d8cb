//! Errors raised by the shared LexiQ plumbing
//!
//! Only bootstrap and lifecycle code returns these; request handling has its
//! own error types in each service.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Reading the config file or creating a data directory failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
