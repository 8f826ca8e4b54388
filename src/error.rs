//! Library error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Could not read a config or feed file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has wrong types.
    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    /// Config parsed but a value is out of range.
    #[error("Invalid config value for `{field}`: {reason}")]
    ConfigValue { field: &'static str, reason: String },

    /// A feed line could not be decoded.
    #[error("Feed parse error: {0}")]
    Feed(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
