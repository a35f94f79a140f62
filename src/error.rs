use crate::runtime::key_bindings::HotkeyParseError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchboxError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config '{path}': {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid hotkey: {0}")]
    Hotkey(#[from] HotkeyParseError),

    #[error("invalid replay step '{step}': {reason}")]
    ReplayStep { step: String, reason: String },

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SearchboxError>;
