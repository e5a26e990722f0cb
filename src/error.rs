use crate::config::ConfigError;
use crate::contact::RelayError;
use thiserror::Error;

/// Errors that can end a folio3d command.
///
/// Preference storage and rig assets never end up here: their failures are
/// logged and replaced by an in-memory store or the placeholder figure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Terminal I/O
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
