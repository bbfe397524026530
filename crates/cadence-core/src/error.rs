use std::path::PathBuf;

/// Errors raised while building a workout or loading its settings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A duration or session count was zero
    #[error("{field} must be a positive integer")]
    InvalidDuration { field: &'static str },

    #[error("failed to locate the user config directory")]
    NoConfigDir,

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {}: {source}", path.display())]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    SerializeSettings(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
