//! Reading receiver configuration documents from disk.

use crate::config::ReceiverConfig;
use crate::error::Error;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read configuration from {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("unsupported configuration format {0:?}, expected yaml, json or toml")]
    UnknownFormat(PathBuf),

    #[error("failed to decode configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to decode configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to decode configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] Error),
}

/// The document formats a receiver configuration can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Determine the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

/// Read, decode and validate the receiver configuration stored at `path`.
pub fn from_path(path: impl AsRef<Path>) -> Result<ReceiverConfig, LoadError> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| LoadError::UnknownFormat(path.into()))?;

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.into(),
        source,
    })?;

    debug!(?path, ?format, "loaded configuration document");
    from_str(&contents, format)
}

/// Decode and validate a receiver configuration document.
pub fn from_str(contents: &str, format: Format) -> Result<ReceiverConfig, LoadError> {
    let config: ReceiverConfig = match format {
        Format::Yaml => serde_yaml::from_str(contents)?,
        Format::Json => serde_json::from_str(contents)?,
        Format::Toml => toml::from_str(contents)?,
    };

    config.validate()?;
    Ok(config)
}
