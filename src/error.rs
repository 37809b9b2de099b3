//! Error types.
//!
//! [`LoadError`] covers everything that can go wrong while an entity acquires
//! its graphics resources. It is fatal for the entity being loaded and is
//! surfaced to whoever started the load; nothing is retried.
//!
//! [`ConfigError`] is returned by [`GameConfig`](crate::resources::gameconfig::GameConfig)
//! when the INI file cannot be read or written.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to acquire a resource an entity needs to become live.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("texture `{0}` is not available")]
    MissingTexture(String),

    #[error("model `{0}` is not available")]
    MissingModel(String),

    #[error("model `{model}` has no part named `{part}`")]
    MissingModelPart { model: String, part: String },

    #[error("no ground textures are available")]
    MissingGroundTexture,

    #[error("unable to read asset {path:?}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model descriptor {path:?}: {source}")]
    ModelFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to read or write the INI configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to save config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that ends a headless run early.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
