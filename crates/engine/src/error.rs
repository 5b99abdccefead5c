use std::fmt;

use formats::TilesetError;

use crate::primitives::PrimitiveId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The primitive was already removed and destroyed.
    StalePrimitive(PrimitiveId),
    DuplicateEntity(String),
    UnknownEntity(String),
    NoPrimitives,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::StalePrimitive(id) => write!(f, "{id} was already destroyed"),
            EngineError::DuplicateEntity(id) => write!(f, "entity id already in use: {id}"),
            EngineError::UnknownEntity(id) => write!(f, "no entity with id {id}"),
            EngineError::NoPrimitives => write!(f, "scene has no primitives"),
        }
    }
}

impl std::error::Error for EngineError {}

#[derive(Debug)]
pub enum LoadError {
    InvalidUrl(String),
    NotFound(String),
    Io { url: String, source: std::io::Error },
    Tileset { url: String, source: TilesetError },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::InvalidUrl(url) => write!(f, "invalid tileset url: {url}"),
            LoadError::NotFound(url) => write!(f, "tileset not found: {url}"),
            LoadError::Io { url, source } => write!(f, "failed to read {url}: {source}"),
            LoadError::Tileset { url, source } => write!(f, "bad tileset {url}: {source}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Tileset { source, .. } => Some(source),
            LoadError::InvalidUrl(_) | LoadError::NotFound(_) => None,
        }
    }
}
