use thiserror::Error;

/// Everything that can go wrong while building or mounting a scene.
///
/// Nothing here is raised per frame: once a scene is running, updates and
/// renders are infallible.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
    #[error("failed to parse scene config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    #[error("unknown anchor {0:?}")]
    UnknownAnchor(String),
    #[error("rendering context unavailable: {0}")]
    ContextUnavailable(String),
}

pub type SceneResult<T> = Result<T, SceneError>;
