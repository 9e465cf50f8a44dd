use crate::parser::ParseError;

#[cfg(not(target_arch = "wasm32"))]
use crate::{loader::LoadError, router::RouteError};

/// Top-level error for loading, parsing and routing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[cfg(not(target_arch = "wasm32"))]
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
