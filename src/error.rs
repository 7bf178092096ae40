use crate::dispatch::Stage;

use std::error::Error as StdError;

use http::{Method, StatusCode};

pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Rejected registration.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("path template can not be empty")]
    EmptyTemplate,

    #[error("wildcard can only appear as the last segment: {0:?}")]
    MisplacedWildcard(String),

    #[error("capture name can not be empty: {0:?}")]
    EmptyParamName(String),

    #[error("capture name appears more than once: {0:?}")]
    DuplicateParam(String),

    #[error("unsupported http method: {0}")]
    UnsupportedMethod(String),

    #[error("unknown route target: {0:?}")]
    UnknownTarget(String),
}

/// Classified failure of a single dispatch.
///
/// Never escapes the dispatcher: every variant is turned into a response.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no route matched: {method} {path}")]
    NoRouteMatched { method: Method, path: String },

    #[error("no acceptable representation: {method} {path} (accept: {accept:?})")]
    NoAcceptableRepresentation {
        method: Method,
        path: String,
        accept: String,
    },

    #[error("{stage} handler failed: entry = {entry:?}: {source}")]
    HandlerFailure {
        stage: Stage,
        entry: String,
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NoRouteMatched { .. } => StatusCode::NOT_FOUND,
            Self::NoAcceptableRepresentation { .. } => StatusCode::NOT_ACCEPTABLE,
            Self::HandlerFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
