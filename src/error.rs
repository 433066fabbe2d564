use thiserror::Error;

use crate::content::Document;
use crate::nav::{InitHook, PanelId};

/// Why a single content document could not be loaded.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("reading {document}: {source}")]
    Io {
        document: Document,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {document}: {source}")]
    Parse {
        document: Document,
        #[source]
        source: serde_json::Error,
    },
    #[error("{document}: expected an array or an object keyed by {expected}")]
    Shape {
        document: Document,
        expected: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("unknown panel '{0}'")]
    UnknownPanel(String),
    #[error("panel '{0}' is not registered")]
    Unregistered(PanelId),
}

#[derive(Debug, Error)]
pub enum PrefError {
    #[error("preference file: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised by an init hook; the navigator logs it and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{hook:?}: {reason}")]
pub struct HookError {
    pub hook: InitHook,
    pub reason: String,
}
