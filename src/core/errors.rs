/*!
 * Error Types
 * Configuration errors surfaced to administrative callers, with thiserror and miette
 *
 * Dispatch-time failures never appear here: they are absorbed at the
 * processor failure boundary and only ever logged.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by administrative engine operations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum EngineError {
    #[error("Required collaborator is not configured: {0}")]
    #[diagnostic(
        code(engine::missing_collaborator),
        help("Set the processor factory, decomposer and correlation strategy before calling startup().")
    )]
    MissingCollaborator(String),

    #[error("Invalid argument: {0}")]
    #[diagnostic(
        code(engine::invalid_argument),
        help("Names and prefixes passed to administrative calls must be non-empty.")
    )]
    InvalidArgument(String),

    #[error("Override table is full: at most {limit} monitor level prefixes may be registered")]
    #[diagnostic(
        code(engine::capacity_exceeded),
        help("Remove the engine's overrides with restart() or reuse an existing prefix.")
    )]
    CapacityExceeded { limit: usize },

    #[error("Unknown monitoring level: {0}")]
    #[diagnostic(
        code(engine::invalid_level),
        help("Valid levels are ESSENTIAL, INFO and DEBUG.")
    )]
    InvalidLevel(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(engine::config),
        help("Check MONITORING_* environment variables or the JSON configuration document.")
    )]
    Config(String),
}

impl EngineError {
    pub(crate) fn missing(collaborator: &str) -> Self {
        EngineError::MissingCollaborator(collaborator.to_string())
    }

    pub(crate) fn invalid_argument(what: &str) -> Self {
        EngineError::InvalidArgument(what.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}
