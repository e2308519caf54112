/*!
 * Tree Error Types
 * Structured, type-safe error handling for tree operations
 */

use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Tree operation result
///
/// # Must Use
/// Tree operations can fail part way through and must be handled
#[must_use = "tree operations can fail and must be handled"]
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors surfaced by the tree layer and its node collaborators
///
/// All message variants carry a non-empty context string.
/// Serialization uses the tagged enum pattern so a front end can forward them.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum TreeError {
    #[error("Not found: {0}")]
    #[diagnostic(code(tree::not_found), help("No node exists at this path."))]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Forbidden: {0}")]
    #[diagnostic(
        code(tree::forbidden),
        help("The destination resolves outside the configured sandbox.")
    )]
    Forbidden(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Unsupported node: {0}")]
    #[diagnostic(
        code(tree::unsupported),
        help("The node is neither a file nor a collection and cannot be copied.")
    )]
    Unsupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not a collection: {0}")]
    #[diagnostic(code(tree::not_a_collection))]
    NotACollection(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Already exists: {0}")]
    #[diagnostic(code(tree::already_exists))]
    AlreadyExists(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid path: {0}")]
    #[diagnostic(code(tree::invalid_path))]
    InvalidPath(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid destination: {0}")]
    #[diagnostic(
        code(tree::invalid_destination),
        help("A node cannot be copied or moved onto itself or into its own subtree.")
    )]
    InvalidDestination(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Store failure: {0}")]
    #[diagnostic(
        code(tree::store),
        help("The node store rejected the operation. Earlier steps were not rolled back.")
    )]
    Store(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(tree::io))]
    Io(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(tree::config), help("Check the DAVTREE_* environment variables."))]
    Config(#[serde(deserialize_with = "deserialize_nonempty_string")] String),
}

impl TreeError {
    /// HTTP status a WebDAV front end answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            TreeError::NotFound(_) => 404,
            TreeError::Forbidden(_) => 403,
            TreeError::Unsupported(_) => 501,
            TreeError::NotACollection(_) => 409,
            TreeError::AlreadyExists(_) => 412,
            TreeError::InvalidPath(_) => 400,
            TreeError::InvalidDestination(_) => 409,
            TreeError::Store(_) | TreeError::Io(_) | TreeError::Config(_) => 500,
        }
    }

    /// Convert a host I/O error, keeping the kinds the tree cares about
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotFound => TreeError::NotFound(context.into()),
            ErrorKind::PermissionDenied => TreeError::Forbidden(context.into()),
            ErrorKind::AlreadyExists => TreeError::AlreadyExists(context.into()),
            _ => TreeError::Io(format!("{}: {}", context.into(), e)),
        }
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
