/*!
 * Sandbox Guard
 * Confines destinations of mutating operations to one subtree
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::paths::normalize;

/// Immutable sandbox boundary
///
/// The configured path is normalized once: anchored at `/`, with `.`, `..`,
/// repeated and trailing separators removed. Stripping and containment both
/// work from that form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Sandbox {
    prefix: String,
    root: PathBuf,
}

impl Sandbox {
    /// Create a sandbox rooted at `path`
    ///
    /// Existence is not checked. A relative path is taken from `/`.
    pub fn new(path: impl Into<String>) -> Self {
        let root = normalize(&path.into());
        let prefix = root.to_string_lossy().into_owned();
        Self { prefix, root }
    }

    /// Normalized prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Remove the sandbox prefix from a client-visible path
    ///
    /// Only a genuine leading prefix that ends on a component boundary is
    /// stripped; any other path is returned unchanged.
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        if self.prefix == "/" {
            return path;
        }
        match path.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => path,
        }
    }

    /// True when `path` is the sandbox root or lies below it
    ///
    /// Lexical check: `..` segments are resolved before comparing, so a
    /// path that climbs out and back in is still inside.
    pub fn contains(&self, path: &str) -> bool {
        normalize(path).starts_with(&self.root)
    }
}

impl From<String> for Sandbox {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<Sandbox> for String {
    fn from(sandbox: Sandbox) -> Self {
        sandbox.prefix
    }
}
