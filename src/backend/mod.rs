/*!
 * Node Store Backends
 * Concrete resolvers the tree can run over
 */

pub mod local;
pub mod memory;

// Re-exports
pub use local::LocalStore;
pub use memory::MemoryStore;

use crate::node::{TreeError, TreeResult};

/// Validate a single child name before creating or renaming
pub(crate) fn validate_name(name: &str) -> TreeResult<()> {
    if name.is_empty() {
        return Err(TreeError::InvalidPath("name cannot be empty".into()));
    }
    if name == "." || name == ".." {
        return Err(TreeError::InvalidPath(format!("reserved name: {name}")));
    }
    if name.contains('\0') {
        return Err(TreeError::InvalidPath(
            "name cannot contain null bytes".into(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(TreeError::InvalidPath(format!(
            "name cannot contain path separators: {name}"
        )));
    }
    Ok(())
}
