/*!
 * Node Module
 * Capability contracts consumed by the tree orchestrator
 */

pub mod traits;
pub mod types;

// Re-exports
pub use traits::{Collection, File, Node, NodeFuture, NodeRef, NodeResolver, Properties};
pub use types::{Capabilities, Capability, PropertyMap, TreeError, TreeResult};
