/*!
 * DAV Tree
 * Sandboxed virtual tree layer for WebDAV-class servers
 *
 * The tree resolves client paths to nodes through a pluggable store and
 * drives copy, move, delete and enumeration over the nodes' capabilities.
 */

pub mod backend;
pub mod config;
pub mod node;
pub mod tracer;
pub mod tree;

// Re-exports
pub use backend::{LocalStore, MemoryStore};
pub use config::{InvalidationPolicy, TreeConfig};
pub use node::{
    Capabilities, Capability, Collection, File, Node, NodeFuture, NodeRef, NodeResolver,
    Properties, PropertyMap, TreeError, TreeResult,
};
pub use tracer::init_tracing;
pub use tree::{copy_node, split_path, EventBroadcaster, Sandbox, Tree, TreeBuilder, TreeEvent};
