/*!
 * Node Traits
 * Capability contracts every node store must supply
 */

use bytes::Bytes;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::types::*;

/// Boxed future returned by every collaborator call
///
/// Each call is a suspension point that resumes with a value or a failure.
/// Boxing keeps the traits object safe and lets the copy walk recurse.
pub type NodeFuture<'a, T> = Pin<Box<dyn Future<Output = TreeResult<T>> + Send + 'a>>;

/// Shared handle to a node produced by a resolver
pub type NodeRef = Arc<dyn Node>;

/// Opaque handle to a file or collection
///
/// Capabilities are discovered through the `as_*` queries; a node that
/// answers `None` for all of them only supports identity operations.
pub trait Node: Send + Sync {
    /// Last path segment of this node
    fn name(&self) -> &str;

    /// Rename in place, keeping the same parent
    fn rename<'a>(&'a self, new_name: &'a str) -> NodeFuture<'a, ()>;

    /// Delete this node (and its subtree for collections)
    fn delete(&self) -> NodeFuture<'_, ()>;

    fn as_file(&self) -> Option<&dyn File> {
        None
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        None
    }

    fn as_properties(&self) -> Option<&dyn Properties> {
        None
    }

    /// Check a single capability
    fn supports(&self, cap: Capability) -> bool {
        match cap {
            Capability::File => self.as_file().is_some(),
            Capability::Collection => self.as_collection().is_some(),
            Capability::Properties => self.as_properties().is_some(),
        }
    }

    /// Full capability set of this node
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            file: self.supports(Capability::File),
            collection: self.supports(Capability::Collection),
            properties: self.supports(Capability::Properties),
        }
    }
}

/// Readable byte content
pub trait File: Send + Sync {
    /// Read the full content
    fn read(&self) -> NodeFuture<'_, Bytes>;
}

/// Enumerable set of children
pub trait Collection: Send + Sync {
    /// Create a child file with the given content
    ///
    /// Does not return the new node; callers re-resolve it with `child`.
    fn create_file<'a>(&'a self, name: &'a str, data: Bytes) -> NodeFuture<'a, ()>;

    /// Create an empty child collection
    fn create_directory<'a>(&'a self, name: &'a str) -> NodeFuture<'a, ()>;

    /// Look up a direct child by name
    fn child<'a>(&'a self, name: &'a str) -> NodeFuture<'a, NodeRef>;

    /// Enumerate direct children in the store's order
    fn children(&self) -> NodeFuture<'_, Vec<NodeRef>>;
}

/// Associative metadata, readable and bulk-writable
pub trait Properties: Send + Sync {
    fn properties(&self) -> NodeFuture<'_, PropertyMap>;

    /// Set every entry of `props`, leaving other properties untouched
    fn update_properties(&self, props: PropertyMap) -> NodeFuture<'_, ()>;
}

/// Path to node lookup, supplied by a concrete store
pub trait NodeResolver: Send + Sync {
    /// Resolve a path, failing with `TreeError::NotFound` when nothing is there
    fn node_for_path<'a>(&'a self, path: &'a str) -> NodeFuture<'a, NodeRef>;

    /// Notify the store that the listing of `path` changed
    fn mark_dirty<'a>(&'a self, _path: &'a str) -> NodeFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }

    /// Store name, for logging
    fn name(&self) -> &str;
}
