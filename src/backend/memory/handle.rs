/*!
 * In-Memory Node Handles
 * Capability implementations over a shared MemoryStore
 */

use bytes::Bytes;
use std::path::PathBuf;
use std::sync::Arc;

use super::entry::Entry;
use super::MemoryStore;
use crate::node::*;

/// Handle to one entry of a `MemoryStore`
///
/// Captures the entry kind when resolved; the entry itself stays in the store.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    store: MemoryStore,
    path: PathBuf,
    name: String,
    is_dir: bool,
}

impl MemoryNode {
    pub(super) fn new(store: MemoryStore, path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            store,
            path,
            name,
            is_dir,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Node for MemoryNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename<'a>(&'a self, new_name: &'a str) -> NodeFuture<'a, ()> {
        Box::pin(async move { self.store.rename_entry(&self.path, new_name) })
    }

    fn delete(&self) -> NodeFuture<'_, ()> {
        Box::pin(async move { self.store.remove_entry(&self.path) })
    }

    fn as_file(&self) -> Option<&dyn File> {
        if self.is_dir {
            None
        } else {
            Some(self)
        }
    }

    fn as_collection(&self) -> Option<&dyn Collection> {
        if self.is_dir {
            Some(self)
        } else {
            None
        }
    }

    fn as_properties(&self) -> Option<&dyn Properties> {
        Some(self)
    }
}

impl File for MemoryNode {
    fn read(&self) -> NodeFuture<'_, Bytes> {
        Box::pin(async move {
            match self.store.entry(&self.path)? {
                Entry::File { data, .. } => Ok(data),
                Entry::Directory { .. } => Err(TreeError::Store(format!(
                    "cannot read collection {}",
                    self.path.display()
                ))),
            }
        })
    }
}

impl Collection for MemoryNode {
    fn create_file<'a>(&'a self, name: &'a str, data: Bytes) -> NodeFuture<'a, ()> {
        Box::pin(async move { self.store.insert_child(&self.path, name, Entry::file(data)) })
    }

    fn create_directory<'a>(&'a self, name: &'a str) -> NodeFuture<'a, ()> {
        Box::pin(async move { self.store.insert_child(&self.path, name, Entry::directory()) })
    }

    fn child<'a>(&'a self, name: &'a str) -> NodeFuture<'a, NodeRef> {
        Box::pin(async move {
            let node: NodeRef = Arc::new(self.store.handle(&self.path.join(name))?);
            Ok(node)
        })
    }

    fn children(&self) -> NodeFuture<'_, Vec<NodeRef>> {
        Box::pin(async move {
            let names = match self.store.entry(&self.path)? {
                Entry::Directory { children, .. } => children,
                Entry::File { .. } => {
                    return Err(TreeError::NotACollection(self.path.display().to_string()))
                }
            };

            let mut nodes: Vec<NodeRef> = Vec::with_capacity(names.len());
            for name in names {
                // Skip children removed since the listing was taken
                if let Ok(node) = self.store.handle(&self.path.join(&name)) {
                    nodes.push(Arc::new(node));
                }
            }
            Ok(nodes)
        })
    }
}

impl Properties for MemoryNode {
    fn properties(&self) -> NodeFuture<'_, PropertyMap> {
        Box::pin(async move { Ok(self.store.entry(&self.path)?.properties().clone()) })
    }

    fn update_properties(&self, props: PropertyMap) -> NodeFuture<'_, ()> {
        Box::pin(async move { self.store.update_properties(&self.path, props) })
    }
}
