/*!
 * In-Memory Node Store
 * Volatile store for tests, demos and scratch trees
 */

mod entry;
mod handle;

use ahash::RandomState;
use bytes::Bytes;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::validate_name;
use crate::node::{NodeFuture, NodeRef, NodeResolver, PropertyMap, TreeError, TreeResult};
use crate::tree::paths::normalize;
use entry::Entry;
pub use handle::MemoryNode;

/// In-memory node store
///
/// Entries are keyed by normalized absolute path; `/` always exists.
/// Every node carries properties. Children enumerate in name order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: Arc<DashMap<PathBuf, Entry, RandomState>>,
}

impl MemoryStore {
    /// Create a store holding only the root collection
    pub fn new() -> Self {
        let entries = DashMap::with_hasher(RandomState::new());
        entries.insert(PathBuf::from("/"), Entry::directory());

        Self {
            entries: Arc::new(entries),
        }
    }

    /// Create every missing directory along `path`
    pub fn create_dir_all(&self, path: &str) -> TreeResult<()> {
        let path = normalize(path);
        let mut current = PathBuf::from("/");

        for component in path.components().skip(1) {
            let parent = current.clone();
            current.push(component);

            match self.entries.get(&current).map(|e| e.is_dir()) {
                Some(true) => continue,
                Some(false) => {
                    return Err(TreeError::NotACollection(current.display().to_string()))
                }
                None => {
                    let name = file_name(&current)?;
                    self.insert_child(&parent, &name, Entry::directory())?;
                }
            }
        }
        Ok(())
    }

    /// Write a file, creating missing parent directories
    ///
    /// Overwrites existing file content but keeps its properties.
    pub fn write_file(&self, path: &str, data: impl Into<Bytes>) -> TreeResult<()> {
        let path = normalize(path);
        let parent = parent_of(&path)?;
        let name = file_name(&path)?;
        self.create_dir_all(&parent.to_string_lossy())?;

        if let Some(mut entry) = self.entries.get_mut(&path) {
            return match entry.value_mut() {
                Entry::File { data: existing, .. } => {
                    *existing = data.into();
                    Ok(())
                }
                Entry::Directory { .. } => {
                    Err(TreeError::AlreadyExists(format!("{} is a collection", path.display())))
                }
            };
        }

        self.insert_child(&parent, &name, Entry::file(data.into()))
    }

    /// Set a single property on an existing node
    pub fn set_property(&self, path: &str, key: &str, value: &str) -> TreeResult<()> {
        let path = normalize(path);
        let mut entry = self
            .entries
            .get_mut(&path)
            .ok_or_else(|| TreeError::NotFound(path.display().to_string()))?;
        entry
            .properties_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// File content at `path`, if a file is there
    pub fn read_file(&self, path: &str) -> Option<Bytes> {
        match self.entries.get(&normalize(path)).map(|e| e.clone()) {
            Some(Entry::File { data, .. }) => Some(data),
            _ => None,
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(&normalize(path))
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.entries
            .get(&normalize(path))
            .map(|e| e.is_dir())
            .unwrap_or(false)
    }

    pub fn properties_of(&self, path: &str) -> Option<PropertyMap> {
        self.entries
            .get(&normalize(path))
            .map(|e| e.properties().clone())
    }

    /// Child names of the directory at `path`, in enumeration order
    pub fn list(&self, path: &str) -> Option<Vec<String>> {
        match self.entries.get(&normalize(path)).map(|e| e.clone()) {
            Some(Entry::Directory { children, .. }) => Some(children.into_iter().collect()),
            _ => None,
        }
    }

    /// Build a handle for an existing entry
    pub(super) fn handle(&self, path: &Path) -> TreeResult<MemoryNode> {
        let is_dir = self
            .entries
            .get(path)
            .map(|e| e.is_dir())
            .ok_or_else(|| TreeError::NotFound(path.display().to_string()))?;
        Ok(MemoryNode::new(self.clone(), path.to_path_buf(), is_dir))
    }

    /// Insert a new entry under an existing directory
    pub(super) fn insert_child(&self, parent: &Path, name: &str, entry: Entry) -> TreeResult<()> {
        validate_name(name)?;
        let path = parent.join(name);
        if self.entries.contains_key(&path) {
            return Err(TreeError::AlreadyExists(path.display().to_string()));
        }

        {
            let mut parent_entry = self
                .entries
                .get_mut(parent)
                .ok_or_else(|| TreeError::NotFound(parent.display().to_string()))?;
            match parent_entry.value_mut() {
                Entry::Directory { children, .. } => {
                    if !children.insert(name.to_string()) {
                        return Err(TreeError::AlreadyExists(path.display().to_string()));
                    }
                }
                Entry::File { .. } => {
                    return Err(TreeError::NotACollection(parent.display().to_string()))
                }
            }
        }

        debug!(path = %path.display(), dir = entry.is_dir(), "Created entry");
        self.entries.insert(path, entry);
        Ok(())
    }

    /// Re-key the subtree at `path` under a new name in the same parent
    pub(super) fn rename_entry(&self, path: &Path, new_name: &str) -> TreeResult<()> {
        validate_name(new_name)?;
        let parent = parent_of(path)?;
        let old_name = file_name(path)?;
        if old_name == new_name {
            return Ok(());
        }
        let new_path = parent.join(new_name);

        if !self.entries.contains_key(path) {
            return Err(TreeError::NotFound(path.display().to_string()));
        }
        if self.entries.contains_key(&new_path) {
            return Err(TreeError::AlreadyExists(new_path.display().to_string()));
        }

        for old_key in self.subtree_keys(path) {
            if let Some((_, entry)) = self.entries.remove(&old_key) {
                let new_key = match old_key.strip_prefix(path) {
                    Ok(rest) if !rest.as_os_str().is_empty() => new_path.join(rest),
                    _ => new_path.clone(),
                };
                self.entries.insert(new_key, entry);
            }
        }

        if let Some(mut parent_entry) = self.entries.get_mut(&parent) {
            if let Entry::Directory { children, .. } = parent_entry.value_mut() {
                children.remove(&old_name);
                children.insert(new_name.to_string());
            }
        }

        debug!(from = %path.display(), to = %new_path.display(), "Renamed entry");
        Ok(())
    }

    /// Remove the entry at `path` and everything below it
    pub(super) fn remove_entry(&self, path: &Path) -> TreeResult<()> {
        let parent = parent_of(path)?;
        let name = file_name(path)?;

        if !self.entries.contains_key(path) {
            return Err(TreeError::NotFound(path.display().to_string()));
        }

        let keys = self.subtree_keys(path);
        let removed = keys.len();
        for key in keys {
            self.entries.remove(&key);
        }

        if let Some(mut parent_entry) = self.entries.get_mut(&parent) {
            if let Entry::Directory { children, .. } = parent_entry.value_mut() {
                children.remove(&name);
            }
        }

        debug!(path = %path.display(), removed, "Removed subtree");
        Ok(())
    }

    pub(super) fn entry(&self, path: &Path) -> TreeResult<Entry> {
        self.entries
            .get(path)
            .map(|e| e.clone())
            .ok_or_else(|| TreeError::NotFound(path.display().to_string()))
    }

    pub(super) fn update_properties(&self, path: &Path, props: PropertyMap) -> TreeResult<()> {
        let mut entry = self
            .entries
            .get_mut(path)
            .ok_or_else(|| TreeError::NotFound(path.display().to_string()))?;
        entry.properties_mut().extend(props);
        Ok(())
    }

    /// Keys of `path` and all of its descendants
    fn subtree_keys(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .iter()
            .filter(|e| e.key().starts_with(path))
            .map(|e| e.key().clone())
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeResolver for MemoryStore {
    fn node_for_path<'a>(&'a self, path: &'a str) -> NodeFuture<'a, NodeRef> {
        Box::pin(async move {
            let node: NodeRef = Arc::new(self.handle(&normalize(path))?);
            Ok(node)
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Parent of a non-root path
fn parent_of(path: &Path) -> TreeResult<PathBuf> {
    path.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| TreeError::Forbidden("the root collection cannot be changed".into()))
}

fn file_name(path: &Path) -> TreeResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| TreeError::InvalidPath(format!("invalid path: {}", path.display())))
}
