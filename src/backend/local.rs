/*!
 * Local Filesystem Store
 * Serves a host directory as a node tree through tokio::fs
 */

use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::validate_name;
use crate::node::*;

/// Host filesystem store rooted at a directory
///
/// Nodes are plain files and directories; no properties are kept.
/// Children enumerate in name order.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store serving `root`
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a tree path onto the host, never climbing above the root
    ///
    /// Purely lexical: `..` at the root boundary is dropped. Symlinks are
    /// checked separately by `confine` when a node is built.
    fn resolve(&self, path: &str) -> PathBuf {
        let mut components = Vec::with_capacity(8);

        for component in Path::new(path).components() {
            match component {
                Component::Normal(name) => components.push(name),
                Component::ParentDir => {
                    components.pop();
                }
                _ => {}
            }
        }

        let mut result = self.root.clone();
        for component in components {
            result.push(component);
        }
        result
    }

    /// Fail with `Forbidden` when `host` really lives outside the root
    ///
    /// The deepest existing ancestor of `host` (or `host` itself) is
    /// canonicalized, so a symlink anywhere along the way that leads out of
    /// the root is caught even when the final entry does not exist yet.
    async fn confine(&self, host: &Path) -> TreeResult<()> {
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| TreeError::from_io(e, self.root.display().to_string()))?;

        let mut existing = host;
        let canonical = loop {
            match tokio::fs::canonicalize(existing).await {
                Ok(canonical) => break canonical,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => match existing.parent() {
                    Some(parent) => existing = parent,
                    None => return Err(TreeError::from_io(e, host.display().to_string())),
                },
                Err(e) => return Err(TreeError::from_io(e, host.display().to_string())),
            }
        };

        if canonical.starts_with(&root) {
            Ok(())
        } else {
            warn!(path = %host.display(), target = %canonical.display(), "Path escapes store root");
            Err(TreeError::Forbidden(format!(
                "{} resolves outside the store root",
                host.display()
            )))
        }
    }

    /// Build a node for `host`, following symlinks that stay inside the root
    async fn handle(&self, host: PathBuf) -> TreeResult<LocalNode> {
        self.confine(&host).await?;
        let metadata = tokio::fs::metadata(&host)
            .await
            .map_err(|e| TreeError::from_io(e, host.display().to_string()))?;
        Ok(LocalNode::new(self.clone(), host, metadata.is_dir()))
    }
}

impl NodeResolver for LocalStore {
    fn node_for_path<'a>(&'a self, path: &'a str) -> NodeFuture<'a, NodeRef> {
        Box::pin(async move {
            let node: NodeRef = Arc::new(self.handle(self.resolve(path)).await?);
            Ok(node)
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Handle to a host file or directory
#[derive(Debug, Clone)]
pub struct LocalNode {
    store: LocalStore,
    host: PathBuf,
    name: String,
    is_dir: bool,
}

impl LocalNode {
    fn new(store: LocalStore, host: PathBuf, is_dir: bool) -> Self {
        let name = host
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            store,
            host,
            name,
            is_dir,
        }
    }

    /// Location on the host filesystem
    pub fn host_path(&self) -> &Path {
        &self.host
    }

    fn is_root(&self) -> bool {
        self.host == self.store.root
    }

    fn io_error(&self, e: std::io::Error) -> TreeError {
        TreeError::from_io(e, self.host.display().to_string())
    }
}

impl Node for LocalNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn rename<'a>(&'a self, new_name: &'a str) -> NodeFuture<'a, ()> {
        Box::pin(async move {
            validate_name(new_name)?;
            if self.is_root() {
                return Err(TreeError::Forbidden("the root collection cannot be renamed".into()));
            }
            let target = match self.host.parent() {
                Some(parent) => parent.join(new_name),
                None => return Err(TreeError::InvalidPath(self.host.display().to_string())),
            };
            if target == self.host {
                return Ok(());
            }
            self.store.confine(&target).await?;
            if tokio::fs::try_exists(&target).await.unwrap_or(false) {
                return Err(TreeError::AlreadyExists(target.display().to_string()));
            }

            tokio::fs::rename(&self.host, &target)
                .await
                .map_err(|e| self.io_error(e))?;
            debug!(from = %self.host.display(), to = %target.display(), "Renamed");
            Ok(())
        })
    }

    fn delete(&self) -> NodeFuture<'_, ()> {
        Box::pin(async move {
            if self.is_root() {
                return Err(TreeError::Forbidden("the root collection cannot be deleted".into()));
            }
            let metadata = tokio::fs::symlink_metadata(&self.host)
                .await
                .map_err(|e| self.io_error(e))?;
            let removed = if metadata.is_dir() {
                tokio::fs::remove_dir_all(&self.host).await
            } else {
                tokio::fs::remove_file(&self.host).await
            };
            removed.map_err(|e| self.io_error(e))?;
            debug!(path = %self.host.display(), "Deleted");
            Ok(())
        })
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
}

impl File for LocalNode {
    fn read(&self) -> NodeFuture<'_, Bytes> {
        Box::pin(async move {
            let data = tokio::fs::read(&self.host)
                .await
                .map_err(|e| self.io_error(e))?;
            Ok(Bytes::from(data))
        })
    }
}

impl Collection for LocalNode {
    fn create_file<'a>(&'a self, name: &'a str, data: Bytes) -> NodeFuture<'a, ()> {
        Box::pin(async move {
            validate_name(name)?;
            let target = self.host.join(name);
            self.store.confine(&target).await?;
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&target)
                .await
                .map_err(|e| TreeError::from_io(e, target.display().to_string()))?;
            file.write_all(&data)
                .await
                .map_err(|e| TreeError::from_io(e, target.display().to_string()))?;
            file.flush()
                .await
                .map_err(|e| TreeError::from_io(e, target.display().to_string()))?;
            Ok(())
        })
    }

    fn create_directory<'a>(&'a self, name: &'a str) -> NodeFuture<'a, ()> {
        Box::pin(async move {
            validate_name(name)?;
            let target = self.host.join(name);
            self.store.confine(&target).await?;
            tokio::fs::create_dir(&target)
                .await
                .map_err(|e| TreeError::from_io(e, target.display().to_string()))?;
            Ok(())
        })
    }

    fn child<'a>(&'a self, name: &'a str) -> NodeFuture<'a, NodeRef> {
        Box::pin(async move {
            validate_name(name)?;
            let node: NodeRef = Arc::new(self.store.handle(self.host.join(name)).await?);
            Ok(node)
        })
    }

    fn children(&self) -> NodeFuture<'_, Vec<NodeRef>> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(&self.host)
                .await
                .map_err(|e| self.io_error(e))?;

            let mut nodes = Vec::new();
            while let Some(entry) = entries.next_entry().await.map_err(|e| self.io_error(e))? {
                // Follow symlinks like path lookup does; hide ones that escape or dangle
                match self.store.handle(entry.path()).await {
                    Ok(node) => nodes.push(node),
                    Err(TreeError::Forbidden(_)) | Err(TreeError::NotFound(_)) => {
                        debug!(path = %entry.path().display(), "Skipping unreachable entry");
                    }
                    Err(e) => return Err(e),
                }
            }
            nodes.sort_by(|a, b| a.name.cmp(&b.name));

            Ok(nodes
                .into_iter()
                .map(|node| Arc::new(node) as NodeRef)
                .collect())
        })
    }
}
