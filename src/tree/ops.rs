/*!
 * Move, Delete and Enumerate
 */

use tracing::{debug, info, instrument, warn};

use super::events::TreeEvent;
use super::paths::{destination_for, same_parent, split_path};
use super::Tree;
use crate::config::InvalidationPolicy;
use crate::node::{NodeRef, TreeError, TreeResult};

impl Tree {
    /// Move the node at `source` to `destination`
    ///
    /// Within one parent this is a rename. Across parents the subtree is
    /// copied and the original deleted afterwards; the two steps are not
    /// atomic, so a failed delete leaves both paths populated. Moving to `/`
    /// keeps the source's name.
    #[instrument(skip(self), fields(resolver = %self.resolver.name()))]
    pub async fn move_to(&self, source: &str, destination: &str) -> TreeResult<()> {
        let destination = destination_for(source, destination);
        match self.move_path(source, &destination).await {
            Ok(event) => {
                info!("Move complete");
                self.emit(event);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Move failed");
                Err(e)
            }
        }
    }

    async fn move_path(&self, source: &str, destination: &str) -> TreeResult<TreeEvent> {
        let (_, destination_name) = split_path(destination);

        self.check_destination(destination)?;
        self.check_not_into_self(source, destination)?;

        if same_parent(source, destination) {
            debug!(to = %destination_name, "Renaming in place");
            let node = self.resolver.node_for_path(source).await?;
            node.rename(&destination_name).await?;
            return Ok(TreeEvent::Renamed {
                from: source.to_string(),
                to: destination.to_string(),
            });
        }

        debug!("Moving across parents");
        self.copy_path(source, destination).await?;
        let node = self.resolver.node_for_path(source).await?;
        node.delete().await?;

        Ok(TreeEvent::Moved {
            from: source.to_string(),
            to: destination.to_string(),
        })
    }

    /// Delete the node at `path` and invalidate its parent's listing
    #[instrument(skip(self), fields(resolver = %self.resolver.name()))]
    pub async fn delete(&self, path: &str) -> TreeResult<()> {
        let node = match self.resolver.node_for_path(path).await {
            Ok(node) => node,
            Err(e) => {
                warn!(error = %e, "Delete failed");
                return Err(e);
            }
        };
        if let Err(e) = node.delete().await {
            warn!(error = %e, "Delete failed");
            return Err(e);
        }

        let (parent, _) = split_path(path);
        if let Err(e) = self.resolver.mark_dirty(&parent).await {
            match self.invalidation {
                InvalidationPolicy::Tolerant => {
                    warn!(parent = %parent, error = %e, "Parent invalidation failed")
                }
                InvalidationPolicy::Strict => {
                    warn!(parent = %parent, error = %e, "Delete failed");
                    return Err(e);
                }
            }
        }

        info!("Delete complete");
        self.emit(TreeEvent::Deleted {
            path: path.to_string(),
        });
        Ok(())
    }

    /// Enumerate the children of the collection at `path`
    ///
    /// Read-only, so no sandbox check applies.
    pub async fn get_children(&self, path: &str) -> TreeResult<Vec<NodeRef>> {
        let node = self.resolver.node_for_path(path).await?;
        let collection = node
            .as_collection()
            .ok_or_else(|| TreeError::NotACollection(path.to_string()))?;
        let children = collection.children().await?;
        Ok(children)
    }
}
