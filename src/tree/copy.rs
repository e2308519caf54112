/*!
 * Copy Orchestrator
 * Single-node and recursive subtree copy across node stores
 */

use tracing::{debug, info, instrument, warn};

use super::events::TreeEvent;
use super::paths::{destination_for, split_path};
use super::Tree;
use crate::node::{NodeFuture, NodeRef, TreeError, TreeResult};

impl Tree {
    /// Copy the node at `source` (and its subtree) to `destination`
    ///
    /// Fails fast: the first failure at any depth aborts the walk and nodes
    /// created before it are left in place. Copying to `/` keeps the
    /// source's name.
    #[instrument(skip(self), fields(resolver = %self.resolver.name()))]
    pub async fn copy(&self, source: &str, destination: &str) -> TreeResult<()> {
        let destination = destination_for(source, destination);
        match self.copy_path(source, &destination).await {
            Ok(()) => {
                info!("Copy complete");
                self.emit(TreeEvent::Copied {
                    from: source.to_string(),
                    to: destination,
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Copy failed");
                Err(e)
            }
        }
    }

    /// Copy without logging the outcome or emitting an event
    pub(super) async fn copy_path(&self, source: &str, destination: &str) -> TreeResult<()> {
        self.check_destination(destination)?;
        self.check_not_into_self(source, destination)?;

        let source_node = self.resolver.node_for_path(source).await?;

        let (parent, name) = split_path(destination);
        let parent_node = self.resolver.node_for_path(&parent).await?;

        copy_node(source_node, parent_node, &name).await?;
        Ok(())
    }
}

/// Copy `source` into `destination_parent` under `destination_name`
///
/// An empty `destination_name` keeps the source's own name. Collections are
/// copied child by child in enumeration order, each child keeping its own
/// name; a sibling starts only after the previous one finished. Properties
/// are copied last when both ends support them.
pub fn copy_node<'a>(
    source: NodeRef,
    destination_parent: NodeRef,
    destination_name: &'a str,
) -> NodeFuture<'a, ()> {
    Box::pin(async move {
        let name = if destination_name.is_empty() {
            source.name().to_string()
        } else {
            destination_name.to_string()
        };

        let parent = destination_parent.as_collection().ok_or_else(|| {
            TreeError::NotACollection(format!(
                "cannot create {} under {}",
                name,
                destination_parent.name()
            ))
        })?;

        let destination = if let Some(file) = source.as_file() {
            let data = file.read().await?;
            debug!(name = %name, bytes = data.len(), "Creating file");
            parent.create_file(&name, data).await?;
            parent.child(&name).await?
        } else if let Some(collection) = source.as_collection() {
            debug!(name = %name, "Creating collection");
            parent.create_directory(&name).await?;
            let destination = parent.child(&name).await?;

            for child in collection.children().await? {
                let child_name = child.name().to_string();
                copy_node(child, destination.clone(), &child_name).await?;
            }
            destination
        } else {
            return Err(TreeError::Unsupported(format!(
                "{} has neither file nor collection capability",
                source.name()
            )));
        };

        if let (Some(from), Some(to)) = (source.as_properties(), destination.as_properties()) {
            let props = from.properties().await?;
            debug!(name = %name, count = props.len(), "Copying properties");
            to.update_properties(props).await?;
        }

        Ok(())
    })
}
