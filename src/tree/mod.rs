/*!
 * Virtual Tree
 * Sandboxed copy, move, delete and enumeration over a pluggable node store
 */

mod builder;
mod copy;
pub mod events;
mod ops;
pub mod paths;
pub mod sandbox;

use std::sync::Arc;

use crate::config::{InvalidationPolicy, TreeConfig};
use crate::node::{NodeResolver, TreeError, TreeResult};

// Re-exports
pub use builder::TreeBuilder;
pub use copy::copy_node;
pub use events::{EventBroadcaster, TreeEvent};
pub use paths::split_path;
pub use sandbox::Sandbox;

/// Tree orchestrator
///
/// Holds no node state of its own: every operation resolves the nodes it
/// needs through the resolver and drops them when it completes. The sandbox
/// is fixed for the lifetime of the tree.
#[derive(Clone)]
pub struct Tree {
    resolver: Arc<dyn NodeResolver>,
    sandbox: Option<Sandbox>,
    invalidation: InvalidationPolicy,
    events: Option<EventBroadcaster>,
}

impl Tree {
    /// Create an unrestricted tree over `resolver`
    pub fn new(resolver: Arc<dyn NodeResolver>) -> Self {
        Self::builder(resolver).build()
    }

    pub fn builder(resolver: Arc<dyn NodeResolver>) -> TreeBuilder {
        TreeBuilder::new(resolver)
    }

    /// Create a tree from loaded settings
    ///
    /// No event channel is attached; use the builder for that.
    pub fn from_config(resolver: Arc<dyn NodeResolver>, config: &TreeConfig) -> Self {
        Self::builder(resolver).with_config(config).build()
    }

    pub fn resolver(&self) -> &Arc<dyn NodeResolver> {
        &self.resolver
    }

    pub fn sandbox(&self) -> Option<&Sandbox> {
        self.sandbox.as_ref()
    }

    pub fn invalidation(&self) -> InvalidationPolicy {
        self.invalidation
    }

    /// Subscribe to change events, if a broadcaster is attached
    pub fn subscribe(&self) -> Option<tokio::sync::broadcast::Receiver<TreeEvent>> {
        self.events.as_ref().map(|events| events.subscribe())
    }

    /// Remove the sandbox prefix from `path` for client-facing output
    pub fn strip_sandbox<'a>(&self, path: &'a str) -> &'a str {
        match self.sandbox {
            Some(ref sandbox) => sandbox.strip(path),
            None => path,
        }
    }

    /// True when no sandbox is configured or `path` lies inside it
    pub fn inside_sandbox(&self, path: &str) -> bool {
        match self.sandbox {
            Some(ref sandbox) => sandbox.contains(path),
            None => true,
        }
    }

    /// Reject a destination outside the sandbox
    ///
    /// Only destinations are checked: the sandbox constrains where writes
    /// land, not where reads originate.
    fn check_destination(&self, destination: &str) -> TreeResult<()> {
        if self.inside_sandbox(destination) {
            Ok(())
        } else {
            Err(TreeError::Forbidden(format!(
                "destination outside sandbox: {}",
                self.strip_sandbox(destination)
            )))
        }
    }

    /// Reject a destination that is the source or lies inside it
    fn check_not_into_self(&self, source: &str, destination: &str) -> TreeResult<()> {
        if paths::is_same_or_descendant(destination, source) {
            Err(TreeError::InvalidDestination(format!(
                "{} is inside {}",
                self.strip_sandbox(destination),
                self.strip_sandbox(source)
            )))
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: TreeEvent) {
        if let Some(ref events) = self.events {
            events.emit(event);
        }
    }
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("resolver", &self.resolver.name())
            .field("sandbox", &self.sandbox)
            .field("invalidation", &self.invalidation)
            .field("events", &self.events.is_some())
            .finish()
    }
}
