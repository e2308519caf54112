/*!
 * Tree Builder
 */

use std::sync::Arc;

use super::events::EventBroadcaster;
use super::sandbox::Sandbox;
use super::Tree;
use crate::config::{InvalidationPolicy, TreeConfig};
use crate::node::NodeResolver;

/// Builder for `Tree`
pub struct TreeBuilder {
    resolver: Arc<dyn NodeResolver>,
    sandbox: Option<Sandbox>,
    invalidation: InvalidationPolicy,
    events: Option<EventBroadcaster>,
}

impl TreeBuilder {
    pub fn new(resolver: Arc<dyn NodeResolver>) -> Self {
        Self {
            resolver,
            sandbox: None,
            invalidation: InvalidationPolicy::default(),
            events: None,
        }
    }

    /// Confine destinations to the subtree at `path`
    pub fn sandbox(mut self, path: impl Into<String>) -> Self {
        self.sandbox = Some(Sandbox::new(path));
        self
    }

    /// Set what `delete` does when parent invalidation fails
    pub fn invalidation(mut self, policy: InvalidationPolicy) -> Self {
        self.invalidation = policy;
        self
    }

    /// Apply sandbox and invalidation settings from `config`
    ///
    /// The event capacity is left to the caller, who decides whether to
    /// attach a channel at all.
    pub fn with_config(mut self, config: &TreeConfig) -> Self {
        if let Some(ref sandbox) = config.sandbox {
            self = self.sandbox(sandbox.to_string_lossy());
        }
        self.invalidation(config.invalidation)
    }

    /// Attach a broadcaster for change events
    pub fn events(mut self, events: EventBroadcaster) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Tree {
        Tree {
            resolver: self.resolver,
            sandbox: self.sandbox,
            invalidation: self.invalidation,
            events: self.events,
        }
    }
}
