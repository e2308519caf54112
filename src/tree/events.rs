/*!
 * Tree Change Events
 * Notifications for completed mutating operations
 */

use tokio::sync::broadcast;

/// Completed tree mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEvent {
    /// Subtree copied to a new location
    Copied { from: String, to: String },

    /// Node renamed within its parent
    Renamed { from: String, to: String },

    /// Subtree copied across parents and the original deleted
    Moved { from: String, to: String },

    /// Node deleted
    Deleted { path: String },
}

impl TreeEvent {
    /// Path that now holds the result of the operation
    pub fn path(&self) -> &str {
        match self {
            TreeEvent::Copied { to, .. } => to,
            TreeEvent::Renamed { to, .. } => to,
            TreeEvent::Moved { to, .. } => to,
            TreeEvent::Deleted { path } => path,
        }
    }
}

/// Fan-out of tree events to any number of listeners
///
/// Receivers that fall more than `capacity` events behind lose the oldest
/// ones. Clones share one channel.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<TreeEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TreeEvent> {
        self.sender.subscribe()
    }

    /// Deliver `event`, returning how many listeners received it
    pub fn emit(&self, event: TreeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(1024)
    }
}
