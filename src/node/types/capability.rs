/*!
 * Node Capabilities
 * Named behavior contracts a node may or may not support
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Dead property mapping (name -> value)
///
/// Ordered so property copies and listings are deterministic.
pub type PropertyMap = BTreeMap<String, String>;

/// Behavior contract a node can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Readable byte content
    File,
    /// Enumerable children, can create files and subcollections
    Collection,
    /// Readable and bulk-writable metadata
    Properties,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::File => write!(f, "file"),
            Capability::Collection => write!(f, "collection"),
            Capability::Properties => write!(f, "properties"),
        }
    }
}

/// Set of capabilities reported by one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub file: bool,
    pub collection: bool,
    pub properties: bool,
}

impl Capabilities {
    #[inline]
    pub fn contains(&self, cap: Capability) -> bool {
        match cap {
            Capability::File => self.file,
            Capability::Collection => self.collection,
            Capability::Properties => self.properties,
        }
    }

    /// Capabilities in a fixed order, for logging
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        [Capability::File, Capability::Collection, Capability::Properties]
            .into_iter()
            .filter(move |cap| self.contains(*cap))
    }
}
