/*!
 * In-Memory Entries
 * Internal representation of files and directories
 */

use bytes::Bytes;
use std::collections::BTreeSet;

use crate::node::PropertyMap;

/// Stored entry; directories keep child names, child paths are derived
#[derive(Debug, Clone)]
pub(super) enum Entry {
    File {
        data: Bytes,
        properties: PropertyMap,
    },
    Directory {
        children: BTreeSet<String>,
        properties: PropertyMap,
    },
}

impl Entry {
    pub fn file(data: Bytes) -> Self {
        Entry::File {
            data,
            properties: PropertyMap::new(),
        }
    }

    pub fn directory() -> Self {
        Entry::Directory {
            children: BTreeSet::new(),
            properties: PropertyMap::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory { .. })
    }

    pub fn properties(&self) -> &PropertyMap {
        match self {
            Entry::File { properties, .. } => properties,
            Entry::Directory { properties, .. } => properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        match self {
            Entry::File { properties, .. } => properties,
            Entry::Directory { properties, .. } => properties,
        }
    }
}
