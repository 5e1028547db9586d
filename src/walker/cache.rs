//! Folder Cache
//!
//! Append-only arena of folders discovered during one walk, keyed by node id. Used to
//! resolve ancestor names for banner assets.

use crate::types::{NodeId, MEDIA_FOLDER_NAME};
use parking_lot::RwLock;
use std::collections::HashMap;

/// A folder seen during the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub name: String,
}

/// Write-once folder arena shared across concurrent branches of a walk
#[derive(Debug, Default)]
pub struct FolderCache {
    folders: RwLock<HashMap<NodeId, FolderNode>>,
}

impl FolderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a folder. Returns false if the node was already recorded; the first
    /// record is kept.
    pub fn insert(&self, folder: FolderNode) -> bool {
        let mut folders = self.folders.write();
        if folders.contains_key(&folder.id) {
            return false;
        }
        folders.insert(folder.id.clone(), folder);
        true
    }

    pub fn get(&self, id: &str) -> Option<FolderNode> {
        self.folders.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.folders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prefix `name` with the names of its ancestors, starting at `start_id` and walking
    /// up until `stop_id` or an unknown node is reached.
    ///
    /// Each ancestor contributes `"{name}_"`, except `Media` folders which contribute
    /// nothing.
    pub fn lineage_name(&self, start_id: Option<&str>, stop_id: &str, name: &str) -> String {
        let folders = self.folders.read();
        let mut accumulated = name.to_string();
        let mut current = start_id.map(str::to_string);
        // Parent links form a tree, so no chain is longer than the arena.
        let mut remaining = folders.len();

        while let Some(id) = current {
            if id == stop_id || remaining == 0 {
                break;
            }
            let Some(folder) = folders.get(&id) else {
                break;
            };
            if folder.name != MEDIA_FOLDER_NAME {
                accumulated = format!("{}_{}", folder.name, accumulated);
            }
            current = folder.parent_id.clone();
            remaining -= 1;
        }
        accumulated
    }
}
