//! Folder Walker
//!
//! Recursively enumerates a repository subtree. Each folder is published to the shared
//! [`FolderCache`] before it is listed, then its subfolders are walked and its image
//! files mapped concurrently.

pub mod cache;
pub mod paginator;

pub use cache::{FolderCache, FolderNode};
pub use paginator::ProductPaginator;

use crate::content::AssetRecord;
use crate::error::ExportError;
use crate::mapper::{AssetMapper, MapContext};
use crate::repository::{list_all_children, NodeEntry, TreeSource};
use crate::types::FailurePolicy;
use futures::future::{join_all, BoxFuture, FutureExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of one walk
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub assets: Vec<AssetRecord>,
    /// Branches resolved as empty after a failed fetch
    pub absorbed_failures: usize,
    pub folders_seen: usize,
}

/// Recursive walker over one category tree. A walker owns the cache of a single walk.
pub struct FolderWalker {
    source: Arc<dyn TreeSource>,
    mapper: Arc<AssetMapper>,
    policy: FailurePolicy,
    cache: FolderCache,
    absorbed: AtomicUsize,
}

impl FolderWalker {
    pub fn new(
        source: Arc<dyn TreeSource>,
        mapper: Arc<AssetMapper>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            source,
            mapper,
            policy,
            cache: FolderCache::new(),
            absorbed: AtomicUsize::new(0),
        }
    }

    pub fn cache(&self) -> &FolderCache {
        &self.cache
    }

    /// Walk every folder below `root_id`. Files directly under the root are not mapped.
    pub async fn walk(&self, root_id: &str) -> Result<WalkOutcome, ExportError> {
        info!(root_id, "Walking category tree");
        let children = match list_all_children(self.source.as_ref(), root_id).await {
            Ok(children) => children,
            Err(e) => {
                self.absorb(root_id, e)?;
                return Ok(self.outcome(Vec::new()));
            }
        };

        let folders = self.publish_folders(root_id, &children);
        let results = join_all(folders.iter().map(|f| self.walk_folder(f))).await;

        let mut assets = Vec::new();
        for result in results {
            assets.extend(result?);
        }
        let outcome = self.outcome(assets);
        info!(
            root_id,
            assets = outcome.assets.len(),
            folders = outcome.folders_seen,
            absorbed = outcome.absorbed_failures,
            "Category tree walked"
        );
        Ok(outcome)
    }

    fn walk_folder<'a>(
        &'a self,
        folder: &'a FolderNode,
    ) -> BoxFuture<'a, Result<Vec<AssetRecord>, ExportError>> {
        async move {
            let children = match list_all_children(self.source.as_ref(), &folder.id).await {
                Ok(children) => children,
                Err(e) => {
                    self.absorb(&folder.id, e)?;
                    return Ok(Vec::new());
                }
            };
            debug!(folder = %folder.name, children = children.len(), "Listed folder");

            let subfolders = self.publish_folders(&folder.id, &children);
            let files = async {
                children
                    .iter()
                    .filter(|entry| entry.is_exportable_image())
                    .map(|file| {
                        self.mapper.map_file(
                            file,
                            MapContext::CategoryTree {
                                parent: folder,
                                cache: &self.cache,
                            },
                        )
                    })
                    .collect::<Vec<_>>()
            };
            let subtrees = join_all(subfolders.iter().map(|sub| self.walk_folder(sub)));

            let (subtrees, mut assets) = futures::join!(subtrees, files);
            for subtree in subtrees {
                assets.extend(subtree?);
            }
            Ok(assets)
        }
        .boxed()
    }

    /// Record folder children in the cache before anything below them runs.
    fn publish_folders(&self, parent_id: &str, children: &[NodeEntry]) -> Vec<FolderNode> {
        children
            .iter()
            .filter(|entry| entry.is_folder)
            .map(|entry| {
                let folder = FolderNode {
                    id: entry.id.clone(),
                    parent_id: entry
                        .parent_id
                        .clone()
                        .or_else(|| Some(parent_id.to_string())),
                    name: entry.name.clone(),
                };
                if !self.cache.insert(folder.clone()) {
                    debug!(folder_id = %folder.id, "Folder already recorded");
                }
                folder
            })
            .collect()
    }

    fn absorb(&self, node_id: &str, err: ExportError) -> Result<(), ExportError> {
        match self.policy {
            FailurePolicy::Absorb => {
                warn!(node_id, error = %err, "Folder listing failed; treating branch as empty");
                self.absorbed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            FailurePolicy::Propagate => Err(err),
        }
    }

    fn outcome(&self, assets: Vec<AssetRecord>) -> WalkOutcome {
        WalkOutcome {
            assets,
            absorbed_failures: self.absorbed.load(Ordering::SeqCst),
            folders_seen: self.cache.len(),
        }
    }
}
