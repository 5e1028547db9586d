//! Capped pagination over one flat product folder.

use super::WalkOutcome;
use crate::content::AssetRecord;
use crate::error::ExportError;
use crate::mapper::{AssetMapper, MapContext};
use crate::repository::TreeSource;
use crate::types::FailurePolicy;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ProductPaginator {
    source: Arc<dyn TreeSource>,
    mapper: Arc<AssetMapper>,
    policy: FailurePolicy,
    /// `None` collects the whole folder
    cap: Option<usize>,
}

impl ProductPaginator {
    pub fn new(
        source: Arc<dyn TreeSource>,
        mapper: Arc<AssetMapper>,
        policy: FailurePolicy,
        cap: Option<usize>,
    ) -> Self {
        Self {
            source,
            mapper,
            policy,
            cap,
        }
    }

    /// Page through `folder_id`, mapping product images until the cap is reached or the
    /// folder is exhausted. Images past the cap are never mapped.
    pub async fn collect(&self, folder_id: &str) -> Result<WalkOutcome, ExportError> {
        let mut assets: Vec<AssetRecord> = Vec::new();
        let mut absorbed_failures = 0;
        let mut skip_count = 0;

        loop {
            let page = match self.source.list_children(folder_id, skip_count).await {
                Ok(page) => page,
                Err(e) if self.policy == FailurePolicy::Absorb => {
                    warn!(
                        folder_id,
                        skip_count,
                        error = %e,
                        "Product page failed; keeping {} mapped assets",
                        assets.len()
                    );
                    absorbed_failures += 1;
                    break;
                }
                Err(e) => return Err(e),
            };

            let received = page.entries.len();
            for file in page.entries.iter().filter(|e| e.is_exportable_image()) {
                if self.cap_reached(assets.len()) {
                    break;
                }
                assets.push(self.mapper.map_file(file, MapContext::ProductFolder));
            }

            let total = page
                .pagination
                .total_items
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string());
            info!("Mapped product images {}/{}", assets.len(), total);

            if self.cap_reached(assets.len()) || !page.pagination.has_more_items || received == 0
            {
                break;
            }
            skip_count = page
                .pagination
                .next_skip_count()
                .max(skip_count + received as u64);
            debug!(folder_id, skip_count, "Fetching next product page");
        }

        if let Some(cap) = self.cap {
            assets.truncate(cap);
        }
        Ok(WalkOutcome {
            assets,
            absorbed_failures,
            folders_seen: 1,
        })
    }

    fn cap_reached(&self, mapped: usize) -> bool {
        self.cap.map(|cap| mapped >= cap).unwrap_or(false)
    }
}
