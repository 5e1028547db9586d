//! Full category listing: first page, then every remaining page at once.

use super::{CatalogSource, CategoryRecord, PageRequest};
use crate::error::ExportError;
use crate::types::{FailurePolicy, CATALOG_PAGE_SIZE};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Fetch every category of `catalog_id` across all result pages.
///
/// Page 1 reveals `TotalPages`; pages 2..=TotalPages are requested together and joined.
/// Items keep page order. Under [`FailurePolicy::Propagate`] any failed page fails the
/// call; under [`FailurePolicy::Absorb`] failed pages are logged and skipped.
pub async fn fetch_all_categories(
    source: &dyn CatalogSource,
    catalog_id: &str,
    depth: &str,
    policy: FailurePolicy,
) -> Result<Vec<CategoryRecord>, ExportError> {
    let request = |page: u32| PageRequest {
        page,
        page_size: CATALOG_PAGE_SIZE,
        depth: depth.to_string(),
    };

    let first = match source.list_categories(catalog_id, &request(1)).await {
        Ok(page) => page,
        Err(e) if policy == FailurePolicy::Absorb => {
            warn!(catalog_id, error = %e, "First category page failed; treating catalog as empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    };

    let total_pages = first.meta.total_pages;
    debug!(catalog_id, total_pages, "Fetched first category page");

    let remaining: Vec<PageRequest> = (2..=total_pages).map(request).collect();
    let results = join_all(
        remaining
            .iter()
            .map(|req| source.list_categories(catalog_id, req)),
    )
    .await;

    let mut items = first.items;
    for (req, result) in remaining.iter().zip(results) {
        match result {
            Ok(page) => items.extend(page.items),
            Err(e) if policy == FailurePolicy::Absorb => {
                warn!(catalog_id, page = req.page, error = %e, "Skipping failed category page");
            }
            Err(e) => return Err(e),
        }
    }

    info!(catalog_id, count = items.len(), total_pages, "Fetched categories");
    Ok(items)
}
