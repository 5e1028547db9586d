//! Category Reconciler
//!
//! Pairs catalog categories with their banner assets and emits one browse page entry per
//! matched category.

use crate::catalog::CategoryRecord;
use crate::content::{AssetRecord, EntryRecord};
use crate::identity::IdentityResolver;
use crate::types::AssetTag;
use std::collections::HashSet;
use tracing::debug;

/// Banner title suffixes accepted for a category, in match order
const BANNER_SUFFIXES: [&str; 2] = ["_CLP_ASpot", "_PLP_ASpot"];

pub fn reconcile(
    assets: &[AssetRecord],
    categories: &[CategoryRecord],
    resolver: &IdentityResolver,
) -> Vec<EntryRecord> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for category in categories {
        if !seen.insert(category.id.as_str()) {
            debug!(category_id = %category.id, "Skipping duplicate category");
            continue;
        }
        let Some(banner) = find_banner(assets, &category.id) else {
            continue;
        };
        entries.push(EntryRecord {
            id: resolver.resolve_browse_page(&category.id),
            category_id: category.id.clone(),
            banner_asset_id: banner.id.clone(),
        });
    }
    entries
}

fn find_banner<'a>(assets: &'a [AssetRecord], category_id: &str) -> Option<&'a AssetRecord> {
    let candidates: Vec<String> = BANNER_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", category_id, suffix))
        .collect();
    assets.iter().find(|asset| {
        asset.description == AssetTag::CategoryBanner && candidates.contains(&asset.title)
    })
}
