//! Asset Mapper
//!
//! Converts a repository file plus its folder lineage into an [`AssetRecord`] with a
//! stable identifier.

use crate::content::AssetRecord;
use crate::identity::IdentityResolver;
use crate::repository::{NodeEntry, TreeSource};
use crate::types::{AssetTag, NodeId, BANNER_MARKER, CONTENT_URL_PREFIX_LEN, IMAGE_MIME_TYPE};
use crate::walker::{FolderCache, FolderNode};
use std::sync::Arc;

/// Where a file was found, which decides the mapping variant
#[derive(Debug, Clone, Copy)]
pub enum MapContext<'a> {
    /// Inside the category tree, directly under `parent`
    CategoryTree {
        parent: &'a FolderNode,
        cache: &'a FolderCache,
    },
    /// Inside the flat product image folder
    ProductFolder,
}

pub struct AssetMapper {
    source: Arc<dyn TreeSource>,
    resolver: Arc<IdentityResolver>,
    categories_root: NodeId,
}

impl AssetMapper {
    pub fn new(
        source: Arc<dyn TreeSource>,
        resolver: Arc<IdentityResolver>,
        categories_root: impl Into<NodeId>,
    ) -> Self {
        Self {
            source,
            resolver,
            categories_root: categories_root.into(),
        }
    }

    pub fn map_file(&self, file: &NodeEntry, context: MapContext<'_>) -> AssetRecord {
        let (tag, title, file_name) = match context {
            MapContext::CategoryTree { parent, cache } if file.name.contains(BANNER_MARKER) => {
                let title = cache.lineage_name(
                    parent.parent_id.as_deref(),
                    &self.categories_root,
                    file_stem(&file.name),
                );
                (AssetTag::CategoryBanner, title.clone(), title)
            }
            MapContext::CategoryTree { .. } => {
                (AssetTag::CategoryList, file.name.clone(), file.name.clone())
            }
            MapContext::ProductFolder => (
                AssetTag::Product,
                file_stem(&file.name).to_string(),
                file.name.clone(),
            ),
        };

        let (content_type, size_bytes) = file
            .content
            .as_ref()
            .map(|c| (c.mime_type.clone(), c.size_in_bytes))
            .unwrap_or_else(|| (IMAGE_MIME_TYPE.to_string(), 0));

        AssetRecord {
            id: self.resolver.resolve_asset(tag, &title),
            title,
            description: tag,
            file_name,
            content_type,
            size_bytes,
            source_url: strip_source_prefix(&self.source.content_url(&file.id)),
        }
    }
}

/// File name up to its first `.`
pub fn file_stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Drop the first [`CONTENT_URL_PREFIX_LEN`] characters of a content URL.
pub fn strip_source_prefix(url: &str) -> String {
    url.chars().skip(CONTENT_URL_PREFIX_LEN).collect()
}
