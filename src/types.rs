//! Core types and compatibility constants shared across the export pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// NodeId: repository identifier of a folder or file
pub type NodeId = String;

/// Characters removed from the front of every repository content URL.
///
/// The repository returns absolute `https:` URLs; the import consumer expects them
/// protocol-relative, so the scheme is stripped.
pub const CONTENT_URL_PREFIX_LEN: usize = 6;

/// Page size used for every catalog category request.
pub const CATALOG_PAGE_SIZE: u32 = 100;

/// Page size used when listing the children of a repository folder.
pub const CHILDREN_PAGE_SIZE: u32 = 100;

/// Default number of product images collected per product export.
pub const DEFAULT_PRODUCT_CAP: usize = 100;

/// Locale key used for every localized field in the import format.
pub const LOCALE: &str = "en-US";

/// Content type id of browse page entries.
pub const BROWSE_PAGE_CONTENT_TYPE: &str = "browsePage";

/// Marker substring identifying category banner images.
pub const BANNER_MARKER: &str = "ASpot";

/// Folder name that contributes nothing to a banner's lineage title.
pub const MEDIA_FOLDER_NAME: &str = "Media";

/// Only files with this MIME type are exported.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Semantic label of an exported asset, also used as a reconciliation key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetTag {
    #[serde(rename = "category-banner-img")]
    CategoryBanner,
    #[serde(rename = "category-list-img")]
    CategoryList,
    #[serde(rename = "product-img")]
    Product,
}

impl AssetTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetTag::CategoryBanner => "category-banner-img",
            AssetTag::CategoryList => "category-list-img",
            AssetTag::Product => "product-img",
        }
    }
}

impl fmt::Display for AssetTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a call site does when a remote fetch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and treat the result as empty
    Absorb,
    /// Fail the whole call
    Propagate,
}

/// Export kind, one per trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Categories,
    Products,
}

impl ExportKind {
    /// File name of the generated document inside the output directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::Categories => "categories.json",
            ExportKind::Products => "products.json",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Categories => f.write_str("categories"),
            ExportKind::Products => f.write_str("products"),
        }
    }
}
