//! Content records
//!
//! Output records of an export and their import-format rendering, plus the prior
//! export snapshot used for identifier reuse.

pub mod format;
pub mod snapshot;

pub use format::{render_document, ExportDocument};
pub use snapshot::PriorExportSnapshot;

use crate::types::AssetTag;
use serde::{Deserialize, Serialize};

/// An exported image asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: String,
    pub title: String,
    pub description: AssetTag,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    /// Protocol-relative content URL
    pub source_url: String,
}

/// A browse page entry linking one category to its banner asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub category_id: String,
    pub banner_asset_id: String,
}
