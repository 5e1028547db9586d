//! Prior Export Snapshot
//!
//! The previous space export, indexed once for identifier lookups. Records missing the
//! fields a lookup needs are ignored rather than rejected.

use crate::error::ExportError;
use crate::types::LOCALE;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    assets: Vec<SnapshotItem>,
    #[serde(default)]
    entries: Vec<SnapshotItem>,
}

#[derive(Debug, Deserialize)]
struct SnapshotItem {
    sys: ItemSys,
    #[serde(default)]
    fields: HashMap<String, HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemSys {
    id: String,
    #[serde(default)]
    content_type: Option<ContentTypeLink>,
}

#[derive(Debug, Deserialize)]
struct ContentTypeLink {
    sys: LinkSys,
}

#[derive(Debug, Deserialize)]
struct LinkSys {
    id: String,
}

impl SnapshotItem {
    fn localized(&self, field: &str) -> Option<&str> {
        self.fields.get(field)?.get(LOCALE)?.as_str()
    }
}

/// Immutable lookup index over the previous export
#[derive(Debug, Clone, Default)]
pub struct PriorExportSnapshot {
    /// (description, title) -> asset ids in snapshot order
    assets: HashMap<(String, String), Vec<String>>,
    /// (content type id, categoryId) -> entry ids in snapshot order
    entries: HashMap<(String, String), Vec<String>>,
}

impl PriorExportSnapshot {
    /// Snapshot with no records; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let file: SnapshotFile = serde_json::from_str(json)
            .map_err(|e| ExportError::SnapshotFailure(format!("Failed to parse snapshot: {}", e)))?;

        let mut snapshot = Self::default();
        for asset in &file.assets {
            let (Some(description), Some(title)) =
                (asset.localized("description"), asset.localized("title"))
            else {
                continue;
            };
            snapshot
                .assets
                .entry((description.to_string(), title.to_string()))
                .or_default()
                .push(asset.sys.id.clone());
        }
        for entry in &file.entries {
            let Some(content_type) = entry.sys.content_type.as_ref() else {
                continue;
            };
            let Some(category_id) = entry.localized("categoryId") else {
                continue;
            };
            snapshot
                .entries
                .entry((content_type.sys.id.clone(), category_id.to_string()))
                .or_default()
                .push(entry.sys.id.clone());
        }
        Ok(snapshot)
    }

    pub async fn load(path: &Path) -> Result<Self, ExportError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            ExportError::SnapshotFailure(format!(
                "Failed to read snapshot {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&json)
    }

    /// Ids of every asset with this description and title, in snapshot order.
    pub fn find_assets(&self, description: &str, title: &str) -> &[String] {
        self.assets
            .get(&(description.to_string(), title.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Ids of every entry with this content type and category, in snapshot order.
    pub fn find_entries(&self, content_type: &str, category_id: &str) -> &[String] {
        self.entries
            .get(&(content_type.to_string(), category_id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn asset_count(&self) -> usize {
        self.assets.values().map(Vec::len).sum()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
