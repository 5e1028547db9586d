//! Remote Catalog Source
//!
//! Paginated commerce catalog exposing category listings.

pub mod ordercloud;
pub mod pagination;

pub use ordercloud::OrderCloudCatalogSource;
pub use pagination::fetch_all_categories;

use crate::error::ExportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A catalog category; fields other than `ID` are carried opaquely
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl CategoryRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            other: serde_json::Map::new(),
        }
    }
}

/// Listing metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// One page of categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryPage {
    #[serde(default)]
    pub items: Vec<CategoryRecord>,
    #[serde(default)]
    pub meta: ListMeta,
}

/// Page selection for a category listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub depth: String,
}

/// Remote catalog source contract
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Obtain the bearer token applied to every later call.
    async fn login(&self) -> Result<(), ExportError>;

    async fn list_categories(
        &self,
        catalog_id: &str,
        request: &PageRequest,
    ) -> Result<CategoryPage, ExportError>;
}
