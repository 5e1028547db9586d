//! Remote Tree Source
//!
//! Folder-structured content repository: paginated child listings and binary content URLs.

pub mod alfresco;

pub use alfresco::AlfrescoTreeSource;

use crate::error::ExportError;
use crate::types::{NodeId, IMAGE_MIME_TYPE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Content metadata of a file node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInfo {
    pub mime_type: String,
    pub size_in_bytes: u64,
}

/// A child node as returned by the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeEntry {
    pub id: NodeId,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    pub name: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub is_file: bool,
    #[serde(default)]
    pub content: Option<ContentInfo>,
}

impl NodeEntry {
    /// True for files the export cares about (`image/jpeg`).
    pub fn is_exportable_image(&self) -> bool {
        self.is_file
            && self
                .content
                .as_ref()
                .map(|c| c.mime_type == IMAGE_MIME_TYPE)
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub has_more_items: bool,
    #[serde(default)]
    pub total_items: Option<u64>,
    #[serde(default)]
    pub skip_count: u64,
    #[serde(default)]
    pub max_items: Option<u64>,
}

impl Pagination {
    /// Skip count of the page after this one
    pub fn next_skip_count(&self) -> u64 {
        self.skip_count + self.count
    }
}

/// One page of folder children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChildrenPage {
    pub entries: Vec<NodeEntry>,
    pub pagination: Pagination,
}

/// Remote tree source contract
#[async_trait]
pub trait TreeSource: Send + Sync {
    /// Establish a session used by every later call.
    async fn login(&self) -> Result<(), ExportError>;

    /// List one page of the immediate children of `node_id`.
    async fn list_children(
        &self,
        node_id: &str,
        skip_count: u64,
    ) -> Result<ChildrenPage, ExportError>;

    /// Absolute URL of the binary content of `file_id`.
    fn content_url(&self, file_id: &str) -> String;
}

/// List every child of `node_id`, following `hasMoreItems` across pages.
pub async fn list_all_children(
    source: &dyn TreeSource,
    node_id: &str,
) -> Result<Vec<NodeEntry>, ExportError> {
    let mut entries = Vec::new();
    let mut skip_count = 0;
    loop {
        let page = source.list_children(node_id, skip_count).await?;
        let received = page.entries.len();
        entries.extend(page.entries);
        if !page.pagination.has_more_items || received == 0 {
            break;
        }
        skip_count = page.pagination.next_skip_count().max(skip_count + received as u64);
    }
    Ok(entries)
}
