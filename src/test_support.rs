//! In-memory sources shared by unit tests.

use crate::catalog::{CatalogSource, CategoryPage, CategoryRecord, ListMeta, PageRequest};
use crate::error::ExportError;
use crate::repository::{ChildrenPage, ContentInfo, NodeEntry, Pagination, TreeSource};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Repository tree held in memory, listed in insertion order
pub struct MemoryTree {
    nodes: Mutex<Vec<NodeEntry>>,
    failing: Mutex<HashSet<String>>,
    page_size: usize,
    pub listings: AtomicUsize,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::with_page_size(100)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            nodes: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            page_size,
            listings: AtomicUsize::new(0),
        }
    }

    pub fn folder(&self, id: &str, parent: &str, name: &str) {
        self.push(NodeEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            name: name.to_string(),
            is_folder: true,
            is_file: false,
            content: None,
        });
    }

    pub fn jpeg(&self, id: &str, parent: &str, name: &str) {
        self.file(id, parent, name, "image/jpeg");
    }

    pub fn file(&self, id: &str, parent: &str, name: &str, mime_type: &str) {
        self.push(NodeEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            name: name.to_string(),
            is_folder: false,
            is_file: true,
            content: Some(ContentInfo {
                mime_type: mime_type.to_string(),
                size_in_bytes: 1024,
            }),
        });
    }

    /// Make every listing of `node_id` fail.
    pub fn fail_on(&self, node_id: &str) {
        self.failing.lock().insert(node_id.to_string());
    }

    fn push(&self, entry: NodeEntry) {
        self.nodes.lock().push(entry);
    }
}

#[async_trait]
impl TreeSource for MemoryTree {
    async fn login(&self) -> Result<(), ExportError> {
        Ok(())
    }

    async fn list_children(
        &self,
        node_id: &str,
        skip_count: u64,
    ) -> Result<ChildrenPage, ExportError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().contains(node_id) {
            return Err(ExportError::RemoteFetchFailure(format!(
                "listing {} refused",
                node_id
            )));
        }
        let children: Vec<NodeEntry> = self
            .nodes
            .lock()
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(node_id))
            .cloned()
            .collect();
        let total = children.len();
        let start = (skip_count as usize).min(total);
        let entries: Vec<NodeEntry> = children
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        let count = entries.len() as u64;
        Ok(ChildrenPage {
            pagination: Pagination {
                count,
                has_more_items: start + entries.len() < total,
                total_items: Some(total as u64),
                skip_count,
                max_items: Some(self.page_size as u64),
            },
            entries,
        })
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("https://content.example.com/nodes/{}/content", file_id)
    }
}

/// Catalog held in memory, served in fixed-size pages
pub struct MemoryCatalog {
    categories: Vec<CategoryRecord>,
    page_size: usize,
}

impl MemoryCatalog {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            categories: ids.iter().map(|id| CategoryRecord::new(*id)).collect(),
            page_size: 100,
        }
    }
}

#[async_trait]
impl CatalogSource for MemoryCatalog {
    async fn login(&self) -> Result<(), ExportError> {
        Ok(())
    }

    async fn list_categories(
        &self,
        _catalog_id: &str,
        request: &PageRequest,
    ) -> Result<CategoryPage, ExportError> {
        let total = self.categories.len();
        let total_pages = total.div_ceil(self.page_size) as u32;
        let start = (request.page.saturating_sub(1) as usize) * self.page_size;
        Ok(CategoryPage {
            items: self
                .categories
                .iter()
                .skip(start)
                .take(self.page_size)
                .cloned()
                .collect(),
            meta: ListMeta {
                page: request.page,
                page_size: self.page_size as u32,
                total_count: total as u64,
                total_pages,
            },
        })
    }
}
