//! Fakes for driving the export service without a network.

use async_trait::async_trait;
use catalog_export::catalog::{CatalogSource, CategoryPage, CategoryRecord, ListMeta, PageRequest};
use catalog_export::config::ExportConfig;
use catalog_export::error::ExportError;
use catalog_export::export::{ExportService, SnapshotProducer};
use catalog_export::repository::{ChildrenPage, ContentInfo, NodeEntry, Pagination, TreeSource};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

pub const CATEGORIES_ROOT: &str = "categories-root";
pub const PRODUCTS_ROOT: &str = "products-root";

#[derive(Default)]
pub struct FakeTree {
    nodes: Mutex<Vec<NodeEntry>>,
    failing: Mutex<HashSet<String>>,
    pub reject_login: AtomicBool,
}

impl FakeTree {
    pub fn folder(&self, id: &str, parent: &str, name: &str) -> &Self {
        self.nodes.lock().push(NodeEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            name: name.to_string(),
            is_folder: true,
            is_file: false,
            content: None,
        });
        self
    }

    pub fn jpeg(&self, id: &str, parent: &str, name: &str) -> &Self {
        self.nodes.lock().push(NodeEntry {
            id: id.to_string(),
            parent_id: Some(parent.to_string()),
            name: name.to_string(),
            is_folder: false,
            is_file: true,
            content: Some(ContentInfo {
                mime_type: "image/jpeg".to_string(),
                size_in_bytes: 4096,
            }),
        });
        self
    }

    pub fn fail_on(&self, node_id: &str) {
        self.failing.lock().insert(node_id.to_string());
    }
}

#[async_trait]
impl TreeSource for FakeTree {
    async fn login(&self) -> Result<(), ExportError> {
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(ExportError::AuthenticationFailure("401 Unauthorized".to_string()));
        }
        Ok(())
    }

    async fn list_children(
        &self,
        node_id: &str,
        skip_count: u64,
    ) -> Result<ChildrenPage, ExportError> {
        if self.failing.lock().contains(node_id) {
            return Err(ExportError::RemoteFetchFailure(format!("{} unavailable", node_id)));
        }
        // Two children per page so every listing exercises pagination.
        let children: Vec<NodeEntry> = self
            .nodes
            .lock()
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(node_id))
            .cloned()
            .collect();
        let entries: Vec<NodeEntry> = children
            .iter()
            .skip(skip_count as usize)
            .take(2)
            .cloned()
            .collect();
        Ok(ChildrenPage {
            pagination: Pagination {
                count: entries.len() as u64,
                has_more_items: skip_count as usize + entries.len() < children.len(),
                total_items: Some(children.len() as u64),
                skip_count,
                max_items: Some(2),
            },
            entries,
        })
    }

    fn content_url(&self, file_id: &str) -> String {
        format!("https://content.example.com/nodes/{}/content?alf_ticket=T", file_id)
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    ids: Mutex<Vec<String>>,
    pub unavailable: AtomicBool,
    pub reject_login: AtomicBool,
}

impl FakeCatalog {
    pub fn with_categories(ids: &[&str]) -> Self {
        let catalog = Self::default();
        *catalog.ids.lock() = ids.iter().map(|id| id.to_string()).collect();
        catalog
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn login(&self) -> Result<(), ExportError> {
        if self.reject_login.load(Ordering::SeqCst) {
            return Err(ExportError::AuthenticationFailure("invalid_client".to_string()));
        }
        Ok(())
    }

    async fn list_categories(
        &self,
        _catalog_id: &str,
        request: &PageRequest,
    ) -> Result<CategoryPage, ExportError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ExportError::RemoteFetchFailure("503 Service Unavailable".to_string()));
        }
        let ids = self.ids.lock().clone();
        let size = request.page_size as usize;
        let start = (request.page as usize - 1) * size;
        Ok(CategoryPage {
            items: ids
                .iter()
                .skip(start)
                .take(size)
                .map(|id| CategoryRecord::new(id.clone()))
                .collect(),
            meta: ListMeta {
                page: request.page,
                page_size: request.page_size,
                total_count: ids.len() as u64,
                total_pages: ids.len().div_ceil(size) as u32,
            },
        })
    }
}

/// Producer that "exports" by pointing at an existing file
pub struct FileProducer {
    path: Mutex<PathBuf>,
    pub calls: AtomicUsize,
    /// When set, each call waits for a notification before returning
    hold: Option<Arc<Notify>>,
    delay: Option<Duration>,
}

impl FileProducer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Mutex::new(path.into()),
            calls: AtomicUsize::new(0),
            hold: None,
            delay: None,
        }
    }

    pub fn held(path: impl Into<PathBuf>, release: Arc<Notify>) -> Self {
        Self {
            hold: Some(release),
            ..Self::new(path)
        }
    }

    pub fn delayed(path: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::new(path)
        }
    }

    pub fn point_at(&self, path: impl Into<PathBuf>) {
        *self.path.lock() = path.into();
    }
}

#[async_trait]
impl SnapshotProducer for FileProducer {
    async fn produce(&self) -> Result<PathBuf, ExportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(release) = &self.hold {
            release.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let path = self.path.lock().clone();
        Ok(path)
    }
}

pub fn config(dir: &Path) -> ExportConfig {
    let mut config = ExportConfig::default();
    config.repository.host = "https://content.example.com".to_string();
    config.repository.username = "admin".to_string();
    config.repository.password = "admin".to_string();
    config.repository.categories_node = CATEGORIES_ROOT.to_string();
    config.repository.products_node = PRODUCTS_ROOT.to_string();
    config.catalog.catalog_id = "Garden".to_string();
    config.catalog.client_id = "client".to_string();
    config.catalog.client_secret = "secret".to_string();
    config.output.dir = dir.join("exports");
    config
}

/// Write an empty snapshot and return its path.
pub fn empty_snapshot(dir: &Path) -> PathBuf {
    let path = dir.join("contentful.json");
    std::fs::write(&path, r#"{"entries": [], "assets": []}"#).unwrap();
    path
}

/// Garden tree with banners at two depths, a list image and a product folder.
pub fn garden_tree() -> FakeTree {
    let tree = FakeTree::default();
    tree.folder("plants", CATEGORIES_ROOT, "Plants")
        .folder("trees", "plants", "Trees")
        .folder("trees-media", "trees", "Media")
        .jpeg("trees-banner", "trees-media", "X_CLP_ASpot.jpg")
        .jpeg("trees-thumb", "trees", "Trees.jpg")
        .folder("gifts", CATEGORIES_ROOT, "Gifts")
        .folder("gifts-media", "gifts", "Media")
        .jpeg("gifts-banner", "gifts-media", "Promo_PLP_ASpot.jpg")
        .jpeg("stray", CATEGORIES_ROOT, "stray.jpg");
    for i in 0..5 {
        tree.jpeg(&format!("sku-{}", i), PRODUCTS_ROOT, &format!("SKU12{}.jpg", i));
    }
    tree
}

pub fn service(
    config: ExportConfig,
    tree: Arc<FakeTree>,
    catalog: Arc<FakeCatalog>,
    producer: Arc<FileProducer>,
) -> ExportService {
    ExportService::new(config, tree, catalog, producer)
}
