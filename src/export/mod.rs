//! Export Orchestrator
//!
//! Runs one export end to end: snapshot, walk (and catalog fetch for categories),
//! reconciliation, rendering and the atomic write of the output document.

pub mod output;
pub mod producer;

pub use producer::{CommandSnapshotProducer, SnapshotProducer};

use crate::catalog::{fetch_all_categories, CatalogSource, OrderCloudCatalogSource};
use crate::concurrency::ExportGate;
use crate::config::ExportConfig;
use crate::content::{render_document, AssetRecord, EntryRecord, PriorExportSnapshot};
use crate::error::ExportError;
use crate::identity::IdentityResolver;
use crate::mapper::AssetMapper;
use crate::reconcile::reconcile;
use crate::repository::{AlfrescoTreeSource, TreeSource};
use crate::types::{ExportKind, FailurePolicy};
use crate::walker::{FolderWalker, ProductPaginator};
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub kind: ExportKind,
    pub output_path: PathBuf,
    pub asset_count: usize,
    pub entry_count: usize,
    /// Remote fetches that failed and were treated as empty
    pub absorbed_failures: usize,
    /// No snapshot was usable; every identifier was minted fresh
    pub fresh_identities: bool,
    pub duration_ms: u64,
    /// RFC 3339 completion time
    pub finished_at: String,
    #[serde(skip)]
    pub body: String,
}

impl ExportReport {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Exported {}: {} assets, {} entries -> {}",
            self.kind,
            self.asset_count,
            self.entry_count,
            self.output_path.display()
        );
        if self.absorbed_failures > 0 {
            summary.push_str(&format!(
                "\nWarning: {} remote fetches failed and were skipped",
                self.absorbed_failures
            ));
        }
        if self.fresh_identities {
            summary.push_str("\nWarning: no snapshot was available; all identifiers are new");
        }
        summary
    }
}

struct Collected {
    entries: Option<Vec<EntryRecord>>,
    assets: Vec<AssetRecord>,
    absorbed_failures: usize,
}

pub struct ExportService {
    config: ExportConfig,
    tree: Arc<dyn TreeSource>,
    catalog: Arc<dyn CatalogSource>,
    producer: Arc<dyn SnapshotProducer>,
    gate: ExportGate,
}

impl ExportService {
    pub fn new(
        config: ExportConfig,
        tree: Arc<dyn TreeSource>,
        catalog: Arc<dyn CatalogSource>,
        producer: Arc<dyn SnapshotProducer>,
    ) -> Self {
        Self {
            config,
            tree,
            catalog,
            producer,
            gate: ExportGate::new(),
        }
    }

    /// Build the service against the configured remote sources.
    pub fn from_config(config: ExportConfig) -> Result<Self, ExportError> {
        config.validate().map_err(ExportError::ConfigError)?;
        let tree = Arc::new(AlfrescoTreeSource::new(&config.repository)?);
        let catalog = Arc::new(OrderCloudCatalogSource::new(&config.catalog)?);
        let producer = Arc::new(CommandSnapshotProducer::from_config(&config.snapshot));
        Ok(Self::new(config, tree, catalog, producer))
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    /// Log in to both sources. Any failure blocks every later run.
    pub async fn bootstrap(&self) -> Result<(), ExportError> {
        let (tree, catalog) = tokio::join!(self.tree.login(), self.catalog.login());
        let failure = match (tree, catalog) {
            (Ok(()), Ok(())) => {
                info!("Authenticated with repository and catalog");
                return Ok(());
            }
            (Err(e), _) => format!("repository login failed: {}", e),
            (_, Err(e)) => format!("catalog login failed: {}", e),
        };
        error!(reason = %failure, "Startup authentication failed; exports are blocked");
        self.gate.block(failure.clone());
        Err(ExportError::AuthenticationFailure(failure))
    }

    /// Run one export of `kind` under the overall deadline.
    pub async fn run(&self, kind: ExportKind) -> Result<ExportReport, ExportError> {
        let _permit = self.gate.enter()?;
        let started = Instant::now();
        let timeout_secs = self.config.limits.run_timeout_secs;
        info!(kind = %kind, "Export started");

        let result = match tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            self.run_pipeline(kind, started),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExportError::Timeout(timeout_secs)),
        };

        match &result {
            Ok(report) => info!(
                kind = %kind,
                assets = report.asset_count,
                entries = report.entry_count,
                absorbed = report.absorbed_failures,
                fresh_identities = report.fresh_identities,
                duration_ms = report.duration_ms,
                "Export finished"
            ),
            Err(e) => error!(kind = %kind, error = %e, "Export failed; output left unchanged"),
        }
        result
    }

    async fn run_pipeline(
        &self,
        kind: ExportKind,
        started: Instant,
    ) -> Result<ExportReport, ExportError> {
        let resolver = Arc::new(self.load_resolver().await?);
        let mapper = Arc::new(AssetMapper::new(
            self.tree.clone(),
            resolver.clone(),
            self.config.repository.categories_node.clone(),
        ));

        let collected = match kind {
            ExportKind::Categories => self.collect_categories(mapper, &resolver).await?,
            ExportKind::Products => self.collect_products(mapper).await?,
        };

        let body = render_document(collected.entries.as_deref(), &collected.assets)?;
        let output_path =
            output::write_atomic(&self.config.output.dir, kind.file_name(), &body).await?;

        Ok(ExportReport {
            kind,
            output_path,
            asset_count: collected.assets.len(),
            entry_count: collected.entries.as_ref().map(Vec::len).unwrap_or(0),
            absorbed_failures: collected.absorbed_failures,
            fresh_identities: resolver.is_fresh_only(),
            duration_ms: started.elapsed().as_millis() as u64,
            finished_at: Utc::now().to_rfc3339(),
            body,
        })
    }

    async fn load_resolver(&self) -> Result<IdentityResolver, ExportError> {
        let loaded = match self.producer.produce().await {
            Ok(path) => PriorExportSnapshot::load(&path).await,
            Err(e) => Err(e),
        };
        match loaded {
            Ok(snapshot) => {
                info!(
                    assets = snapshot.asset_count(),
                    entries = snapshot.entry_count(),
                    "Loaded export snapshot"
                );
                Ok(IdentityResolver::new(snapshot))
            }
            Err(e) if self.config.snapshot.on_failure == FailurePolicy::Absorb => {
                Ok(IdentityResolver::fresh(&e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn collect_categories(
        &self,
        mapper: Arc<AssetMapper>,
        resolver: &IdentityResolver,
    ) -> Result<Collected, ExportError> {
        let repository = &self.config.repository;
        let catalog = &self.config.catalog;
        let walker = FolderWalker::new(self.tree.clone(), mapper, repository.failure_policy);

        let (walked, categories) = tokio::try_join!(
            walker.walk(&repository.categories_node),
            fetch_all_categories(
                self.catalog.as_ref(),
                &catalog.catalog_id,
                &catalog.depth,
                catalog.failure_policy,
            ),
        )?;

        let mut assets = walked.assets;
        if let Some(cap) = self.config.limits.category_asset_cap {
            if assets.len() > cap {
                info!(walked = assets.len(), cap, "Capping category assets");
                assets.truncate(cap);
            }
        }

        let entries = reconcile(&assets, &categories, resolver);
        info!(
            categories = categories.len(),
            entries = entries.len(),
            "Reconciled categories with banners"
        );
        Ok(Collected {
            entries: Some(entries),
            assets,
            absorbed_failures: walked.absorbed_failures,
        })
    }

    async fn collect_products(&self, mapper: Arc<AssetMapper>) -> Result<Collected, ExportError> {
        let repository = &self.config.repository;
        let paginator = ProductPaginator::new(
            self.tree.clone(),
            mapper,
            repository.failure_policy,
            self.config.limits.product_cap,
        );
        let collected = paginator.collect(&repository.products_node).await?;
        Ok(Collected {
            entries: None,
            assets: collected.assets,
            absorbed_failures: collected.absorbed_failures,
        })
    }
}
