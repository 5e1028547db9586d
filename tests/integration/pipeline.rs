use crate::integration::support::{
    config, empty_snapshot, garden_tree, service, FakeCatalog, FakeTree, FileProducer,
    CATEGORIES_ROOT,
};
use catalog_export::error::ExportError;
use catalog_export::types::{ExportKind, FailurePolicy};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

const CATEGORIES: [&str; 3] = ["Plants_Trees_X", "Gifts_Promo", "Seeds"];

fn ids_by(document: &Value, section: &str, key: &str) -> HashMap<String, String> {
    document[section]
        .as_array()
        .map(|records| records.as_slice())
        .unwrap_or(&[])
        .iter()
        .map(|record| {
            (
                record["fields"][key]["en-US"].as_str().unwrap().to_string(),
                record["sys"]["id"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn category_export_names_banners_by_ancestry_and_links_entries() {
    let temp = tempfile::tempdir().unwrap();
    let export = service(
        config(temp.path()),
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::with_categories(&CATEGORIES)),
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );

    let report = export.run(ExportKind::Categories).await.unwrap();
    assert_eq!(report.asset_count, 3);
    assert_eq!(report.entry_count, 2);

    let document: Value = serde_json::from_str(&report.body).unwrap();
    let assets = ids_by(&document, "assets", "title");
    assert!(assets.contains_key("Plants_Trees_X_CLP_ASpot"));
    assert!(assets.contains_key("Gifts_Promo_PLP_ASpot"));
    assert!(assets.contains_key("Trees.jpg"));
    assert!(!assets.contains_key("stray.jpg"));

    let entries = document["entries"].as_array().unwrap();
    let linked: HashMap<&str, &str> = entries
        .iter()
        .map(|e| {
            (
                e["fields"]["categoryId"]["en-US"].as_str().unwrap(),
                e["fields"]["bannerImage"]["en-US"]["sys"]["id"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(linked["Plants_Trees_X"], assets["Plants_Trees_X_CLP_ASpot"]);
    assert_eq!(linked["Gifts_Promo"], assets["Gifts_Promo_PLP_ASpot"]);
    assert!(!linked.contains_key("Seeds"));

    let banner = document["assets"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["fields"]["title"]["en-US"] == "Plants_Trees_X_CLP_ASpot")
        .unwrap();
    assert_eq!(
        banner["fields"]["file"]["en-US"]["url"],
        "//content.example.com/nodes/trees-banner/content?alf_ticket=T"
    );
    assert_eq!(banner["fields"]["description"]["en-US"], "category-banner-img");
}

#[tokio::test]
async fn rerun_against_previous_output_reuses_every_id() {
    let temp = tempfile::tempdir().unwrap();
    let producer = Arc::new(FileProducer::new(empty_snapshot(temp.path())));
    let export = service(
        config(temp.path()),
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::with_categories(&CATEGORIES)),
        producer.clone(),
    );

    let first = export.run(ExportKind::Categories).await.unwrap();
    let first_doc: Value = serde_json::from_str(&first.body).unwrap();

    // The previous output is itself a valid snapshot.
    let previous = temp.path().join("previous.json");
    std::fs::copy(&first.output_path, &previous).unwrap();
    producer.point_at(&previous);

    let second = export.run(ExportKind::Categories).await.unwrap();
    let second_doc: Value = serde_json::from_str(&second.body).unwrap();

    assert_eq!(
        ids_by(&first_doc, "assets", "title"),
        ids_by(&second_doc, "assets", "title")
    );
    assert_eq!(
        ids_by(&first_doc, "entries", "categoryId"),
        ids_by(&second_doc, "entries", "categoryId")
    );
}

#[tokio::test]
async fn same_named_list_images_keep_their_ids_across_runs() {
    let temp = tempfile::tempdir().unwrap();
    let tree = FakeTree::default();
    tree.folder("trees", CATEGORIES_ROOT, "Trees")
        .jpeg("trees-thumb", "trees", "Thumb.jpg")
        .folder("shrubs", CATEGORIES_ROOT, "Shrubs")
        .jpeg("shrubs-thumb", "shrubs", "Thumb.jpg");
    let producer = Arc::new(FileProducer::new(empty_snapshot(temp.path())));
    let export = service(
        config(temp.path()),
        Arc::new(tree),
        Arc::new(FakeCatalog::default()),
        producer.clone(),
    );

    let thumb_ids = |body: &str| -> Vec<String> {
        let document: Value = serde_json::from_str(body).unwrap();
        let mut ids: Vec<String> = document["assets"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|a| a["fields"]["title"]["en-US"] == "Thumb.jpg")
            .map(|a| a["sys"]["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    };

    let first = export.run(ExportKind::Categories).await.unwrap();
    let first_ids = thumb_ids(&first.body);
    assert_eq!(first_ids.len(), 2);
    assert_ne!(first_ids[0], first_ids[1]);

    let previous = temp.path().join("previous.json");
    std::fs::copy(&first.output_path, &previous).unwrap();
    producer.point_at(&previous);

    let second = export.run(ExportKind::Categories).await.unwrap();
    assert_eq!(thumb_ids(&second.body), first_ids);
}

#[tokio::test]
async fn product_export_reuses_snapshot_asset_id() {
    let temp = tempfile::tempdir().unwrap();
    let snapshot = temp.path().join("contentful.json");
    std::fs::write(
        &snapshot,
        r#"{"assets": [{"sys": {"id": "abc"},
            "fields": {"title": {"en-US": "SKU123"}, "description": {"en-US": "product-img"}}}]}"#,
    )
    .unwrap();
    let export = service(
        config(temp.path()),
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        Arc::new(FileProducer::new(snapshot)),
    );

    let report = export.run(ExportKind::Products).await.unwrap();
    assert_eq!(report.asset_count, 5);
    assert_eq!(report.output_path, temp.path().join("exports/products.json"));

    let document: Value = serde_json::from_str(&report.body).unwrap();
    assert!(document.get("entries").is_none());
    let assets = ids_by(&document, "assets", "title");
    assert_eq!(assets["SKU123"], "abc");
    assert_ne!(assets["SKU124"], "abc");
}

#[tokio::test]
async fn product_cap_truncates_export() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = config(temp.path());
    config.limits.product_cap = Some(3);
    let export = service(
        config,
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );
    let report = export.run(ExportKind::Products).await.unwrap();
    assert_eq!(report.asset_count, 3);
}

#[tokio::test]
async fn absorbed_subtree_yields_partial_export() {
    let temp = tempfile::tempdir().unwrap();
    let tree = garden_tree();
    tree.fail_on("trees");
    let export = service(
        config(temp.path()),
        Arc::new(tree),
        Arc::new(FakeCatalog::with_categories(&CATEGORIES)),
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );

    let report = export.run(ExportKind::Categories).await.unwrap();
    assert_eq!(report.absorbed_failures, 1);
    assert_eq!(report.asset_count, 1);
    assert_eq!(report.entry_count, 1);
    assert!(report.summary().contains("1 remote fetches failed"));
}

#[tokio::test]
async fn propagated_failure_keeps_previous_output() {
    let temp = tempfile::tempdir().unwrap();
    let tree = Arc::new(garden_tree());
    let mut config = config(temp.path());
    config.repository.failure_policy = FailurePolicy::Propagate;
    let export = service(
        config,
        tree.clone(),
        Arc::new(FakeCatalog::with_categories(&CATEGORIES)),
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );

    let first = export.run(ExportKind::Categories).await.unwrap();
    let before = std::fs::read_to_string(&first.output_path).unwrap();

    tree.fail_on("gifts-media");
    let result = export.run(ExportKind::Categories).await;
    assert!(matches!(result, Err(ExportError::RemoteFetchFailure(_))));
    assert_eq!(std::fs::read_to_string(&first.output_path).unwrap(), before);
}

#[tokio::test]
async fn catalog_outage_fails_category_export() {
    let temp = tempfile::tempdir().unwrap();
    let catalog = Arc::new(FakeCatalog::with_categories(&CATEGORIES));
    catalog.unavailable.store(true, Ordering::SeqCst);
    let export = service(
        config(temp.path()),
        Arc::new(garden_tree()),
        catalog,
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );
    let result = export.run(ExportKind::Categories).await;
    assert!(matches!(result, Err(ExportError::RemoteFetchFailure(_))));
    assert!(!temp.path().join("exports/categories.json").exists());
}

#[tokio::test]
async fn missing_snapshot_file_degrades_when_absorbed() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = config(temp.path());
    config.snapshot.on_failure = FailurePolicy::Absorb;
    let export = service(
        config,
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        Arc::new(FileProducer::new(temp.path().join("absent.json"))),
    );
    let report = export.run(ExportKind::Products).await.unwrap();
    assert!(report.fresh_identities);
    assert_eq!(report.asset_count, 5);
}

#[tokio::test]
async fn overlapping_run_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let release = Arc::new(Notify::new());
    let producer = Arc::new(FileProducer::held(empty_snapshot(temp.path()), release.clone()));
    let export = Arc::new(service(
        config(temp.path()),
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        producer.clone(),
    ));

    let running = {
        let export = export.clone();
        tokio::spawn(async move { export.run(ExportKind::Products).await })
    };
    while producer.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert!(matches!(
        export.run(ExportKind::Categories).await,
        Err(ExportError::RunInProgress)
    ));
    release.notify_one();
    let report = running.await.unwrap().unwrap();
    assert_eq!(report.kind, ExportKind::Products);
    assert_eq!(producer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_bootstrap_blocks_without_running_producer() {
    let temp = tempfile::tempdir().unwrap();
    let tree = FakeTree::default();
    tree.reject_login.store(true, Ordering::SeqCst);
    let producer = Arc::new(FileProducer::new(empty_snapshot(temp.path())));
    let export = service(
        config(temp.path()),
        Arc::new(tree),
        Arc::new(FakeCatalog::default()),
        producer.clone(),
    );

    assert!(matches!(
        export.bootstrap().await,
        Err(ExportError::AuthenticationFailure(_))
    ));
    assert!(export.gate().is_blocked());
    for kind in [ExportKind::Categories, ExportKind::Products] {
        assert!(matches!(export.run(kind).await, Err(ExportError::Blocked(_))));
    }
    assert_eq!(producer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn successful_bootstrap_leaves_gate_open() {
    let temp = tempfile::tempdir().unwrap();
    let export = service(
        config(temp.path()),
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        Arc::new(FileProducer::new(empty_snapshot(temp.path()))),
    );
    export.bootstrap().await.unwrap();
    assert!(!export.gate().is_blocked());
}

#[tokio::test(start_paused = true)]
async fn run_deadline_is_enforced() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = config(temp.path());
    config.limits.run_timeout_secs = 5;
    let export = service(
        config,
        Arc::new(garden_tree()),
        Arc::new(FakeCatalog::default()),
        Arc::new(FileProducer::delayed(
            empty_snapshot(temp.path()),
            Duration::from_secs(60),
        )),
    );
    assert!(matches!(
        export.run(ExportKind::Products).await,
        Err(ExportError::Timeout(5))
    ));
    assert!(!export.gate().is_running());
}
