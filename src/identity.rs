//! Identity Resolver
//!
//! Reuses the identifier of a matching record from the prior export, or mints a new one,
//! so repeated exports update records instead of duplicating them.

use crate::content::PriorExportSnapshot;
use crate::types::{AssetTag, BROWSE_PAGE_CONTENT_TYPE};
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

/// Which snapshot list a lookup searches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Asset,
    Entry,
}

/// Per-run resolver over an immutable snapshot
#[derive(Debug)]
pub struct IdentityResolver {
    snapshot: PriorExportSnapshot,
    /// Identifiers handed out during this run
    issued: Mutex<HashSet<String>>,
    fresh_only: bool,
}

impl IdentityResolver {
    pub fn new(snapshot: PriorExportSnapshot) -> Self {
        Self {
            snapshot,
            issued: Mutex::new(HashSet::new()),
            fresh_only: false,
        }
    }

    /// Resolver without a snapshot: every identifier is minted fresh.
    pub fn fresh(reason: &str) -> Self {
        warn!(
            reason,
            "No usable export snapshot; every identifier will be minted fresh and records re-created"
        );
        Self {
            snapshot: PriorExportSnapshot::empty(),
            issued: Mutex::new(HashSet::new()),
            fresh_only: true,
        }
    }

    /// True when the resolver runs without a snapshot
    pub fn is_fresh_only(&self) -> bool {
        self.fresh_only
    }

    /// Resolve the identifier for a record of `kind` keyed by `namespace_tag` and `match_key`.
    ///
    /// Identifiers are unique per run: each matching snapshot id is handed out once, in
    /// snapshot order, and a new one is minted only after every match is used.
    pub fn resolve(&self, kind: RecordKind, namespace_tag: &str, match_key: &str) -> String {
        let candidates = match kind {
            RecordKind::Asset => self.snapshot.find_assets(namespace_tag, match_key),
            RecordKind::Entry => self.snapshot.find_entries(namespace_tag, match_key),
        };

        let mut issued = self.issued.lock();
        if let Some(id) = candidates.iter().find(|id| !issued.contains(id.as_str())) {
            issued.insert(id.clone());
            return id.clone();
        }
        if !candidates.is_empty() {
            warn!(
                kind = ?kind,
                namespace_tag,
                match_key,
                matches = candidates.len(),
                "Every snapshot id for this key already issued in this run; minting a new one"
            );
        }

        loop {
            let id = Uuid::new_v4().to_string();
            if issued.insert(id.clone()) {
                debug!(kind = ?kind, namespace_tag, match_key, id = %id, "Minted identifier");
                return id;
            }
        }
    }

    pub fn resolve_asset(&self, tag: AssetTag, title: &str) -> String {
        self.resolve(RecordKind::Asset, tag.as_str(), title)
    }

    pub fn resolve_browse_page(&self, category_id: &str) -> String {
        self.resolve(RecordKind::Entry, BROWSE_PAGE_CONTENT_TYPE, category_id)
    }
}
