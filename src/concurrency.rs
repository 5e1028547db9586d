//! Run gating for exports
//!
//! At most one export runs at a time; an overlapping trigger is rejected rather than
//! queued. A failed startup login blocks every later trigger.

use crate::error::ExportError;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// Block flag plus single-run lock, owned by the export service
#[derive(Debug, Default)]
pub struct ExportGate {
    blocked: AtomicBool,
    /// Why the gate was blocked
    reason: RwLock<Option<String>>,
    run_lock: Mutex<()>,
}

/// Held for the duration of one run
#[derive(Debug)]
pub struct RunPermit<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every later trigger with `reason`.
    pub fn block(&self, reason: impl Into<String>) {
        *self.reason.write() = Some(reason.into());
        self.blocked.store(true, Ordering::SeqCst);
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Acquire the run lock without waiting.
    pub fn enter(&self) -> Result<RunPermit<'_>, ExportError> {
        if self.is_blocked() {
            let reason = self
                .reason
                .read()
                .clone()
                .unwrap_or_else(|| "startup authentication failed".to_string());
            return Err(ExportError::Blocked(reason));
        }
        let guard = self.run_lock.try_lock().map_err(|_| ExportError::RunInProgress)?;
        Ok(RunPermit { _guard: guard })
    }

    /// True while a permit is held
    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }
}
