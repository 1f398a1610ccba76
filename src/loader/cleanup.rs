// ── Exit-time removal of extracted artifacts ──────────────────────────────────
//
// A loaded artifact must stay on disk while it is mapped on some platforms,
// so successful extractions are parked here and removed when the process
// exits.  Removal is best-effort: errors are ignored and never block a load.

use std::sync::{Mutex, Once, PoisonError, TryLockError};

use tempfile::TempPath;
use tracing::debug;

use crate::platform;

/// Temporary files awaiting removal.
#[derive(Debug, Default)]
pub(crate) struct ExitRegistry {
    pending: Mutex<Vec<TempPath>>,
}

impl ExitRegistry {
    pub(crate) const fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, path: TempPath) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path);
    }

    /// Remove every parked file; returns how many were parked.
    pub(crate) fn purge(&self) -> usize {
        let drained: Vec<TempPath> = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let count = drained.len();
        // Dropping a TempPath deletes the file and swallows the error.
        drop(drained);
        count
    }

    /// Like `purge`, but gives up instead of waiting for the lock.
    ///
    /// Exit handlers run while other threads may still be alive; one of them
    /// could hold the lock forever.  Returns `None` when the purge was skipped.
    pub(crate) fn try_purge(&self) -> Option<usize> {
        let drained: Vec<TempPath> = match self.pending.try_lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(TryLockError::Poisoned(e)) => std::mem::take(&mut *e.into_inner()),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(drained.len())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

static REGISTRY: ExitRegistry = ExitRegistry::new();
static HOOK: Once = Once::new();

extern "C" fn purge_at_exit() {
    let _ = REGISTRY.try_purge();
}

/// Schedule `path` for removal at process exit.
pub(crate) fn remove_at_exit(path: TempPath) {
    HOOK.call_once(|| {
        if !platform::register_exit_hook(purge_at_exit) {
            debug!("no exit hook; extracted artifacts are left for the system temp cleanup");
        }
    });
    REGISTRY.push(path);
}

/// Remove every extracted artifact now instead of at exit.
///
/// Only meaningful once the modules they back are no longer needed; on
/// Windows a still-mapped DLL cannot be deleted and is silently kept.
pub fn purge_temporary_artifacts() -> usize {
    REGISTRY.purge()
}
