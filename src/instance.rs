/// Process-wide manager instance
///
/// One instance per process, created lazily on first access and torn down
/// exactly once. After teardown the accessor reports absence instead of
/// resurrecting a fresh instance, so late callers cannot spawn a duplicate
/// during shutdown.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::manager::SoundManager;

pub type SharedManager = Arc<Mutex<SoundManager>>;

static INSTANCE: Mutex<Option<SharedManager>> = Mutex::new(None);
static SHUT_DOWN: AtomicBool = AtomicBool::new(false);

/// The process-wide manager, creating it with default wiring on first
/// access.
///
/// Returns `None` once [`shutdown`] has run, or when default wiring fails
/// (no audio device, say); in the latter case the next access tries again.
pub fn global() -> Option<SharedManager> {
    let mut slot = INSTANCE.lock();

    // Checked under the lock so a concurrent shutdown cannot race a fresh
    // instance into the slot.
    if SHUT_DOWN.load(Ordering::Acquire) {
        tracing::debug!("Sound manager accessed after shutdown");
        return None;
    }

    if let Some(existing) = slot.as_ref() {
        return Some(Arc::clone(existing));
    }

    match SoundManager::with_default_backend() {
        Ok(manager) => {
            let shared = Arc::new(Mutex::new(manager));
            *slot = Some(Arc::clone(&shared));
            tracing::info!("Sound manager initialized");
            Some(shared)
        }
        Err(e) => {
            tracing::error!("Failed to initialize sound manager: {}", e);
            None
        }
    }
}

/// Install a custom-wired manager as the process-wide instance.
///
/// If an instance already exists this is a configuration error: it is
/// logged, the new manager is discarded, and the existing instance is
/// returned. After shutdown the manager is handed back unregistered.
pub fn install(manager: SoundManager) -> SharedManager {
    let shared = Arc::new(Mutex::new(manager));
    let mut slot = INSTANCE.lock();

    if SHUT_DOWN.load(Ordering::Acquire) {
        tracing::warn!("Sound manager installed after shutdown; not registering it");
        return shared;
    }

    match slot.as_ref() {
        Some(existing) => {
            tracing::error!("More than one sound manager instance; keeping the first");
            Arc::clone(existing)
        }
        None => {
            *slot = Some(Arc::clone(&shared));
            tracing::info!("Sound manager installed");
            shared
        }
    }
}

/// Tear down the process-wide instance. Idempotent; every later [`global`]
/// call returns `None`.
pub fn shutdown() {
    let mut slot = INSTANCE.lock();

    if SHUT_DOWN.swap(true, Ordering::AcqRel) {
        return;
    }

    if let Some(shared) = slot.take() {
        let mut manager = shared.lock();
        manager.unload_music();
        manager.unload_all_sounds();
        tracing::info!("Sound manager shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::settings::MemorySettings;

    fn fake_manager(backend: &FakeBackend) -> SoundManager {
        SoundManager::new(Box::new(backend.clone()), Box::new(MemorySettings::new()))
    }

    // The whole lifecycle in one test: the slot and the shutdown flag are
    // process-global, so ordering across tests would not be deterministic.
    #[test]
    fn test_instance_lifecycle() {
        let backend = FakeBackend::new();

        let installed = install(fake_manager(&backend));
        let accessed = global().expect("instance should exist after install");
        assert!(Arc::ptr_eq(&installed, &accessed));

        // A second install is reported and ignored in favor of the first.
        let duplicate = install(fake_manager(&backend));
        assert!(Arc::ptr_eq(&installed, &duplicate));

        installed.lock().play_music("theme", 1.0, true);

        shutdown();
        assert!(global().is_none());
        // Teardown released the music slot.
        backend.with(|calls| assert_eq!(calls.unloads.len(), 1));

        // Idempotent, and still absent afterwards.
        shutdown();
        assert!(global().is_none());

        // No resurrection through install either.
        let late = install(fake_manager(&backend));
        assert!(!Arc::ptr_eq(&installed, &late));
        assert!(global().is_none());
    }
}
