/// Clip cache
///
/// Maps resource paths to loaded clip handles so repeated playback of the
/// same effect never hits the backend's loader twice. Entries only leave the
/// cache through an explicit unload; there is no eviction.
use std::collections::HashMap;

use crate::backend::{AudioBackend, ClipHandle};

#[derive(Default)]
pub struct ClipCache {
    clips: HashMap<String, ClipHandle>,
}

impl ClipCache {
    pub fn new() -> Self {
        Self {
            clips: HashMap::new(),
        }
    }

    /// Load a clip into the cache ahead of time. Idempotent: a cached path
    /// is left alone. A failed load is logged and the cache is unchanged.
    pub fn preload(&mut self, backend: &mut dyn AudioBackend, path: &str) {
        if self.clips.contains_key(path) {
            return;
        }

        match backend.load_clip(path) {
            Ok(handle) => {
                tracing::debug!("Cached clip: {}", path);
                self.clips.insert(path.to_string(), handle);
            }
            Err(e) => tracing::warn!("Failed to preload clip '{}': {}", path, e),
        }
    }

    /// Resolve a path to a playable handle, loading and caching on a miss.
    pub fn resolve(&mut self, backend: &mut dyn AudioBackend, path: &str) -> Option<ClipHandle> {
        if let Some(handle) = self.clips.get(path) {
            return Some(handle.clone());
        }

        match backend.load_clip(path) {
            Ok(handle) => {
                tracing::debug!("Cached clip: {}", path);
                self.clips.insert(path.to_string(), handle.clone());
                Some(handle)
            }
            Err(e) => {
                tracing::warn!("Failed to load clip '{}': {}", path, e);
                None
            }
        }
    }

    /// Release a cached clip. No-op if the path was never cached.
    pub fn unload(&mut self, backend: &mut dyn AudioBackend, path: &str) {
        if let Some(handle) = self.clips.remove(path) {
            backend.unload_clip(&handle);
            tracing::debug!("Unloaded clip: {}", path);
        }
    }

    /// Release every cached clip.
    pub fn unload_all(&mut self, backend: &mut dyn AudioBackend) {
        for (path, handle) in self.clips.drain() {
            backend.unload_clip(&handle);
            tracing::debug!("Unloaded clip: {}", path);
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.clips.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
