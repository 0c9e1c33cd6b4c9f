/// Counting fake backend for unit tests
///
/// Records every call so tests can assert on load/playback traffic. Clones
/// share the same recorder, so a test can keep a probe after boxing one copy
/// into the code under test.
use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{AudioBackend, ClipHandle};
use crate::error::AudioError;

#[derive(Debug, Default)]
pub(crate) struct Recorded {
    pub loads: Vec<String>,
    pub unloads: Vec<u64>,
    pub one_shots: Vec<(u64, f32)>,
    pub looped: Vec<(u64, f32)>,
    pub music_starts: u32,
    pub music_stops: u32,
    pub gains: Vec<f32>,
    pub pauses: Vec<bool>,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct FakeBackend {
    calls: Arc<Mutex<Recorded>>,
    missing: Arc<Mutex<HashSet<String>>>,
    next_id: Arc<Mutex<u64>>,
    gain: Arc<Mutex<f32>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let fake = Self::default();
        *fake.gain.lock() = 1.0;
        fake
    }

    /// Make `load_clip` fail for this path.
    pub fn mark_missing(&self, path: &str) {
        self.missing.lock().insert(path.to_string());
    }

    pub fn with<R>(&self, f: impl FnOnce(&Recorded) -> R) -> R {
        f(&self.calls.lock())
    }

    pub fn load_count(&self) -> usize {
        self.calls.lock().loads.len()
    }
}

impl AudioBackend for FakeBackend {
    fn load_clip(&mut self, path: &str) -> Result<ClipHandle, AudioError> {
        if self.missing.lock().contains(path) {
            return Err(AudioError::ClipNotFound {
                path: path.to_string(),
            });
        }
        self.calls.lock().loads.push(path.to_string());
        let mut next_id = self.next_id.lock();
        let id = *next_id;
        *next_id += 1;
        Ok(ClipHandle::new(id, Arc::new(Vec::new())))
    }

    fn unload_clip(&mut self, handle: &ClipHandle) {
        self.calls.lock().unloads.push(handle.id());
    }

    fn play_one_shot(&mut self, handle: &ClipHandle, volume: f32) {
        self.calls.lock().one_shots.push((handle.id(), volume));
    }

    fn set_looped_clip(&mut self, handle: &ClipHandle, volume: f32) {
        self.calls.lock().looped.push((handle.id(), volume));
    }

    fn play_music(&mut self) {
        self.calls.lock().music_starts += 1;
    }

    fn stop_music(&mut self) {
        self.calls.lock().music_stops += 1;
    }

    fn set_global_gain(&mut self, gain: f32) {
        *self.gain.lock() = gain;
        self.calls.lock().gains.push(gain);
    }

    fn global_gain(&self) -> f32 {
        *self.gain.lock()
    }

    fn pause_output(&mut self, paused: bool) {
        self.calls.lock().pauses.push(paused);
    }
}
