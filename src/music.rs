/// Background music track controller
///
/// Owns the single music slot: at most one clip is loaded for the looping
/// music channel at any time. Tracks are loaded straight from the backend,
/// never through the shared clip cache, because the slot already guarantees
/// exactly one live handle.
use crate::backend::{AudioBackend, ClipHandle};

#[derive(Debug)]
struct CurrentTrack {
    path: String,
    handle: ClipHandle,
    volume: f32,
}

/// Single-slot music player.
///
/// Slot states are `Idle` (nothing loaded) and `Playing(path)`. A same-path
/// play either restarts the existing handle or leaves it alone; a
/// different-path play releases the old handle before loading the new one.
/// `stop` pauses output without touching the slot; only `unload` empties it.
#[derive(Default)]
pub struct MusicPlayer {
    current: Option<CurrentTrack>,
}

impl MusicPlayer {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Start looping playback of `path`.
    ///
    /// When `path` is already the loaded track, no reload happens:
    /// `restart_if_same` decides between restarting the same handle from the
    /// beginning and letting the current playback continue untouched.
    pub fn play(
        &mut self,
        backend: &mut dyn AudioBackend,
        path: &str,
        volume: f32,
        restart_if_same: bool,
    ) {
        if let Some(track) = self.current.as_mut() {
            if track.path == path {
                if restart_if_same {
                    track.volume = volume;
                    backend.stop_music();
                    backend.set_looped_clip(&track.handle, volume);
                    backend.play_music();
                }
                return;
            }
        }

        if let Some(track) = self.current.take() {
            backend.stop_music();
            backend.unload_clip(&track.handle);
            tracing::debug!("Released music track: {}", track.path);
        }

        match backend.load_clip(path) {
            Ok(handle) => {
                backend.set_looped_clip(&handle, volume);
                backend.play_music();
                tracing::info!("Playing music track: {}", path);
                self.current = Some(CurrentTrack {
                    path: path.to_string(),
                    handle,
                    volume,
                });
            }
            Err(e) => tracing::warn!("Failed to load music track '{}': {}", path, e),
        }
    }

    /// Stop playback. The loaded track stays in the slot, so a later play
    /// of the same path restarts without a reload.
    pub fn stop(&mut self, backend: &mut dyn AudioBackend) {
        if self.current.is_some() {
            backend.stop_music();
        }
    }

    /// Release the loaded track and empty the slot. Playback is stopped
    /// first; the backend makes no promise about releasing a playing clip.
    pub fn unload(&mut self, backend: &mut dyn AudioBackend) {
        if let Some(track) = self.current.take() {
            backend.stop_music();
            backend.unload_clip(&track.handle);
            tracing::debug!("Released music track: {}", track.path);
        }
    }

    /// The loaded track's path and volume, if any.
    pub fn current(&self) -> Option<(&str, f32)> {
        self.current
            .as_ref()
            .map(|track| (track.path.as_str(), track.volume))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    #[test]
    fn test_first_play_loads_and_starts() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/theme", 0.8, true);

        assert_eq!(music.current(), Some(("music/theme", 0.8)));
        backend.with(|calls| {
            assert_eq!(calls.loads, vec!["music/theme".to_string()]);
            assert_eq!(calls.looped, vec![(0, 0.8)]);
            assert_eq!(calls.music_starts, 1);
        });
    }

    #[test]
    fn test_same_track_restart_reuses_handle() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/theme", 1.0, true);
        music.play(&mut backend, "music/theme", 1.0, true);

        backend.with(|calls| {
            assert_eq!(calls.loads.len(), 1);
            assert_eq!(calls.music_starts, 2);
            assert_eq!(calls.music_stops, 1);
            // Both looped-clip assignments carry the same handle.
            assert_eq!(calls.looped[0].0, calls.looped[1].0);
        });
    }

    #[test]
    fn test_same_track_without_restart_is_noop() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/theme", 1.0, false);
        music.play(&mut backend, "music/theme", 1.0, false);

        backend.with(|calls| {
            assert_eq!(calls.loads.len(), 1);
            assert_eq!(calls.music_starts, 1);
            assert_eq!(calls.music_stops, 0);
        });
    }

    #[test]
    fn test_track_switch_releases_old_handle() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/a", 1.0, true);
        music.play(&mut backend, "music/b", 1.0, true);

        assert_eq!(music.current(), Some(("music/b", 1.0)));
        backend.with(|calls| {
            assert_eq!(
                calls.loads,
                vec!["music/a".to_string(), "music/b".to_string()]
            );
            assert_eq!(calls.unloads, vec![0]);
            assert_eq!(calls.music_stops, 1);
            assert_eq!(calls.music_starts, 2);
        });
    }

    #[test]
    fn test_stop_keeps_the_slot() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/theme", 1.0, true);
        music.stop(&mut backend);

        assert_eq!(music.current(), Some(("music/theme", 1.0)));
        backend.with(|calls| assert!(calls.unloads.is_empty()));

        // Same path again: restart in place, no reload.
        music.play(&mut backend, "music/theme", 1.0, true);
        backend.with(|calls| assert_eq!(calls.loads.len(), 1));
    }

    #[test]
    fn test_stop_with_empty_slot_is_noop() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.stop(&mut backend);
        backend.with(|calls| assert_eq!(calls.music_stops, 0));
    }

    #[test]
    fn test_unload_stops_then_releases() {
        let mut backend = FakeBackend::new();
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/theme", 1.0, true);
        music.unload(&mut backend);

        assert!(music.current().is_none());
        backend.with(|calls| {
            assert_eq!(calls.music_stops, 1);
            assert_eq!(calls.unloads, vec![0]);
        });

        // The slot is empty, so the next play loads fresh.
        music.play(&mut backend, "music/theme", 1.0, true);
        backend.with(|calls| assert_eq!(calls.loads.len(), 2));
    }

    #[test]
    fn test_failed_load_leaves_slot_empty() {
        let mut backend = FakeBackend::new();
        backend.mark_missing("music/ghost");
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/ghost", 1.0, true);

        assert!(music.current().is_none());
        backend.with(|calls| assert_eq!(calls.music_starts, 0));
    }

    #[test]
    fn test_failed_switch_releases_old_track() {
        let mut backend = FakeBackend::new();
        backend.mark_missing("music/ghost");
        let mut music = MusicPlayer::new();

        music.play(&mut backend, "music/a", 1.0, true);
        music.play(&mut backend, "music/ghost", 1.0, true);

        // The old track was already released when the new load failed.
        assert!(music.current().is_none());
        backend.with(|calls| assert_eq!(calls.unloads, vec![0]));
    }
}
