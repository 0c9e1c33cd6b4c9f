/// Sound manager facade
///
/// Single entry point for callers: one-shot effects go through the clip
/// cache, background music through the single-slot player, and both are
/// gated by the process-wide mute flag. Playback calls never return errors;
/// a failed load is logged and the call is a no-op.
use crate::backend::rodio::RodioBackend;
use crate::backend::AudioBackend;
use crate::cache::ClipCache;
use crate::error::AudioError;
use crate::music::MusicPlayer;
use crate::settings::{JsonSettings, MemorySettings, SettingsStore, MUTED_PREF_KEY};
use crate::state::AudioState;

pub struct SoundManager {
    backend: Box<dyn AudioBackend>,
    settings: Box<dyn SettingsStore>,
    cache: ClipCache,
    music: MusicPlayer,
    state: AudioState,
    resource_prefix: String,
}

impl SoundManager {
    /// Create a manager over the given backend and settings store.
    ///
    /// A persisted mute flag is applied here, before any playback call can
    /// happen, so a muted session stays muted across restarts.
    pub fn new(backend: Box<dyn AudioBackend>, settings: Box<dyn SettingsStore>) -> Self {
        let mut manager = Self {
            backend,
            settings,
            cache: ClipCache::new(),
            music: MusicPlayer::new(),
            state: AudioState::default(),
            resource_prefix: String::new(),
        };

        let muted =
            manager.settings.has(MUTED_PREF_KEY) && manager.settings.get_int(MUTED_PREF_KEY) != 0;
        if muted {
            tracing::info!("Restoring persisted mute state");
        }
        manager.apply_mute(muted);

        manager
    }

    /// Default wiring: rodio output plus the JSON settings file under the
    /// platform config directory (an in-memory store when there is none).
    pub fn with_default_backend() -> Result<Self, AudioError> {
        let backend = RodioBackend::new()?;

        let settings: Box<dyn SettingsStore> = match JsonSettings::default_path() {
            Some(path) => match JsonSettings::load(&path) {
                Ok(store) => Box::new(store),
                Err(e) => {
                    tracing::warn!("Falling back to in-memory settings: {}", e);
                    Box::new(MemorySettings::new())
                }
            },
            None => Box::new(MemorySettings::new()),
        };

        Ok(Self::new(Box::new(backend), settings))
    }

    /// Set the prefix joined onto every resource name before it reaches the
    /// backend's loader. Identical (prefix, name) pairs always resolve to
    /// the same cache entry.
    pub fn set_resource_prefix(&mut self, prefix: &str) {
        self.resource_prefix = prefix.to_string();
    }

    fn resource_path(&self, name: &str) -> String {
        format!("{}{}", self.resource_prefix, name)
    }

    /// Load a sound effect into the cache without playing it.
    pub fn preload_sound(&mut self, name: &str) {
        let path = self.resource_path(name);
        self.cache.preload(self.backend.as_mut(), &path);
    }

    /// Fire-and-forget playback of a sound effect at `volume`.
    ///
    /// Resolves through the cache (loading on a miss), so the first play of
    /// an effect may grow the cache. No-op while muted.
    pub fn play_sound(&mut self, name: &str, volume: f32) {
        if self.state.muted() {
            return;
        }

        let path = self.resource_path(name);
        if let Some(handle) = self.cache.resolve(self.backend.as_mut(), &path) {
            self.backend.play_one_shot(&handle, volume);
        }
    }

    /// Release a cached sound effect.
    pub fn unload_sound(&mut self, name: &str) {
        let path = self.resource_path(name);
        self.cache.unload(self.backend.as_mut(), &path);
    }

    /// Release every cached sound effect.
    pub fn unload_all_sounds(&mut self) {
        self.cache.unload_all(self.backend.as_mut());
    }

    /// Start looping background music. No-op while muted; see
    /// [`MusicPlayer::play`] for the same-track and switch semantics.
    pub fn play_music(&mut self, name: &str, volume: f32, restart_if_same: bool) {
        if self.state.muted() {
            return;
        }

        let path = self.resource_path(name);
        self.music
            .play(self.backend.as_mut(), &path, volume, restart_if_same);
    }

    /// Stop background music, keeping the track loaded.
    pub fn stop_music(&mut self) {
        self.music.stop(self.backend.as_mut());
    }

    /// Stop background music and release the loaded track.
    pub fn unload_music(&mut self) {
        self.music.unload(self.backend.as_mut());
    }

    /// The loaded music track's path and volume, if any.
    pub fn current_music(&self) -> Option<(&str, f32)> {
        self.music.current()
    }

    /// Output gain as the backend reports it: 0 while muted, the stored
    /// volume otherwise. The backend is the source of truth here, not the
    /// stored field.
    pub fn volume(&self) -> f32 {
        self.backend.global_gain()
    }

    /// Store a new volume and push the effective gain to the backend.
    pub fn set_volume(&mut self, volume: f32) {
        self.state.set_volume(volume);
        self.backend.set_global_gain(self.state.effective_gain());
    }

    pub fn is_muted(&self) -> bool {
        self.state.muted()
    }

    /// Mute or unmute all output. The flag is persisted immediately.
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.set_int(MUTED_PREF_KEY, muted as i32);
        self.apply_mute(muted);
    }

    fn apply_mute(&mut self, muted: bool) {
        self.state.set_muted(muted);
        self.backend.pause_output(muted);
        self.backend.set_global_gain(self.state.effective_gain());
    }
}
