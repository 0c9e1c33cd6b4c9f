//! Sound playback facade with clip caching and persistent mute state.
//!
//! Wraps a playback backend behind a small manager that callers drive with
//! resource names:
//! - one-shot sound effects, cached by resource path and deduped on load
//! - a single looping background-music slot with restart/replace semantics
//! - process-wide volume and mute, the mute flag persisted across sessions
//! - an optional process-wide instance with lazy init and single teardown
//!
//! ## Architecture
//!
//! ```text
//! SoundManager
//!   ├── ClipCache     (path → ClipHandle, one-shot effects)
//!   ├── MusicPlayer   (single-slot looping track)
//!   ├── AudioState    (volume + mute → effective gain)
//!   ├── SettingsStore (persisted mute flag)
//!   └── AudioBackend  (rodio output thread, or your own engine)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use soundbank::SoundManager;
//!
//! let mut sounds = SoundManager::with_default_backend()?;
//! sounds.set_resource_prefix("assets/audio/");
//!
//! sounds.preload_sound("jump.ogg");
//! sounds.play_sound("jump.ogg", 1.0);
//! sounds.play_music("theme.mp3", 0.8, true);
//!
//! sounds.set_muted(true); // persisted; the next session starts muted
//! ```

pub mod backend;
pub mod cache;
pub mod error;
pub mod instance;
pub mod manager;
pub mod music;
pub mod settings;
pub mod state;

// Re-export commonly used types
pub use backend::rodio::RodioBackend;
pub use backend::{AudioBackend, ClipHandle};
pub use cache::ClipCache;
pub use error::{AudioError, SettingsError};
pub use instance::{global, install, shutdown, SharedManager};
pub use manager::SoundManager;
pub use music::MusicPlayer;
pub use settings::{JsonSettings, MemorySettings, SettingsStore, MUTED_PREF_KEY};
pub use state::AudioState;
