use thiserror::Error;

/// Library errors using thiserror for structured error handling.
///
/// These never cross the public facade: playback and preload calls swallow
/// load failures (log + no-op) so callers keep fire-and-forget semantics.
/// The backend and settings seams still report them as proper `Result`s.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio clip not found: {path}")]
    ClipNotFound { path: String },

    #[error("Failed to load audio clip: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode audio format")]
    DecodeFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save settings to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
