/// Audio backend seam
///
/// Everything that actually touches an audio device lives behind
/// `AudioBackend`. The rest of the crate only tracks which clips are loaded
/// and when to play them; decoding and mixing are the backend's problem.
pub mod rodio;

#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;

use crate::error::AudioError;

/// Opaque handle to a loaded audio clip.
///
/// The backend issues one handle per successful load. The id is the clip's
/// identity for bookkeeping (two loads of the same path yield distinct ids);
/// the byte buffer is shared, so clones are cheap and dropping a clone never
/// releases the clip on its own; release goes through
/// [`AudioBackend::unload_clip`].
#[derive(Debug, Clone)]
pub struct ClipHandle {
    id: u64,
    data: Arc<Vec<u8>>,
}

impl ClipHandle {
    pub fn new(id: u64, data: Arc<Vec<u8>>) -> Self {
        Self { id, data }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }
}

impl PartialEq for ClipHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClipHandle {}

/// Playback engine interface.
///
/// One-shot effects are fire-and-forget: the backend may mix any number of
/// overlapping instances and no handle to a playing instance is returned.
/// Music is a single dedicated looping channel: `set_looped_clip` assigns the
/// clip and volume, `play_music`/`stop_music` control it.
pub trait AudioBackend: Send {
    /// Load a clip synchronously. Fails immediately if the resource does not
    /// exist or cannot be decoded; there are no retries.
    fn load_clip(&mut self, path: &str) -> Result<ClipHandle, AudioError>;

    /// Release a previously loaded clip.
    fn unload_clip(&mut self, handle: &ClipHandle);

    /// Fire an independent playback instance of the clip at `volume`.
    fn play_one_shot(&mut self, handle: &ClipHandle, volume: f32);

    /// Assign the music channel's clip and volume. Looping is implied;
    /// playback starts on `play_music`.
    fn set_looped_clip(&mut self, handle: &ClipHandle, volume: f32);

    /// Start (or restart) the music channel from the beginning of its clip.
    fn play_music(&mut self);

    /// Stop the music channel. The assigned clip is kept.
    fn stop_music(&mut self);

    /// Set the output gain applied on top of per-clip volumes.
    fn set_global_gain(&mut self, gain: f32);

    /// Currently applied output gain, as the backend reports it.
    fn global_gain(&self) -> f32;

    /// Pause or resume all output without discarding playback state.
    fn pause_output(&mut self, paused: bool);
}
