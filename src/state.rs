/// Process-wide audio state.
///
/// All volume values are in the range `0.0` (silent) to `1.0` (full). The
/// `muted` flag overrides the stored volume without losing it, so un-muting
/// restores the previous level.
#[derive(Debug, Clone, Copy)]
pub struct AudioState {
    volume: f32,
    muted: bool,
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl AudioState {
    /// The volume actually applied to output: 0 when muted, the stored
    /// volume otherwise.
    pub fn effective_gain(&self) -> f32 {
        if self.muted {
            return 0.0;
        }
        self.volume
    }

    /// Set the stored volume, clamped to `[0.0, 1.0]`.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn muted(&self) -> bool {
        self.muted
    }
}
