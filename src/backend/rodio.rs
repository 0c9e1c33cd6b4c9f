/// Rodio-backed audio output
///
/// rodio's `OutputStream` and `Sink` are not `Send`, so a dedicated output
/// thread owns them and the backend handle forwards playback commands over a
/// channel. Clip loading stays synchronous on the caller's thread: read the
/// file into memory, verify it decodes, hand back the bytes.
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use super::{AudioBackend, ClipHandle};
use crate::error::AudioError;

/// Commands handled by the output thread
#[derive(Debug)]
enum Command {
    PlayOneShot { data: Arc<Vec<u8>>, volume: f32 },
    SetLoopedClip { data: Arc<Vec<u8>>, volume: f32 },
    PlayMusic,
    StopMusic,
    SetGain { gain: f32 },
    Pause { paused: bool },
    Shutdown,
}

/// `AudioBackend` implementation on top of rodio.
///
/// Keeps every loaded clip's bytes in memory (playback decodes from the
/// in-memory copy, so starting a sound never touches the filesystem) and
/// owns the output thread for its whole lifetime.
pub struct RodioBackend {
    commands: Sender<Command>,
    worker: Option<JoinHandle<()>>,
    loaded: HashMap<u64, String>,
    next_id: u64,
    gain: f32,
}

impl RodioBackend {
    /// Spawn the output thread and open the default audio device.
    ///
    /// Fails with `StreamInitFailed` if no output device is available; the
    /// worker reports its startup result back before this returns.
    pub fn new() -> Result<Self, AudioError> {
        let (tx, rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);

        let worker = thread::Builder::new()
            .name("soundbank-output".to_string())
            .spawn(move || run_output_thread(rx, ready_tx))
            .map_err(|e| AudioError::StreamInitFailed(Box::new(e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                commands: tx,
                worker: Some(worker),
                loaded: HashMap::new(),
                next_id: 0,
                gain: 1.0,
            }),
            Ok(Err(e)) => Err(e),
            // Worker died before reporting; treat as a failed stream init.
            Err(e) => Err(AudioError::StreamInitFailed(Box::new(e))),
        }
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!("audio output thread is gone, command dropped");
        }
    }
}

impl AudioBackend for RodioBackend {
    fn load_clip(&mut self, path: &str) -> Result<ClipHandle, AudioError> {
        let file = Path::new(path);
        if !file.exists() {
            return Err(AudioError::ClipNotFound {
                path: path.to_string(),
            });
        }

        let bytes = std::fs::read(file).map_err(|e| AudioError::LoadFailed {
            path: path.to_string(),
            source: Box::new(e),
        })?;

        // Verify the audio can be decoded before handing out a handle.
        // rodio's Decoder requires owned data with 'static lifetime.
        let cursor = Cursor::new(bytes.clone());
        Decoder::new(cursor).map_err(|e| AudioError::DecodeFailed(Box::new(e)))?;

        let id = self.next_id;
        self.next_id += 1;
        self.loaded.insert(id, path.to_string());

        tracing::debug!("Loaded clip {} ({} bytes): {}", id, bytes.len(), path);
        Ok(ClipHandle::new(id, Arc::new(bytes)))
    }

    fn unload_clip(&mut self, handle: &ClipHandle) {
        // The byte buffer is freed once the last handle clone drops; the
        // backend only forgets its bookkeeping entry here.
        if let Some(path) = self.loaded.remove(&handle.id()) {
            tracing::debug!("Unloaded clip {}: {}", handle.id(), path);
        }
    }

    fn play_one_shot(&mut self, handle: &ClipHandle, volume: f32) {
        self.send(Command::PlayOneShot {
            data: Arc::clone(handle.data()),
            volume: volume.clamp(0.0, 1.0),
        });
    }

    fn set_looped_clip(&mut self, handle: &ClipHandle, volume: f32) {
        self.send(Command::SetLoopedClip {
            data: Arc::clone(handle.data()),
            volume: volume.clamp(0.0, 1.0),
        });
    }

    fn play_music(&mut self) {
        self.send(Command::PlayMusic);
    }

    fn stop_music(&mut self) {
        self.send(Command::StopMusic);
    }

    fn set_global_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        self.send(Command::SetGain { gain: self.gain });
    }

    fn global_gain(&self) -> f32 {
        self.gain
    }

    fn pause_output(&mut self, paused: bool) {
        self.send(Command::Pause { paused });
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// State owned by the output thread
struct OutputState {
    // The stream must outlive every sink attached to it.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music_sink: Sink,
    music: Option<(Arc<Vec<u8>>, f32)>,
    // (sink, base volume) per live one-shot, so gain changes reach them
    one_shots: Vec<(Sink, f32)>,
    gain: f32,
    paused: bool,
}

fn run_output_thread(commands: Receiver<Command>, ready: Sender<Result<(), AudioError>>) {
    let (stream, handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = ready.send(Err(AudioError::StreamInitFailed(Box::new(e))));
            return;
        }
    };

    let music_sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(AudioError::StreamInitFailed(Box::new(e))));
            return;
        }
    };

    let _ = ready.send(Ok(()));
    tracing::info!("Audio output thread started");

    let mut state = OutputState {
        _stream: stream,
        handle,
        music_sink,
        music: None,
        one_shots: Vec::new(),
        gain: 1.0,
        paused: false,
    };

    while let Ok(command) = commands.recv() {
        if matches!(command, Command::Shutdown) {
            break;
        }
        state.handle_command(command);
    }

    tracing::info!("Audio output thread stopped");
}

impl OutputState {
    fn handle_command(&mut self, command: Command) {
        // Finished one-shots are dropped here rather than on a timer.
        self.one_shots.retain(|(sink, _)| !sink.empty());

        match command {
            Command::PlayOneShot { data, volume } => self.play_one_shot(data, volume),
            Command::SetLoopedClip { data, volume } => {
                self.music_sink.set_volume(volume * self.gain);
                self.music = Some((data, volume));
            }
            Command::PlayMusic => self.play_music(),
            Command::StopMusic => self.music_sink.stop(),
            Command::SetGain { gain } => self.set_gain(gain),
            Command::Pause { paused } => self.set_paused(paused),
            Command::Shutdown => {}
        }
    }

    fn play_one_shot(&mut self, data: Arc<Vec<u8>>, volume: f32) {
        let cursor = Cursor::new((*data).clone());
        let source = match Decoder::new(cursor) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Failed to decode one-shot clip: {}", e);
                return;
            }
        };

        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::warn!("Failed to open playback sink: {}", e);
                return;
            }
        };

        sink.set_volume(volume * self.gain);
        sink.append(source);
        if self.paused {
            sink.pause();
        }
        self.one_shots.push((sink, volume));
    }

    fn play_music(&mut self) {
        let Some((data, volume)) = self.music.clone() else {
            tracing::warn!("Music playback requested with no clip assigned");
            return;
        };

        // A stopped sink keeps its queue state, so restart on a fresh one.
        self.music_sink.stop();
        match Sink::try_new(&self.handle) {
            Ok(sink) => self.music_sink = sink,
            Err(e) => {
                tracing::warn!("Failed to open music sink: {}", e);
                return;
            }
        }

        let cursor = Cursor::new((*data).clone());
        match Decoder::new(cursor) {
            Ok(source) => {
                self.music_sink.set_volume(volume * self.gain);
                self.music_sink.append(source.repeat_infinite());
                if self.paused {
                    self.music_sink.pause();
                } else {
                    self.music_sink.play();
                }
            }
            Err(e) => tracing::warn!("Failed to decode music clip: {}", e),
        }
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some((_, volume)) = &self.music {
            self.music_sink.set_volume(volume * gain);
        }
        for (sink, volume) in &self.one_shots {
            sink.set_volume(volume * gain);
        }
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.music_sink.pause();
            for (sink, _) in &self.one_shots {
                sink.pause();
            }
        } else {
            self.music_sink.play();
            for (sink, _) in &self.one_shots {
                sink.play();
            }
        }
    }
}

// Note: tests for this backend need actual audio hardware; the state machine
// around it is covered through the `AudioBackend` trait with a fake backend.
