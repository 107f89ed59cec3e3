use color_eyre::Result;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

pub const DEFAULT_MUSIC: &str = "normal_level_music.wav";
pub const MUSIC_VOLUME: f32 = 0.5;

/// Background music player. Sound is optional: the game runs silently when
/// there is no output device or no music file.
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    music: Option<Sink>,
}

impl AudioManager {
    /// Opens the default output device.
    pub fn new() -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            stream_handle,
            music: None,
        })
    }

    /// Opens the output device, or returns `None` after logging why not.
    pub fn try_default() -> Option<Self> {
        match Self::new() {
            Ok(audio) => Some(audio),
            Err(err) => {
                warn!(%err, "audio output unavailable, continuing without sound");
                None
            }
        }
    }

    /// Starts looping `path` at [`MUSIC_VOLUME`], replacing any current track.
    pub fn play_music(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;
        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(MUSIC_VOLUME);
        sink.append(source.repeat_infinite());

        if let Some(previous) = self.music.replace(sink) {
            previous.stop();
        }
        info!(path = %path.display(), "music started");
        Ok(())
    }

    /// Best-effort [`AudioManager::play_music`]: failures are logged, not returned.
    pub fn play_music_or_warn(&mut self, path: &Path) {
        if let Err(err) = self.play_music(path) {
            warn!(path = %path.display(), %err, "could not play music");
        }
    }

    pub fn set_paused(&self, paused: bool) {
        if let Some(sink) = &self.music {
            if paused {
                sink.pause();
            } else {
                sink.play();
            }
        }
    }
}
