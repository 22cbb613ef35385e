#[cfg(feature = "audio")]
mod device;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(feature = "audio")]
pub use device::DeviceSink;

#[derive(Debug, Error)]
pub enum AudioError {
    #[cfg(any(test, not(feature = "audio")))]
    #[error("audio playback is not available in this build")]
    Unavailable,
    #[error("audio file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("audio output failed: {0}")]
    Device(String),
}

/// One playable track.
pub trait AudioSink {
    /// Start or resume playback. Replays from the start after the track ended.
    fn play(&mut self) -> Result<(), AudioError>;

    fn pause(&mut self);

    /// Reports an end-of-track once, then resets.
    fn take_ended(&mut self) -> bool;
}

/// Creates sinks for the media widgets of a mounted slide.
pub trait MediaBackend {
    fn audio_sink(&self, path: &Path) -> Box<dyn AudioSink>;
}

/// Sink used when playback support is compiled out.
#[cfg(any(test, not(feature = "audio")))]
#[derive(Debug, Default)]
pub struct NullSink;

#[cfg(any(test, not(feature = "audio")))]
impl AudioSink for NullSink {
    fn play(&mut self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }

    fn pause(&mut self) {}

    fn take_ended(&mut self) -> bool {
        false
    }
}

/// Backend used by the app: the sound device when built with the `audio`
/// feature, `NullSink` otherwise.
#[derive(Debug, Clone)]
pub struct DefaultBackend {
    volume: f32,
}

impl DefaultBackend {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
        }
    }
}

impl MediaBackend for DefaultBackend {
    #[cfg(feature = "audio")]
    fn audio_sink(&self, path: &Path) -> Box<dyn AudioSink> {
        Box::new(DeviceSink::new(path.to_path_buf(), self.volume))
    }

    #[cfg(not(feature = "audio"))]
    fn audio_sink(&self, path: &Path) -> Box<dyn AudioSink> {
        log::debug!(
            "built without audio support, {} (volume {}) will not play",
            path.display(),
            self.volume
        );
        Box::new(NullSink)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Calls seen by a [`RecordingSink`], shared with the test.
    #[derive(Debug, Default)]
    pub struct SinkLog {
        pub plays: usize,
        pub pauses: usize,
        pub fail_next_play: bool,
        pub ended: bool,
    }

    pub struct RecordingSink(pub Rc<RefCell<SinkLog>>);

    impl AudioSink for RecordingSink {
        fn play(&mut self) -> Result<(), AudioError> {
            let mut log = self.0.borrow_mut();
            if std::mem::take(&mut log.fail_next_play) {
                return Err(AudioError::NotFound(PathBuf::from("missing.mp3")));
            }
            log.plays += 1;
            Ok(())
        }

        fn pause(&mut self) {
            self.0.borrow_mut().pauses += 1;
        }

        fn take_ended(&mut self) -> bool {
            std::mem::take(&mut self.0.borrow_mut().ended)
        }
    }

    /// Backend handing out recording sinks that all share one log.
    #[derive(Default)]
    pub struct RecordingBackend {
        pub log: Rc<RefCell<SinkLog>>,
        pub created: Rc<RefCell<Vec<PathBuf>>>,
    }

    impl MediaBackend for RecordingBackend {
        fn audio_sink(&self, path: &Path) -> Box<dyn AudioSink> {
            self.created.borrow_mut().push(path.to_path_buf());
            Box::new(RecordingSink(Rc::clone(&self.log)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_is_unavailable() {
        let mut sink = NullSink;
        assert!(matches!(sink.play(), Err(AudioError::Unavailable)));
        assert!(!sink.take_ended());
    }

    #[test]
    fn test_volume_is_clamped() {
        assert_eq!(DefaultBackend::new(3.0).volume, 1.0);
        assert_eq!(DefaultBackend::new(-1.0).volume, 0.0);
    }

    #[cfg(feature = "audio")]
    #[test]
    fn test_default_backend_plays_on_device() {
        // Reaching the decoder means the sink is a real device sink, not NullSink
        let backend = DefaultBackend::new(0.5);
        let mut sink = backend.audio_sink(Path::new("/nonexistent/chant.mp3"));
        assert!(matches!(sink.play(), Err(AudioError::NotFound(_))));
    }

    #[test]
    fn test_audio_is_a_default_feature() {
        let manifest = include_str!("../../Cargo.toml");
        assert!(manifest.contains(r#"default = ["audio"]"#));
    }
}
