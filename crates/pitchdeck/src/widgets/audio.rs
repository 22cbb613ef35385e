use crate::audio::{AudioError, AudioSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioState {
    /// Panel not revealed yet.
    Hidden,
    Paused,
    Playing,
}

impl AudioState {
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Play/pause control for one track. The first toggle reveals the panel and
/// starts playback in the same step.
pub struct AudioToggle {
    sink: Box<dyn AudioSink>,
    state: AudioState,
    last_error: Option<String>,
}

impl AudioToggle {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            state: AudioState::Hidden,
            last_error: None,
        }
    }

    pub fn state(&self) -> AudioState {
        self.state
    }

    /// Message from the last failed play, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// A failed play leaves the panel visible and paused.
    pub fn toggle(&mut self) -> Result<AudioState, AudioError> {
        match self.state {
            AudioState::Hidden | AudioState::Paused => match self.sink.play() {
                Ok(()) => {
                    self.state = AudioState::Playing;
                    self.last_error = None;
                    log::debug!("audio playing");
                }
                Err(e) => {
                    self.state = AudioState::Paused;
                    self.last_error = Some(e.to_string());
                    log::warn!("audio playback failed: {e}");
                    return Err(e);
                }
            },
            AudioState::Playing => {
                self.sink.pause();
                self.state = AudioState::Paused;
                log::debug!("audio paused");
            }
        }
        Ok(self.state)
    }

    /// Picks up an end-of-track from the sink. Returns whether the state
    /// changed.
    pub fn poll(&mut self) -> bool {
        if self.sink.take_ended() && self.state == AudioState::Playing {
            self.state = AudioState::Paused;
            log::debug!("audio track ended");
            return true;
        }
        false
    }

    /// Stop playback when the owning slide goes away.
    pub fn stop(&mut self) {
        if self.state == AudioState::Playing {
            self.sink.pause();
            self.state = AudioState::Paused;
        }
    }
}

impl Drop for AudioToggle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::testing::{RecordingSink, SinkLog};

    fn toggle() -> (AudioToggle, Rc<RefCell<SinkLog>>) {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        (
            AudioToggle::new(Box::new(RecordingSink(Rc::clone(&log)))),
            log,
        )
    }

    #[test]
    fn test_first_toggle_reveals_and_plays() {
        let (mut audio, log) = toggle();
        assert!(!audio.state().is_visible());
        assert_eq!(audio.toggle().unwrap(), AudioState::Playing);
        assert_eq!(log.borrow().plays, 1);
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let (mut audio, log) = toggle();
        audio.toggle().unwrap();
        assert_eq!(audio.toggle().unwrap(), AudioState::Paused);
        assert_eq!(audio.toggle().unwrap(), AudioState::Playing);
        assert_eq!(log.borrow().plays, 2);
        assert_eq!(log.borrow().pauses, 1);
    }

    #[test]
    fn test_track_end_pauses() {
        let (mut audio, log) = toggle();
        audio.toggle().unwrap();
        log.borrow_mut().ended = true;
        assert!(audio.poll());
        assert_eq!(audio.state(), AudioState::Paused);
        assert!(!audio.poll());
    }

    #[test]
    fn test_failed_play_stays_visible_and_paused() {
        let (mut audio, log) = toggle();
        log.borrow_mut().fail_next_play = true;
        assert!(matches!(audio.toggle(), Err(AudioError::NotFound(_))));
        assert_eq!(audio.state(), AudioState::Paused);
        assert!(audio.state().is_visible());
        assert!(audio.last_error().is_some());

        assert_eq!(audio.toggle().unwrap(), AudioState::Playing);
        assert!(audio.last_error().is_none());
    }

    #[test]
    fn test_drop_pauses_playback() {
        let (mut audio, log) = toggle();
        audio.toggle().unwrap();
        drop(audio);
        assert_eq!(log.borrow().pauses, 1);
    }
}
