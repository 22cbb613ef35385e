use std::time::Duration;

use thiserror::Error;

use crate::audio::{AudioError, MediaBackend};
use crate::clock::{Clock, SystemClock};
use crate::content::{Deck, Slide};
use crate::input::{Command, Key, Keymap};
use crate::modal::{ModalController, ModalTarget};
use crate::navigator::{NavOutcome, SlideNavigator};
use crate::selector::{PointSelector, SelectError};
use crate::widgets::{AudioState, AudioToggle, CarouselError, CarouselTarget, ImageCarousel};

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Carousel(#[from] CarouselError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error("presentation is not mounted")]
    NotMounted,
    #[error("slide `{slide}` has no {widget}")]
    NoWidget { slide: String, widget: &'static str },
}

/// Something the user clicked, as resolved by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    PreviousSlide,
    NextSlide,
    /// Position dot for a slide.
    Indicator(usize),
    /// Summary entry of a point on the current slide.
    Point(usize),
    /// Details button of a point; opens the modal.
    PointDetails(usize),
    Modal(ModalTarget),
    AudioToggle,
    GalleryOpen,
    Carousel(CarouselTarget),
}

/// Per-slide state, rebuilt every time a slide is mounted.
pub struct SlideView {
    selector: PointSelector,
    audio: Option<AudioToggle>,
    carousel: Option<ImageCarousel>,
}

impl SlideView {
    fn mount(deck: &Deck, slide: &Slide, backend: &dyn MediaBackend) -> Self {
        let media = slide.media();
        Self {
            selector: PointSelector::new(slide.points().len()),
            audio: media
                .and_then(|m| m.audio.as_deref())
                .map(|path| AudioToggle::new(backend.audio_sink(&deck.resolve(path)))),
            carousel: media
                .filter(|m| !m.gallery.is_empty())
                .map(|m| ImageCarousel::new(m.gallery.len())),
        }
    }

    pub fn selected_point(&self) -> usize {
        self.selector.selected()
    }

    pub fn audio(&self) -> Option<&AudioToggle> {
        self.audio.as_ref()
    }

    pub fn carousel(&self) -> Option<&ImageCarousel> {
        self.carousel.as_ref()
    }
}

/// Top-level composition: owns the deck, the navigator, the modal and the
/// mounted slide view, and routes keyboard and pointer input to them.
///
/// Keyboard input is only accepted between [`mount`](Self::mount) and
/// [`unmount`](Self::unmount).
pub struct PresentationShell<C: Clock = SystemClock> {
    deck: Deck,
    navigator: SlideNavigator<C>,
    modal: ModalController,
    view: Option<SlideView>,
    keymap: Keymap,
    backend: Box<dyn MediaBackend>,
}

impl<C: Clock> PresentationShell<C> {
    pub fn new(deck: Deck, clock: C, window: Duration, backend: Box<dyn MediaBackend>) -> Self {
        let navigator = SlideNavigator::new(clock, deck.slide_count(), window);
        Self {
            deck,
            navigator,
            modal: ModalController::new(),
            view: None,
            keymap: Keymap::default(),
            backend,
        }
    }

    /// Start on `index` (0-based, clamped). Takes effect on the next mount
    /// when not yet mounted.
    pub fn start_at(&mut self, index: usize) {
        self.navigator.start_at(index);
        if self.view.is_some() {
            self.remount_view();
        }
    }

    pub fn mount(&mut self) {
        if self.view.is_some() {
            return;
        }
        self.remount_view();
        log::debug!("presentation mounted, keyboard attached");
    }

    /// Drop the slide view and modal, detach the keyboard and release the
    /// navigation lock.
    pub fn unmount(&mut self) {
        if self.view.take().is_none() {
            return;
        }
        self.modal.close();
        self.navigator.cancel();
        log::debug!("presentation unmounted, keyboard detached");
    }

    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    fn remount_view(&mut self) {
        let index = self.navigator.current_index();
        // Drop the old view first so its audio stops before the next one exists.
        self.view = None;
        if let Some(slide) = self.deck.slide(index) {
            self.view = Some(SlideView::mount(&self.deck, slide, self.backend.as_ref()));
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn slide_count(&self) -> usize {
        self.deck.slide_count()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.current_index()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.deck.slide(self.current_index())
    }

    pub fn view(&self) -> Option<&SlideView> {
        self.view.as_ref()
    }

    pub fn selected_point(&self) -> Option<usize> {
        self.view.as_ref().map(SlideView::selected_point)
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    pub fn audio_state(&self) -> Option<AudioState> {
        self.view
            .as_ref()
            .and_then(|v| v.audio.as_ref())
            .map(AudioToggle::state)
    }

    pub fn carousel(&self) -> Option<&ImageCarousel> {
        self.view.as_ref().and_then(|v| v.carousel.as_ref())
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn can_go_previous(&self) -> bool {
        self.navigator.can_go_previous()
    }

    pub fn can_go_next(&self) -> bool {
        self.navigator.can_go_next()
    }

    pub fn is_transitioning(&mut self) -> bool {
        self.navigator.is_transitioning()
    }

    pub fn settle_progress(&self) -> f32 {
        self.navigator.settle_progress()
    }

    pub fn go_to(&mut self, target: isize) -> NavOutcome {
        let outcome = self.navigator.go_to(target);
        if outcome.moved() && self.view.is_some() {
            self.remount_view();
        }
        outcome
    }

    pub fn next(&mut self) -> NavOutcome {
        self.go_to(self.current_index() as isize + 1)
    }

    pub fn previous(&mut self) -> NavOutcome {
        self.go_to(self.current_index() as isize - 1)
    }

    /// Route a key press. Returns whether the key was bound to something.
    /// Ignored while unmounted.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if self.view.is_none() {
            return false;
        }
        let Some(command) = self.keymap.command(key) else {
            return false;
        };
        match command {
            Command::NextSlide => {
                self.next();
            }
            Command::PreviousSlide => {
                self.previous();
            }
            Command::Cancel => {
                self.modal.close();
            }
        }
        true
    }

    pub fn handle_pointer(&mut self, target: PointerTarget) -> Result<(), ShellError> {
        if self.view.is_none() {
            return Err(ShellError::NotMounted);
        }
        match target {
            PointerTarget::PreviousSlide => {
                self.previous();
            }
            PointerTarget::NextSlide => {
                self.next();
            }
            PointerTarget::Indicator(index) => {
                self.go_to(index as isize);
            }
            PointerTarget::Point(index) => {
                self.view_mut()?.selector.select(index)?;
            }
            PointerTarget::PointDetails(index) => self.open_point_details(index)?,
            PointerTarget::Modal(target) => {
                self.modal.click(target);
            }
            PointerTarget::AudioToggle => {
                self.widget_slide_check("audio track", |v| v.audio.is_some())?;
                if let Some(audio) = self.view_mut()?.audio.as_mut() {
                    audio.toggle()?;
                }
            }
            PointerTarget::GalleryOpen => {
                self.widget_slide_check("gallery", |v| v.carousel.is_some())?;
                if let Some(carousel) = self.view_mut()?.carousel.as_mut() {
                    carousel.open();
                }
            }
            PointerTarget::Carousel(target) => {
                self.widget_slide_check("gallery", |v| v.carousel.is_some())?;
                if let Some(carousel) = self.view_mut()?.carousel.as_mut() {
                    carousel.click(target)?;
                }
            }
        }
        Ok(())
    }

    /// Open the modal with a point's title and detail markup.
    pub fn open_point_details(&mut self, index: usize) -> Result<(), ShellError> {
        let slide = self.current_slide().ok_or(ShellError::NotMounted)?;
        let points = slide.points();
        let point = points.get(index).ok_or(SelectError::InvalidIndex {
            index,
            count: points.len(),
        })?;
        let (title, body) = (point.title.clone(), point.detail.clone());
        self.modal.open(title, body);
        Ok(())
    }

    /// Per-frame housekeeping. Returns whether visible state changed.
    pub fn poll(&mut self) -> bool {
        self.view
            .as_mut()
            .and_then(|v| v.audio.as_mut())
            .is_some_and(AudioToggle::poll)
    }

    /// Swap in a reloaded deck, keeping the current position where possible.
    pub fn replace_deck(&mut self, deck: Deck) {
        self.navigator.set_slide_count(deck.slide_count());
        self.deck = deck;
        if self.view.is_some() {
            self.remount_view();
        }
        log::info!(
            "deck replaced ({} slides, now on {})",
            self.deck.slide_count(),
            self.current_index() + 1
        );
    }

    fn view_mut(&mut self) -> Result<&mut SlideView, ShellError> {
        self.view.as_mut().ok_or(ShellError::NotMounted)
    }

    fn widget_slide_check(
        &self,
        widget: &'static str,
        has: impl Fn(&SlideView) -> bool,
    ) -> Result<(), ShellError> {
        match &self.view {
            Some(view) if has(view) => Ok(()),
            Some(_) => Err(ShellError::NoWidget {
                slide: self
                    .current_slide()
                    .map(|s| s.id.clone())
                    .unwrap_or_default(),
                widget,
            }),
            None => Err(ShellError::NotMounted),
        }
    }
}

impl<C: Clock> Drop for PresentationShell<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::audio::testing::RecordingBackend;
    use crate::clock::ManualClock;
    use crate::content::{self, TrustedMarkup};
    use crate::modal::ModalState;
    use crate::navigator::DEFAULT_TRANSITION;

    fn shell(deck: Deck) -> (PresentationShell<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut shell = PresentationShell::new(
            deck,
            clock.clone(),
            DEFAULT_TRANSITION,
            Box::new(RecordingBackend::default()),
        );
        shell.mount();
        (shell, clock)
    }

    fn media_deck() -> Deck {
        let yaml = "slides:\n  - id: intro\n    title: Intro\n    hero: { headline: Hi }\n  - id: chants\n    title: Chants\n    media:\n      audio: song.mp3\n      gallery:\n        - { image: a.png, title: A }\n        - { image: b.png, title: B }\n        - { image: c.png, title: C }\n";
        content::parse(yaml, Path::new("/deck")).unwrap()
    }

    #[test]
    fn test_fifteen_slide_navigation() {
        let (mut shell, clock) = shell(content::test_deck(15));
        assert_eq!(shell.go_to(20), NavOutcome::Moved { from: 0, to: 14 });
        assert_eq!(shell.current_index(), 14);

        clock.advance(DEFAULT_TRANSITION);
        assert!(shell.handle_key(Key::ArrowDown));
        assert_eq!(shell.current_index(), 14);
        assert!(!shell.can_go_next());
    }

    #[test]
    fn test_keys_navigate_with_debounce() {
        let (mut shell, clock) = shell(content::test_deck(5));
        shell.handle_key(Key::char('n'));
        shell.handle_key(Key::char('n'));
        assert_eq!(shell.current_index(), 1);

        clock.advance(Duration::from_millis(1000));
        shell.handle_key(Key::ArrowDown);
        assert_eq!(shell.current_index(), 2);

        clock.advance(Duration::from_millis(1000));
        shell.handle_key(Key::char('P'));
        assert_eq!(shell.current_index(), 1);
    }

    #[test]
    fn test_escape_without_modal_changes_nothing() {
        let (mut shell, _clock) = shell(content::test_deck(15));
        shell.handle_pointer(PointerTarget::Point(2)).unwrap();
        assert!(shell.handle_key(Key::Escape));
        assert_eq!(shell.current_index(), 0);
        assert_eq!(shell.selected_point(), Some(2));
        assert!(matches!(shell.modal().state(), ModalState::Closed));
    }

    #[test]
    fn test_modal_background_close_then_reopen() {
        let (mut shell, _clock) = shell(content::test_deck(3));
        shell
            .modal
            .open("X", TrustedMarkup::from_provider("<p>Y</p>"));
        shell
            .handle_pointer(PointerTarget::Modal(ModalTarget::Panel))
            .unwrap();
        assert!(shell.modal().is_open());

        shell
            .handle_pointer(PointerTarget::Modal(ModalTarget::Background))
            .unwrap();
        assert!(!shell.modal().is_open());
        assert!(shell.modal().title().is_none());

        shell.handle_pointer(PointerTarget::PointDetails(1)).unwrap();
        assert_eq!(shell.modal().title(), Some("B0"));
        assert_eq!(
            shell.modal().body().map(|b| b.plain_text()),
            Some("b".to_string())
        );
    }

    #[test]
    fn test_escape_closes_modal() {
        let (mut shell, _clock) = shell(content::test_deck(3));
        shell.handle_pointer(PointerTarget::PointDetails(0)).unwrap();
        shell.handle_key(Key::Escape);
        assert!(!shell.modal().is_open());
    }

    #[test]
    fn test_selection_resets_on_remount() {
        let (mut shell, clock) = shell(content::test_deck(3));
        shell.handle_pointer(PointerTarget::Point(2)).unwrap();
        assert_eq!(shell.selected_point(), Some(2));

        shell.handle_pointer(PointerTarget::NextSlide).unwrap();
        assert_eq!(shell.selected_point(), Some(0));

        clock.advance(DEFAULT_TRANSITION);
        shell.handle_pointer(PointerTarget::Point(1)).unwrap();
        shell.handle_pointer(PointerTarget::PreviousSlide).unwrap();
        assert_eq!(shell.current_index(), 0);
        assert_eq!(shell.selected_point(), Some(0));
    }

    #[test]
    fn test_invalid_point_is_an_error() {
        let (mut shell, _clock) = shell(content::test_deck(2));
        let err = shell.handle_pointer(PointerTarget::Point(7)).unwrap_err();
        assert!(matches!(
            err,
            ShellError::Select(SelectError::InvalidIndex { index: 7, count: 3 })
        ));
        assert_eq!(shell.selected_point(), Some(0));
        assert!(shell.handle_pointer(PointerTarget::PointDetails(3)).is_err());
        assert!(!shell.modal().is_open());
    }

    #[test]
    fn test_indicator_jumps() {
        let (mut shell, _clock) = shell(content::test_deck(6));
        shell.handle_pointer(PointerTarget::Indicator(4)).unwrap();
        assert_eq!(shell.current_index(), 4);
    }

    #[test]
    fn test_keyboard_detached_when_unmounted() {
        let (mut shell, _clock) = shell(content::test_deck(4));
        shell.handle_pointer(PointerTarget::PointDetails(0)).unwrap();
        shell.unmount();
        assert!(!shell.is_mounted());
        assert!(!shell.modal().is_open());
        assert!(!shell.handle_key(Key::ArrowDown));
        assert_eq!(shell.current_index(), 0);
        assert!(matches!(
            shell.handle_pointer(PointerTarget::NextSlide),
            Err(ShellError::NotMounted)
        ));

        shell.mount();
        assert!(shell.handle_key(Key::ArrowDown));
        assert_eq!(shell.current_index(), 1);
    }

    #[test]
    fn test_unmount_releases_lock() {
        let (mut shell, _clock) = shell(content::test_deck(4));
        shell.next();
        assert!(shell.is_transitioning());
        shell.unmount();
        assert!(!shell.is_transitioning());
    }

    #[test]
    fn test_media_widgets() {
        let (mut shell, _clock) = shell(media_deck());
        assert!(matches!(
            shell.handle_pointer(PointerTarget::AudioToggle),
            Err(ShellError::NoWidget { .. })
        ));
        assert_eq!(shell.audio_state(), None);

        shell.next();
        assert_eq!(shell.audio_state(), Some(AudioState::Hidden));
        shell.handle_pointer(PointerTarget::AudioToggle).unwrap();
        assert_eq!(shell.audio_state(), Some(AudioState::Playing));

        shell.handle_pointer(PointerTarget::GalleryOpen).unwrap();
        shell
            .handle_pointer(PointerTarget::Carousel(CarouselTarget::Previous))
            .unwrap();
        let carousel = shell.carousel().unwrap();
        assert!(carousel.is_open());
        assert_eq!(carousel.index(), 2);

        assert!(
            shell
                .handle_pointer(PointerTarget::Carousel(CarouselTarget::Dot(3)))
                .is_err()
        );
        shell
            .handle_pointer(PointerTarget::Carousel(CarouselTarget::Background))
            .unwrap();
        assert!(!shell.carousel().unwrap().is_open());
    }

    #[test]
    fn test_audio_sink_resolves_against_deck() {
        let backend = RecordingBackend::default();
        let created = std::rc::Rc::clone(&backend.created);
        let clock = ManualClock::new();
        let mut shell =
            PresentationShell::new(media_deck(), clock, DEFAULT_TRANSITION, Box::new(backend));
        shell.start_at(1);
        shell.mount();
        assert_eq!(shell.current_index(), 1);
        assert!(!shell.is_transitioning());
        assert_eq!(shell.audio_state(), Some(AudioState::Hidden));
        assert_eq!(
            created.borrow().as_slice(),
            [std::path::PathBuf::from("/deck/song.mp3")]
        );
    }

    #[test]
    fn test_track_end_reported_by_poll() {
        let clock = ManualClock::new();
        let backend = RecordingBackend::default();
        let log = std::rc::Rc::clone(&backend.log);
        let mut shell =
            PresentationShell::new(media_deck(), clock, DEFAULT_TRANSITION, Box::new(backend));
        shell.start_at(1);
        shell.mount();
        shell.handle_pointer(PointerTarget::AudioToggle).unwrap();
        assert!(!shell.poll());

        log.borrow_mut().ended = true;
        assert!(shell.poll());
        assert_eq!(shell.audio_state(), Some(AudioState::Paused));
    }

    #[test]
    fn test_leaving_media_slide_stops_audio() {
        let clock = ManualClock::new();
        let backend = RecordingBackend::default();
        let log = std::rc::Rc::clone(&backend.log);
        let mut shell = PresentationShell::new(
            media_deck(),
            clock.clone(),
            DEFAULT_TRANSITION,
            Box::new(backend),
        );
        shell.start_at(1);
        shell.mount();
        shell.handle_pointer(PointerTarget::AudioToggle).unwrap();

        shell.previous();
        assert_eq!(log.borrow().pauses, 1);
        assert_eq!(shell.audio_state(), None);
    }

    #[test]
    fn test_replace_deck_clamps() {
        let (mut shell, _clock) = shell(content::test_deck(10));
        shell.go_to(8);
        shell.handle_pointer(PointerTarget::Point(1)).unwrap();
        shell.replace_deck(content::test_deck(4));
        assert_eq!(shell.current_index(), 3);
        assert_eq!(shell.selected_point(), Some(0));
        assert_eq!(shell.slide_count(), 4);
    }
}
