use crate::content::TrustedMarkup;

#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open {
        title: String,
        body: TrustedMarkup,
    },
}

/// Part of the open overlay that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalTarget {
    Background,
    Panel,
    CloseButton,
}

/// The single optional overlay. Title and body only exist while open.
#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ModalState::Open { .. })
    }

    pub fn title(&self) -> Option<&str> {
        match &self.state {
            ModalState::Open { title, .. } => Some(title),
            ModalState::Closed => None,
        }
    }

    pub fn body(&self) -> Option<&TrustedMarkup> {
        match &self.state {
            ModalState::Open { body, .. } => Some(body),
            ModalState::Closed => None,
        }
    }

    /// Opening while already open replaces the content.
    pub fn open(&mut self, title: impl Into<String>, body: TrustedMarkup) {
        let title = title.into();
        if self.is_open() {
            log::debug!("modal content replaced with `{title}`");
        } else {
            log::debug!("modal opened: `{title}`");
        }
        self.state = ModalState::Open { title, body };
    }

    /// Returns whether anything was closed.
    pub fn close(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ModalState::Closed;
        log::debug!("modal closed");
        true
    }

    /// Route a click on the overlay. Panel clicks are swallowed.
    pub fn click(&mut self, target: ModalTarget) -> bool {
        match target {
            ModalTarget::Background | ModalTarget::CloseButton => self.close(),
            ModalTarget::Panel => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markup(html: &str) -> TrustedMarkup {
        TrustedMarkup::from_provider(html)
    }

    #[test]
    fn test_open_then_close_drops_content() {
        let mut modal = ModalController::new();
        modal.open("X", markup("<p>Y</p>"));
        assert_eq!(modal.title(), Some("X"));
        assert_eq!(modal.body().map(|b| b.as_str()), Some("<p>Y</p>"));
        assert!(modal.close());
        assert!(!modal.is_open());
        assert_eq!(modal.title(), None);
        assert!(modal.body().is_none());
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut modal = ModalController::new();
        assert!(!modal.close());
        assert!(matches!(modal.state(), ModalState::Closed));
    }

    #[test]
    fn test_open_while_open_replaces() {
        let mut modal = ModalController::new();
        modal.open("First", markup("<p>one</p>"));
        modal.open("Second", markup("<p>two</p>"));
        assert_eq!(modal.title(), Some("Second"));
        assert_eq!(modal.body().map(|b| b.plain_text()), Some("two".into()));
    }

    #[test]
    fn test_panel_click_keeps_modal_open() {
        let mut modal = ModalController::new();
        modal.open("X", markup("<p>Y</p>"));
        assert!(!modal.click(ModalTarget::Panel));
        assert!(modal.is_open());
        assert!(modal.click(ModalTarget::Background));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_close_button() {
        let mut modal = ModalController::new();
        modal.open("X", markup("<p>Y</p>"));
        assert!(modal.click(ModalTarget::CloseButton));
        assert!(!modal.is_open());
    }
}
