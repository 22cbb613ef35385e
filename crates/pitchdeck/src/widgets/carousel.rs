use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("image {index} does not exist (gallery has {count})")]
    OutOfRange { index: usize, count: usize },
}

/// Part of the open carousel overlay that received a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselTarget {
    Background,
    Panel,
    Previous,
    Next,
    Dot(usize),
    Close,
}

/// Full-screen image viewer over a fixed gallery. Indices wrap in both
/// directions and survive closing and reopening.
#[derive(Debug, Clone)]
pub struct ImageCarousel {
    image_count: usize,
    index: usize,
    open: bool,
}

impl ImageCarousel {
    pub fn new(image_count: usize) -> Self {
        Self {
            image_count,
            index: 0,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn open(&mut self) {
        if self.image_count == 0 {
            return;
        }
        self.open = true;
        log::debug!("carousel opened at image {}", self.index);
    }

    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            log::debug!("carousel closed");
        }
    }

    pub fn next(&mut self) {
        if self.image_count > 0 {
            self.index = (self.index + 1) % self.image_count;
        }
    }

    pub fn previous(&mut self) {
        if self.image_count > 0 {
            self.index = (self.index + self.image_count - 1) % self.image_count;
        }
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), CarouselError> {
        if index >= self.image_count {
            return Err(CarouselError::OutOfRange {
                index,
                count: self.image_count,
            });
        }
        self.index = index;
        Ok(())
    }

    /// Route a click on the open overlay. Only the background and the close
    /// button dismiss it.
    pub fn click(&mut self, target: CarouselTarget) -> Result<(), CarouselError> {
        match target {
            CarouselTarget::Background | CarouselTarget::Close => self.close(),
            CarouselTarget::Panel => {}
            CarouselTarget::Previous => self.previous(),
            CarouselTarget::Next => self.next(),
            CarouselTarget::Dot(index) => self.jump_to(index)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_wraps_round() {
        let mut carousel = ImageCarousel::new(3);
        for _ in 0..3 {
            carousel.next();
        }
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_previous_from_first_goes_to_last() {
        let mut carousel = ImageCarousel::new(3);
        carousel.previous();
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_jump_to() {
        let mut carousel = ImageCarousel::new(3);
        assert!(carousel.jump_to(1).is_ok());
        assert_eq!(carousel.index(), 1);
        assert_eq!(
            carousel.jump_to(3),
            Err(CarouselError::OutOfRange { index: 3, count: 3 })
        );
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_index_survives_reopen() {
        let mut carousel = ImageCarousel::new(3);
        carousel.open();
        carousel.next();
        carousel.close();
        assert!(!carousel.is_open());
        carousel.open();
        assert_eq!(carousel.index(), 1);
    }

    #[test]
    fn test_controls_do_not_close() {
        let mut carousel = ImageCarousel::new(3);
        carousel.open();
        carousel.click(CarouselTarget::Next).unwrap();
        carousel.click(CarouselTarget::Dot(0)).unwrap();
        carousel.click(CarouselTarget::Panel).unwrap();
        assert!(carousel.is_open());
        carousel.click(CarouselTarget::Background).unwrap();
        assert!(!carousel.is_open());
    }

    #[test]
    fn test_empty_gallery_never_opens() {
        let mut carousel = ImageCarousel::new(0);
        carousel.open();
        carousel.next();
        carousel.previous();
        assert!(!carousel.is_open());
        assert_eq!(carousel.index(), 0);
    }
}
