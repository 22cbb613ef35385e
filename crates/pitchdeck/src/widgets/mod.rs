pub mod audio;
pub mod carousel;

pub use audio::{AudioState, AudioToggle};
pub use carousel::{CarouselError, CarouselTarget, ImageCarousel};
