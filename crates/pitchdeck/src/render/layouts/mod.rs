pub mod hero;
pub mod media;
pub mod points;
