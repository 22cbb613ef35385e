use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::content::{self, Deck, SlideBody};

pub fn run(file: Option<&Path>) -> Result<()> {
    let deck = match file {
        Some(file) => {
            content::load(file).with_context(|| format!("Invalid deck {}", file.display()))?
        }
        None => content::bundled(Path::new(".")).context("Bundled deck is invalid")?,
    };
    print!("{}", outline(&deck));
    Ok(())
}

/// Numbered slide list with each slide's points or media underneath.
pub fn outline(deck: &Deck) -> String {
    let mut out = format!("{}\n", deck.display_title().bold());
    let width = deck.slide_count().to_string().len();
    for (i, slide) in deck.slides.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}. {} {}\n",
            i + 1,
            slide.title,
            format!("({})", slide.id).dimmed()
        ));
        let indent = " ".repeat(width + 2);
        match &slide.body {
            SlideBody::Hero { headline, .. } => {
                out.push_str(&format!("{indent}{headline}\n"));
            }
            SlideBody::Points(points) => {
                for point in points {
                    out.push_str(&format!(
                        "{indent}{} {}: {}\n",
                        point.icon.glyph(),
                        point.title,
                        point.summary
                    ));
                }
            }
            SlideBody::Media(media) => {
                if let Some(audio) = &media.audio {
                    out.push_str(&format!("{indent}audio: {audio}\n"));
                }
                for image in &media.gallery {
                    out.push_str(&format!("{indent}image: {} ({})\n", image.title, image.image));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_lists_every_slide_and_point() {
        colored::control::set_override(false);
        let deck = content::test_deck(2);
        let text = outline(&deck);
        assert!(text.starts_with("Test deck\n"));
        assert!(text.contains("1. Slide 0 (s0)"));
        assert!(text.contains("2. Slide 1 (s1)"));
        assert!(text.contains("B1: second"));
        assert_eq!(text.lines().count(), 1 + 2 * 4);
    }
}
