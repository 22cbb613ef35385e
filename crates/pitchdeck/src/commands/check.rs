use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use rayon::prelude::*;

use crate::content::{self, AssetKind, AssetRef, Deck};
use crate::render::image_cache::load_color_image;

/// One asset that failed to check out.
#[derive(Debug)]
pub struct Problem {
    pub asset: AssetRef,
    pub message: String,
}

pub fn run(file: &Path) -> Result<()> {
    let deck = content::load(file).with_context(|| format!("Invalid deck {}", file.display()))?;
    let assets = deck.assets();
    let problems = check_assets(&deck);

    for problem in &problems {
        let owner = problem.asset.slide.as_deref().unwrap_or("deck");
        println!(
            "  {} [{owner}] {}: {}",
            "\u{2717}".red(),
            problem.asset.path,
            problem.message
        );
    }

    if !problems.is_empty() {
        anyhow::bail!(
            "{} of {} asset(s) in {} have problems",
            problems.len(),
            assets.len(),
            file.display()
        );
    }

    println!(
        "{} {} slide(s), {} asset(s) OK",
        "\u{2713}".green().bold(),
        deck.slide_count(),
        assets.len()
    );
    Ok(())
}

/// Every asset must exist; images must also decode. Images are decoded in
/// parallel since large photos dominate the run time.
pub fn check_assets(deck: &Deck) -> Vec<Problem> {
    deck.assets()
        .into_par_iter()
        .filter_map(|asset| {
            let path = deck.resolve(&asset.path);
            let message = if !path.is_file() {
                Some("file not found".to_string())
            } else if asset.kind == AssetKind::Image {
                load_color_image(&path).err().map(|e| e.to_string())
            } else {
                None
            };
            message.map(|message| {
                log::debug!("asset {} failed: {message}", asset.path);
                Problem { asset, message }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir =
            std::env::temp_dir().join(format!("pitchdeck-check-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const DECK: &str = "logo: logo.png\nslides:\n  - id: media\n    title: Media\n    media:\n      audio: song.mp3\n      gallery:\n        - { image: a.png, title: A }\n        - { image: broken.png, title: B }\n";

    #[test]
    fn test_reports_missing_and_undecodable_assets() {
        let dir = temp_dir("problems");
        image::RgbaImage::new(2, 2).save(dir.join("logo.png")).unwrap();
        image::RgbaImage::new(2, 2).save(dir.join("a.png")).unwrap();
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let deck = content::parse(DECK, &dir).unwrap();
        let mut problems: Vec<_> = check_assets(&deck)
            .into_iter()
            .map(|p| p.asset.path)
            .collect();
        problems.sort();
        assert_eq!(problems, vec!["broken.png", "song.mp3"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_clean_deck_has_no_problems() {
        let dir = temp_dir("clean");
        for name in ["logo.png", "a.png", "broken.png"] {
            image::RgbaImage::new(2, 2).save(dir.join(name)).unwrap();
        }
        std::fs::write(dir.join("song.mp3"), b"").unwrap();

        let deck = content::parse(DECK, &dir).unwrap();
        assert!(check_assets(&deck).is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
