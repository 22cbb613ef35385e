pub mod markup;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub use markup::TrustedMarkup;

/// Deck compiled into the binary, used when no file is given.
const BUNDLED_DECK: &str = include_str!("../../decks/pyramids.yaml");

#[derive(Debug, Clone)]
pub struct Deck {
    pub meta: DeckMeta,
    pub slides: Vec<Slide>,
    /// Directory asset paths are resolved against.
    pub base_path: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct DeckMeta {
    pub title: Option<String>,
    pub badge: Option<String>,
    pub footer: Option<String>,
    pub logo: Option<String>,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub background: Option<String>,
    pub body: SlideBody,
}

#[derive(Debug, Clone)]
pub enum SlideBody {
    Hero {
        headline: String,
        subtitle: Option<String>,
    },
    Points(Vec<Point>),
    Media(MediaSpec),
}

#[derive(Debug, Clone)]
pub struct Point {
    pub icon: Icon,
    pub title: String,
    pub summary: String,
    pub detail: TrustedMarkup,
}

#[derive(Debug, Clone, Default)]
pub struct MediaSpec {
    pub audio: Option<String>,
    pub gallery: Vec<GalleryImage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GalleryImage {
    pub image: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Star,
    AlertTriangle,
    Users,
    Clock,
    Trophy,
    MapPin,
    Shield,
    UserPlus,
    Info,
    Music,
    Image,
    Target,
    Ticket,
    Camera,
    School,
    Megaphone,
}

impl Icon {
    /// Glyph drawn for this icon. All of these are covered by egui's bundled
    /// emoji fonts.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Star => "\u{2605}",
            Self::AlertTriangle => "\u{26A0}",
            Self::Users => "\u{1F465}",
            Self::Clock => "\u{1F552}",
            Self::Trophy => "\u{1F3C6}",
            Self::MapPin => "\u{1F4CD}",
            Self::Shield => "\u{1F6E1}",
            Self::UserPlus => "\u{1F464}",
            Self::Info => "\u{2139}",
            Self::Music => "\u{1F3B5}",
            Self::Image => "\u{1F5BC}",
            Self::Target => "\u{1F3AF}",
            Self::Ticket => "\u{1F3AB}",
            Self::Camera => "\u{1F4F7}",
            Self::School => "\u{1F3EB}",
            Self::Megaphone => "\u{1F4E3}",
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid deck: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("deck has no slides")]
    Empty,
    #[error("slide {index} has an empty id")]
    EmptyId { index: usize },
    #[error("duplicate slide id `{0}`")]
    DuplicateId(String),
    #[error("slide `{id}` must define exactly one of `hero`, `points` or `media`")]
    AmbiguousBody { id: String },
    #[error("slide `{id}` has an empty point list")]
    NoPoints { id: String },
    #[error("media slide `{id}` needs an audio track or at least one gallery image")]
    EmptyMedia { id: String },
}

/// Kind of asset a deck refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Audio,
}

/// One asset reference, with the slide that owns it (`None` for deck-level
/// assets such as the logo).
#[derive(Debug, Clone)]
pub struct AssetRef {
    pub slide: Option<String>,
    pub kind: AssetKind,
    pub path: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDeck {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    badge: Option<String>,
    #[serde(default)]
    footer: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    direction: Direction,
    #[serde(default)]
    slides: Vec<RawSlide>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSlide {
    id: String,
    title: String,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    hero: Option<RawHero>,
    #[serde(default)]
    points: Option<Vec<RawPoint>>,
    #[serde(default)]
    media: Option<RawMedia>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHero {
    headline: String,
    #[serde(default)]
    subtitle: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPoint {
    icon: Icon,
    title: String,
    summary: String,
    #[serde(default)]
    detail: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMedia {
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    gallery: Vec<GalleryImage>,
}

/// Read and validate a deck file. Asset paths resolve against its directory.
pub fn load(path: &Path) -> Result<Deck, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_path = path.parent().unwrap_or(Path::new("."));
    let deck = parse(&content, base_path)?;
    log::info!(
        "Loaded deck {} ({} slides)",
        path.display(),
        deck.slide_count()
    );
    Ok(deck)
}

/// The deck compiled into the binary. Assets resolve against `base_path`.
pub fn bundled(base_path: &Path) -> Result<Deck, ContentError> {
    parse(BUNDLED_DECK, base_path)
}

pub fn parse(content: &str, base_path: &Path) -> Result<Deck, ContentError> {
    let raw: RawDeck = serde_yaml::from_str(content)?;
    if raw.slides.is_empty() {
        return Err(ContentError::Empty);
    }

    let mut seen = HashSet::new();
    let slides = raw
        .slides
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let id = raw.id.trim().to_string();
            if id.is_empty() {
                return Err(ContentError::EmptyId { index });
            }
            if !seen.insert(id.clone()) {
                return Err(ContentError::DuplicateId(id));
            }
            let body = classify_body(&id, raw.hero, raw.points, raw.media)?;
            Ok(Slide {
                id,
                title: raw.title,
                background: raw.background,
                body,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Deck {
        meta: DeckMeta {
            title: raw.title,
            badge: raw.badge,
            footer: raw.footer,
            logo: raw.logo,
            direction: raw.direction,
        },
        slides,
        base_path: base_path.to_path_buf(),
    })
}

fn classify_body(
    id: &str,
    hero: Option<RawHero>,
    points: Option<Vec<RawPoint>>,
    media: Option<RawMedia>,
) -> Result<SlideBody, ContentError> {
    match (hero, points, media) {
        (Some(hero), None, None) => Ok(SlideBody::Hero {
            headline: hero.headline,
            subtitle: hero.subtitle,
        }),
        (None, Some(points), None) => {
            if points.is_empty() {
                return Err(ContentError::NoPoints { id: id.to_string() });
            }
            Ok(SlideBody::Points(
                points
                    .into_iter()
                    .map(|p| Point {
                        icon: p.icon,
                        title: p.title,
                        summary: p.summary,
                        detail: TrustedMarkup::from_provider(p.detail),
                    })
                    .collect(),
            ))
        }
        (None, None, Some(media)) => {
            if media.audio.is_none() && media.gallery.is_empty() {
                return Err(ContentError::EmptyMedia { id: id.to_string() });
            }
            Ok(SlideBody::Media(MediaSpec {
                audio: media.audio,
                gallery: media.gallery,
            }))
        }
        _ => Err(ContentError::AmbiguousBody { id: id.to_string() }),
    }
}

impl Deck {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn display_title(&self) -> String {
        self.meta
            .title
            .clone()
            .unwrap_or_else(|| "pitchdeck".to_string())
    }

    /// Absolute (or base-relative) path for an asset named in the deck.
    pub fn resolve(&self, asset: &str) -> PathBuf {
        self.base_path.join(asset)
    }

    pub fn assets(&self) -> Vec<AssetRef> {
        let mut assets = Vec::new();
        if let Some(logo) = &self.meta.logo {
            assets.push(AssetRef {
                slide: None,
                kind: AssetKind::Image,
                path: logo.clone(),
            });
        }
        for slide in &self.slides {
            let owner = Some(slide.id.clone());
            if let Some(bg) = &slide.background {
                assets.push(AssetRef {
                    slide: owner.clone(),
                    kind: AssetKind::Image,
                    path: bg.clone(),
                });
            }
            if let SlideBody::Media(media) = &slide.body {
                if let Some(audio) = &media.audio {
                    assets.push(AssetRef {
                        slide: owner.clone(),
                        kind: AssetKind::Audio,
                        path: audio.clone(),
                    });
                }
                for image in &media.gallery {
                    assets.push(AssetRef {
                        slide: owner.clone(),
                        kind: AssetKind::Image,
                        path: image.image.clone(),
                    });
                }
            }
        }
        assets
    }
}

impl Slide {
    pub fn points(&self) -> &[Point] {
        match &self.body {
            SlideBody::Points(points) => points,
            _ => &[],
        }
    }

    pub fn media(&self) -> Option<&MediaSpec> {
        match &self.body {
            SlideBody::Media(media) => Some(media),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_deck(slide_count: usize) -> Deck {
    let mut yaml = String::from("title: Test deck\nslides:\n");
    for i in 0..slide_count {
        yaml.push_str(&format!(
            "  - id: s{i}\n    title: Slide {i}\n    points:\n      - {{ icon: star, title: A{i}, summary: first, detail: \"<p>a</p>\" }}\n      - {{ icon: users, title: B{i}, summary: second, detail: \"<p>b</p>\" }}\n      - {{ icon: trophy, title: C{i}, summary: third, detail: \"<p>c</p>\" }}\n"
        ));
    }
    parse(&yaml, Path::new(".")).expect("test deck parses")
}
