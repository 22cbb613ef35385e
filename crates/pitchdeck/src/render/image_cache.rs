use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui;

/// Decoded deck images, uploaded as textures on first use. Failed loads are
/// remembered so a missing file is only reported once.
pub struct ImageCache {
    base_path: PathBuf,
    textures: RefCell<HashMap<String, Option<egui::TextureHandle>>>,
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            textures: RefCell::new(HashMap::new()),
        }
    }

    /// Drop every texture, e.g. after the deck was reloaded.
    pub fn clear(&self) {
        self.textures.borrow_mut().clear();
    }

    pub fn set_base_path(&mut self, base_path: PathBuf) {
        if self.base_path != base_path {
            self.base_path = base_path;
            self.clear();
        }
    }

    pub fn get_or_load(&self, ui: &egui::Ui, path: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.borrow().get(path) {
            return cached.clone();
        }
        let texture = match load_color_image(&self.base_path.join(path)) {
            Ok(image) => Some(ui.ctx().load_texture(
                format!("deck://{path}"),
                image,
                egui::TextureOptions::LINEAR,
            )),
            Err(e) => {
                log::warn!("failed to load image {path}: {e}");
                None
            }
        };
        self.textures
            .borrow_mut()
            .insert(path.to_string(), texture.clone());
        texture
    }
}

pub fn load_color_image(path: &Path) -> Result<egui::ColorImage, image::ImageError> {
    let image = image::open(path)?.into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(
        size,
        image.as_flat_samples().as_slice(),
    ))
}
