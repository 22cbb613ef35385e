use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub heading_color: Color32,
    pub accent: Color32,
    /// Highlight used for the selected point and the badge.
    pub gold: Color32,
    pub panel: Color32,
    pub panel_border: Color32,
    /// Backdrop behind the modal and the carousel.
    pub scrim: Color32,
    pub muted: Color32,
    pub title_size: f32,
    pub heading_size: f32,
    pub subheading_size: f32,
    pub body_size: f32,
    pub small_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::from_rgb(0x0A, 0x16, 0x2C),
            foreground: Color32::from_rgb(0xD6, 0xE2, 0xF2),
            heading_color: Color32::WHITE,
            accent: Color32::from_rgb(0x3C, 0x8D, 0xE8),
            gold: Color32::from_rgb(0xE8, 0xB9, 0x3C),
            panel: Color32::from_rgb(0x12, 0x25, 0x45),
            panel_border: Color32::from_rgb(0x24, 0x42, 0x6E),
            scrim: Color32::from_rgba_unmultiplied(0x02, 0x08, 0x14, 0xC8),
            muted: Color32::from_rgb(0x7F, 0x93, 0xB0),
            title_size: 84.0,
            heading_size: 56.0,
            subheading_size: 34.0,
            body_size: 26.0,
            small_size: 18.0,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::from_rgb(0xF3, 0xF7, 0xFC),
            foreground: Color32::from_rgb(0x1B, 0x2A, 0x41),
            heading_color: Color32::from_rgb(0x0B, 0x2A, 0x5B),
            accent: Color32::from_rgb(0x00, 0x4B, 0xA0),
            gold: Color32::from_rgb(0xC8, 0x93, 0x10),
            panel: Color32::WHITE,
            panel_border: Color32::from_rgb(0xC9, 0xD8, 0xEC),
            scrim: Color32::from_rgba_unmultiplied(0x06, 0x14, 0x2A, 0xB4),
            muted: Color32::from_rgb(0x5E, 0x6F, 0x88),
            title_size: 84.0,
            heading_size: 56.0,
            subheading_size: 34.0,
            body_size: 26.0,
            small_size: 18.0,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        let alpha = opacity.clamp(0.0, 1.0) * a as f32;
        Color32::from_rgba_unmultiplied(r, g, b, alpha as u8)
    }

    /// Text drawn on top of the accent colour.
    pub fn on_accent(&self) -> Color32 {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_falls_back_to_light() {
        assert_eq!(Theme::from_name("dark").name, "dark");
        assert_eq!(Theme::from_name("sepia").name, "light");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Theme::light().toggled().name, "dark");
        assert_eq!(Theme::dark().toggled().name, "light");
    }

    #[test]
    fn test_with_opacity_scales_alpha() {
        let c = Theme::with_opacity(Color32::from_rgb(10, 20, 30), 0.5);
        assert_eq!(c.a(), 127);
        assert_eq!(Theme::with_opacity(Color32::WHITE, 2.0).a(), 255);
    }
}
