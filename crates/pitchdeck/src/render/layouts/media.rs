use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::content::{MediaSpec, Slide};
use crate::render::{self, RenderCtx};
use crate::shell::{PointerTarget, SlideView};
use crate::theme::Theme;
use crate::widgets::{AudioState, CarouselTarget};

/// Media slide: an audio toggle and a gallery launcher side by side, the
/// revealed audio panel below them, and a thumbnail strip at the bottom.
#[allow(clippy::too_many_arguments)]
pub fn render(
    ui: &egui::Ui,
    slide: &Slide,
    media: &MediaSpec,
    view: &SlideView,
    cx: &RenderCtx,
    rect: egui::Rect,
    opacity: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let enabled = opacity > 0.5;
    let mut y = render::draw_slide_title(
        ui,
        &slide.title,
        cx,
        rect,
        rect.top() + 150.0 * scale,
        opacity,
    );
    y += 64.0 * scale;

    // Launch buttons
    let button_size = egui::vec2(380.0, 120.0) * scale;
    let gap = 48.0 * scale;
    let row_w = button_size.x * 2.0 + gap;
    let left = rect.center().x - row_w / 2.0;
    let first = egui::Rect::from_min_size(Pos2::new(left, y), button_size);
    let second = egui::Rect::from_min_size(Pos2::new(left + button_size.x + gap, y), button_size);
    let (audio_rect, gallery_rect) = if cx.is_rtl() {
        (second, first)
    } else {
        (first, second)
    };

    let audio = view.audio();
    let has_gallery = view.carousel().is_some_and(|c| c.image_count() > 0);
    let font = theme.subheading_size * scale;
    if render::button(
        ui,
        egui::Id::new(("media-audio", &slide.id)),
        audio_rect,
        "\u{1F3B5} Fan chants",
        Theme::with_opacity(theme.accent, opacity),
        theme.on_accent(),
        font,
        enabled && audio.is_some(),
    ) {
        clicks.push(PointerTarget::AudioToggle);
    }
    if render::button(
        ui,
        egui::Id::new(("media-gallery", &slide.id)),
        gallery_rect,
        "\u{1F5BC} Tifos",
        Theme::with_opacity(theme.gold, opacity),
        theme.on_accent(),
        font,
        enabled && has_gallery,
    ) {
        clicks.push(PointerTarget::GalleryOpen);
    }
    y += button_size.y + 48.0 * scale;

    if let Some(audio) = audio.filter(|a| a.state().is_visible()) {
        let panel = egui::Rect::from_min_size(
            Pos2::new(rect.center().x - row_w / 2.0, y),
            egui::vec2(row_w, 150.0 * scale),
        );
        draw_audio_panel(
            ui,
            slide,
            audio.state(),
            audio.last_error(),
            cx,
            panel,
            opacity,
            clicks,
        );
        y = panel.bottom() + 48.0 * scale;
    }

    if !media.gallery.is_empty() {
        draw_thumbnails(ui, slide, media, cx, rect, y, opacity, clicks);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_audio_panel(
    ui: &egui::Ui,
    slide: &Slide,
    state: AudioState,
    error: Option<&str>,
    cx: &RenderCtx,
    panel: egui::Rect,
    opacity: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let radius = 20.0 * scale;
    ui.painter()
        .rect_filled(panel, radius, Theme::with_opacity(theme.panel, opacity * 0.94));
    ui.painter().rect_stroke(
        panel,
        radius,
        Stroke::new(1.5 * scale, Theme::with_opacity(theme.panel_border, opacity)),
        egui::StrokeKind::Outside,
    );

    let playing = state == AudioState::Playing;
    let inner = panel.shrink(32.0 * scale);
    let button_size = egui::vec2(200.0, 64.0) * scale;
    let button_rect = egui::Rect::from_min_size(
        Pos2::new(inner.left(), inner.center().y - button_size.y / 2.0),
        button_size,
    );
    let label = if playing {
        "\u{23F8} Pause"
    } else {
        "\u{25B6} Play"
    };
    if render::button(
        ui,
        egui::Id::new(("media-audio-panel", &slide.id)),
        button_rect,
        label,
        Theme::with_opacity(theme.accent, opacity),
        theme.on_accent(),
        theme.body_size * scale,
        opacity > 0.5,
    ) {
        clicks.push(PointerTarget::AudioToggle);
    }

    let text_x = button_rect.right() + 32.0 * scale;
    let (status, color) = match error {
        Some(err) => (format!("Playback failed: {err}"), theme.gold),
        None if playing => ("Now playing".to_string(), theme.foreground),
        None => ("Paused".to_string(), theme.muted),
    };
    let color = Theme::with_opacity(color, opacity);
    let galley = ui.painter().layout(
        status,
        FontId::proportional(theme.body_size * scale),
        color,
        inner.right() - text_x - 160.0 * scale,
    );
    let pos = Pos2::new(text_x, inner.center().y - galley.rect.height() / 2.0);
    ui.painter().galley(pos, galley, color);

    if playing {
        draw_equalizer(ui, theme, inner, opacity, scale);
    }
}

/// Bouncing bars at the right edge of the panel.
fn draw_equalizer(ui: &egui::Ui, theme: &Theme, inner: egui::Rect, opacity: f32, scale: f32) {
    let time = ui.input(|i| i.time) as f32;
    let bar_w = 12.0 * scale;
    let gap = 8.0 * scale;
    let max_h = inner.height() * 0.8;
    let color = Theme::with_opacity(theme.gold, opacity);
    for i in 0..6 {
        let phase = i as f32 * 1.3;
        let h = max_h * (0.35 + 0.65 * ((time * 6.0 + phase).sin() * 0.5 + 0.5));
        let x = inner.right() - (6 - i) as f32 * (bar_w + gap);
        let bar = egui::Rect::from_min_max(
            Pos2::new(x, inner.center().y + max_h / 2.0 - h),
            Pos2::new(x + bar_w, inner.center().y + max_h / 2.0),
        );
        ui.painter().rect_filled(bar, 3.0 * scale, color);
    }
    ui.ctx().request_repaint();
}

#[allow(clippy::too_many_arguments)]
fn draw_thumbnails(
    ui: &egui::Ui,
    slide: &Slide,
    media: &MediaSpec,
    cx: &RenderCtx,
    rect: egui::Rect,
    top: f32,
    opacity: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    let scale = cx.scale;
    let count = media.gallery.len();
    let gap = 32.0 * scale;
    let bottom = rect.bottom() - 200.0 * scale;
    let height = (bottom - top).min(260.0 * scale);
    if height < 60.0 * scale {
        return;
    }
    let max_w = rect.width() - 240.0 * scale;
    let width = ((max_w - gap * (count as f32 - 1.0)) / count as f32).min(height * 1.5);
    let row_w = width * count as f32 + gap * (count as f32 - 1.0);
    let left = rect.center().x - row_w / 2.0;

    for (i, image) in media.gallery.iter().enumerate() {
        let slot = if cx.is_rtl() { count - 1 - i } else { i };
        let cell = egui::Rect::from_min_size(
            Pos2::new(left + slot as f32 * (width + gap), top),
            egui::vec2(width, height),
        );
        let response = ui.interact(
            cell,
            egui::Id::new(("media-thumb", &slide.id, i)),
            egui::Sense::click(),
        );
        let hovered = response.hovered() && opacity > 0.5;
        let drawn = render::draw_image_in_area(ui, &image.image, &image.title, cx, cell, opacity);
        let border = if hovered { cx.theme.gold } else { cx.theme.panel_border };
        ui.painter().rect_stroke(
            drawn,
            8.0 * scale,
            Stroke::new(2.0 * scale, Theme::with_opacity(border, opacity)),
            egui::StrokeKind::Outside,
        );
        if hovered {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() && opacity > 0.5 {
            clicks.push(PointerTarget::GalleryOpen);
            clicks.push(PointerTarget::Carousel(CarouselTarget::Dot(i)));
        }
    }
}
