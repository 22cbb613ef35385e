pub mod chrome;
pub mod image_cache;
pub mod layouts;
pub mod markup;
pub mod overlay;
pub mod transition;

use eframe::egui::{self, Color32, FontId, Pos2, Stroke};

use crate::content::{Direction, Slide, SlideBody};
use crate::shell::{PointerTarget, SlideView};
use crate::theme::Theme;

use image_cache::ImageCache;

/// Reference resolution every layout is designed against.
pub const REFERENCE_SIZE: egui::Vec2 = egui::vec2(1920.0, 1080.0);

/// What every layout needs besides the slide itself.
pub struct RenderCtx<'a> {
    pub theme: &'a Theme,
    pub images: &'a ImageCache,
    pub scale: f32,
    pub direction: Direction,
}

impl RenderCtx<'_> {
    /// Mirror a horizontal split for right-to-left decks.
    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }
}

pub fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REFERENCE_SIZE.x).min(rect.height() / REFERENCE_SIZE.y)
}

/// Render the mounted slide. Clicks on its controls are appended to
/// `clicks` in the order they happened.
#[allow(clippy::too_many_arguments)]
pub fn render_slide(
    ui: &mut egui::Ui,
    slide: &Slide,
    view: &SlideView,
    cx: &RenderCtx,
    rect: egui::Rect,
    opacity: f32,
    detail_progress: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    if let Some(background) = &slide.background {
        draw_background(ui, background, cx, rect, opacity);
    }

    match &slide.body {
        SlideBody::Hero { headline, subtitle } => {
            layouts::hero::render(ui, headline, subtitle.as_deref(), cx, rect, opacity)
        }
        SlideBody::Points(points) => layouts::points::render(
            ui,
            slide,
            points,
            view.selected_point(),
            cx,
            rect,
            opacity,
            detail_progress,
            clicks,
        ),
        SlideBody::Media(media) => {
            layouts::media::render(ui, slide, media, view, cx, rect, opacity, clicks)
        }
    }
}

/// Background photo washed out towards the theme background so text stays
/// readable.
fn draw_background(ui: &egui::Ui, path: &str, cx: &RenderCtx, rect: egui::Rect, opacity: f32) {
    let Some(texture) = cx.images.get_or_load(ui, path) else {
        return;
    };
    let painter = ui.painter_at(rect);
    let draw_rect = cover_rect(texture.size_vec2(), rect);
    let tint = Color32::from_rgba_unmultiplied(255, 255, 255, (opacity * 255.0) as u8);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(texture.id(), draw_rect, uv, tint);
    painter.rect_filled(
        rect,
        0.0,
        Theme::with_opacity(cx.theme.background, opacity * 0.82),
    );
}

/// Scale to fill `available`, centered, cropping the overflow.
pub fn cover_rect(tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    let scale = (available.width() / tex_size.x).max(available.height() / tex_size.y);
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}

/// Fit within `available`, preserving the aspect ratio, never upscaling.
pub fn contain_rect(tex_size: egui::Vec2, available: egui::Rect) -> egui::Rect {
    let scale = (available.width() / tex_size.x)
        .min(available.height() / tex_size.y)
        .min(1.0);
    egui::Rect::from_center_size(available.center(), tex_size * scale)
}

/// Image drawn inside `available`, or a labelled placeholder when it
/// can't be loaded. Returns the rect actually covered.
pub fn draw_image_in_area(
    ui: &egui::Ui,
    path: &str,
    label: &str,
    cx: &RenderCtx,
    available: egui::Rect,
    opacity: f32,
) -> egui::Rect {
    if let Some(texture) = cx.images.get_or_load(ui, path) {
        let draw_rect = contain_rect(texture.size_vec2(), available);
        let tint = Color32::from_rgba_unmultiplied(255, 255, 255, (opacity * 255.0) as u8);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        ui.painter().image(texture.id(), draw_rect, uv, tint);
        draw_rect
    } else {
        draw_image_placeholder(ui, label, cx, available, opacity);
        available
    }
}

pub fn draw_image_placeholder(
    ui: &egui::Ui,
    label: &str,
    cx: &RenderCtx,
    rect: egui::Rect,
    opacity: f32,
) {
    let theme = cx.theme;
    let bg = Theme::with_opacity(theme.panel, opacity);
    let color = Theme::with_opacity(theme.muted, opacity);
    ui.painter().rect_filled(rect, 12.0 * cx.scale, bg);
    ui.painter().rect_stroke(
        rect,
        12.0 * cx.scale,
        Stroke::new(1.0, color),
        egui::StrokeKind::Outside,
    );
    let text = if label.is_empty() {
        "[Image]".to_string()
    } else {
        format!("[Image: {label}]")
    };
    let galley = ui.painter().layout(
        text,
        FontId::proportional(theme.small_size * cx.scale),
        color,
        rect.width(),
    );
    let pos = Pos2::new(
        rect.center().x - galley.rect.width() / 2.0,
        rect.center().y - galley.rect.height() / 2.0,
    );
    ui.painter().galley(pos, galley, color);
}

/// Slide title, centered at the top. Returns its bottom edge.
pub fn draw_slide_title(
    ui: &egui::Ui,
    title: &str,
    cx: &RenderCtx,
    rect: egui::Rect,
    top: f32,
    opacity: f32,
) -> f32 {
    let color = Theme::with_opacity(cx.theme.heading_color, opacity);
    let galley = ui.painter().layout(
        title.to_string(),
        FontId::proportional(cx.theme.heading_size * cx.scale),
        color,
        rect.width() * 0.8,
    );
    let pos = Pos2::new(rect.center().x - galley.rect.width() / 2.0, top);
    let bottom = top + galley.rect.height();
    ui.painter().galley(pos, galley, color);

    let underline_w = 96.0 * cx.scale;
    let y = bottom + 12.0 * cx.scale;
    ui.painter().line_segment(
        [
            Pos2::new(rect.center().x - underline_w / 2.0, y),
            Pos2::new(rect.center().x + underline_w / 2.0, y),
        ],
        Stroke::new(4.0 * cx.scale, Theme::with_opacity(cx.theme.gold, opacity)),
    );
    y + 4.0 * cx.scale
}

/// A rounded, clickable button with a label. Returns whether it was clicked.
#[allow(clippy::too_many_arguments)]
pub fn button(
    ui: &egui::Ui,
    id: egui::Id,
    rect: egui::Rect,
    label: &str,
    fill: Color32,
    text_color: Color32,
    font_size: f32,
    enabled: bool,
) -> bool {
    let sense = if enabled {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let response = ui.interact(rect, id, sense);
    let hovered = enabled && response.hovered();
    let draw_rect = if hovered { rect.expand(2.0) } else { rect };
    let fill = if enabled {
        fill
    } else {
        Theme::with_opacity(fill, 0.35)
    };
    let text_color = if enabled {
        text_color
    } else {
        Theme::with_opacity(text_color, 0.5)
    };
    ui.painter()
        .rect_filled(draw_rect, draw_rect.height() / 2.0, fill);
    let galley = ui
        .painter()
        .layout_no_wrap(label.to_string(), FontId::proportional(font_size), text_color);
    let pos = draw_rect.center() - galley.rect.size() / 2.0;
    ui.painter().galley(pos, galley, text_color);
    if hovered {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    enabled && response.clicked()
}
