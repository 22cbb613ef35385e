use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::content::GalleryImage;
use crate::content::markup::TrustedMarkup;
use crate::modal::ModalTarget;
use crate::render::{self, RenderCtx, markup};
use crate::shell::PointerTarget;
use crate::theme::Theme;
use crate::widgets::CarouselTarget;

/// Backdrop and panel hit areas. The panel is registered after the backdrop
/// so it wins the hit test and a click on it never reaches the backdrop.
fn backdrop(
    ui: &egui::Ui,
    id: &str,
    rect: egui::Rect,
    panel: egui::Rect,
    cx: &RenderCtx,
) -> (bool, bool) {
    ui.painter().rect_filled(rect, 0.0, cx.theme.scrim);
    let background = ui.interact(rect, egui::Id::new((id, "background")), egui::Sense::click());
    let panel_hit = ui.interact(panel, egui::Id::new((id, "panel")), egui::Sense::click());
    (background.clicked(), panel_hit.clicked())
}

fn foreground_area(
    ctx: &egui::Context,
    id: &str,
    rect: egui::Rect,
    add: impl FnOnce(&mut egui::Ui),
) {
    egui::Area::new(egui::Id::new(id))
        .order(egui::Order::Foreground)
        .fixed_pos(rect.min)
        .show(ctx, |ui| {
            ui.set_min_size(rect.size());
            add(ui);
        });
}

/// Round close button in the panel's top corner.
fn close_button(ui: &egui::Ui, id: &str, panel: egui::Rect, cx: &RenderCtx) -> bool {
    let size = 48.0 * cx.scale;
    let inset = 16.0 * cx.scale;
    let x = if cx.is_rtl() {
        panel.left() + inset
    } else {
        panel.right() - inset - size
    };
    let rect = egui::Rect::from_min_size(Pos2::new(x, panel.top() + inset), egui::vec2(size, size));
    render::button(
        ui,
        egui::Id::new((id, "close")),
        rect,
        "\u{2715}",
        Theme::with_opacity(cx.theme.muted, 0.25),
        cx.theme.heading_color,
        cx.theme.body_size * cx.scale,
        true,
    )
}

fn draw_panel(ui: &egui::Ui, panel: egui::Rect, cx: &RenderCtx) {
    let radius = 24.0 * cx.scale;
    ui.painter().rect_filled(panel, radius, cx.theme.panel);
    ui.painter().rect_stroke(
        panel,
        radius,
        Stroke::new(2.0 * cx.scale, cx.theme.gold),
        egui::StrokeKind::Outside,
    );
}

/// Modal with a title and rich-text body over a dimmed backdrop.
pub fn draw_modal(
    ctx: &egui::Context,
    title: &str,
    body: &TrustedMarkup,
    cx: &RenderCtx,
    rect: egui::Rect,
    clicks: &mut Vec<PointerTarget>,
) {
    foreground_area(ctx, "modal-overlay", rect, |ui| {
        let theme = cx.theme;
        let scale = cx.scale;
        let padding = 48.0 * scale;
        let width = (960.0 * scale).min(rect.width() * 0.85);
        let inner_w = width - padding * 2.0;
        let body_size = theme.body_size * scale;
        let blocks = body.blocks();

        let title_color = theme.heading_color;
        let title_galley = ui.painter().layout(
            title.to_string(),
            FontId::proportional(theme.subheading_size * scale),
            title_color,
            inner_w - 64.0 * scale,
        );
        let body_h = markup::measure_blocks_height(ui, &blocks, theme, inner_w, body_size, scale);
        let content_h = title_galley.rect.height() + 28.0 * scale + body_h;
        let height = (content_h + padding * 2.0).min(rect.height() * 0.85);
        let panel = egui::Rect::from_center_size(rect.center(), egui::vec2(width, height));

        let (background_clicked, panel_clicked) = backdrop(ui, "modal", rect, panel, cx);
        draw_panel(ui, panel, cx);

        let title_x = if cx.is_rtl() {
            panel.right() - padding - title_galley.rect.width()
        } else {
            panel.left() + padding
        };
        let title_bottom = panel.top() + padding + title_galley.rect.height();
        ui.painter()
            .galley(Pos2::new(title_x, panel.top() + padding), title_galley, title_color);

        let body_rect = egui::Rect::from_min_max(
            Pos2::new(panel.left() + padding, title_bottom + 28.0 * scale),
            Pos2::new(panel.right() - padding, panel.bottom() - padding),
        );
        let mut body_ui = ui.new_child(
            egui::UiBuilder::new()
                .max_rect(body_rect)
                .id_salt("modal-body"),
        );
        body_ui.set_clip_rect(body_rect);
        markup::draw_blocks(
            &body_ui,
            &blocks,
            theme,
            body_rect.min,
            inner_w,
            body_size,
            1.0,
            scale,
        );

        if close_button(ui, "modal", panel, cx) {
            clicks.push(PointerTarget::Modal(ModalTarget::CloseButton));
        } else if panel_clicked {
            clicks.push(PointerTarget::Modal(ModalTarget::Panel));
        } else if background_clicked {
            clicks.push(PointerTarget::Modal(ModalTarget::Background));
        }
    });
}

/// Full-screen image viewer with previous/next arrows, dots and a caption.
pub fn draw_carousel(
    ctx: &egui::Context,
    gallery: &[GalleryImage],
    index: usize,
    cx: &RenderCtx,
    rect: egui::Rect,
    clicks: &mut Vec<PointerTarget>,
) {
    let Some(image) = gallery.get(index) else {
        return;
    };
    foreground_area(ctx, "carousel-overlay", rect, |ui| {
        let theme = cx.theme;
        let scale = cx.scale;
        let padding = 40.0 * scale;
        let panel = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(rect.width() * 0.8, rect.height() * 0.85),
        );
        let (background_clicked, panel_clicked) = backdrop(ui, "carousel", rect, panel, cx);
        draw_panel(ui, panel, cx);

        let inner = panel.shrink(padding);
        let caption_w = inner.width();
        let title_galley = ui.painter().layout(
            image.title.clone(),
            FontId::proportional(theme.subheading_size * scale),
            theme.heading_color,
            caption_w,
        );
        let desc_color = Theme::with_opacity(theme.foreground, 0.85);
        let desc_galley = ui.painter().layout(
            image.description.clone(),
            FontId::proportional(theme.body_size * 0.85 * scale),
            desc_color,
            caption_w,
        );
        let dots_h = 40.0 * scale;
        let caption_h = title_galley.rect.height()
            + 12.0 * scale
            + desc_galley.rect.height()
            + dots_h
            + 24.0 * scale;

        let arrow = 64.0 * scale;
        let image_area = egui::Rect::from_min_max(
            Pos2::new(inner.left() + arrow + 24.0 * scale, inner.top() + 40.0 * scale),
            Pos2::new(inner.right() - arrow - 24.0 * scale, inner.bottom() - caption_h),
        );
        render::draw_image_in_area(ui, &image.image, &image.title, cx, image_area, 1.0);

        let mut y = image_area.bottom() + 24.0 * scale;
        let title_h = title_galley.rect.height();
        ui.painter().galley(
            Pos2::new(inner.center().x - title_galley.rect.width() / 2.0, y),
            title_galley,
            theme.heading_color,
        );
        y += title_h + 12.0 * scale;
        let desc_h = desc_galley.rect.height();
        ui.painter().galley(
            Pos2::new(inner.center().x - desc_galley.rect.width() / 2.0, y),
            desc_galley,
            desc_color,
        );
        y += desc_h + dots_h / 2.0;

        let mut target = None;

        let arrow_y = image_area.center().y - arrow / 2.0;
        let arrow_size = egui::vec2(arrow, arrow);
        let left_rect = egui::Rect::from_min_size(Pos2::new(inner.left(), arrow_y), arrow_size);
        let right_rect =
            egui::Rect::from_min_size(Pos2::new(inner.right() - arrow, arrow_y), arrow_size);
        // Previous sits on the leading edge
        let (prev_rect, next_rect) = if cx.is_rtl() {
            (right_rect, left_rect)
        } else {
            (left_rect, right_rect)
        };
        let (prev_label, next_label) = if cx.is_rtl() {
            ("\u{203A}", "\u{2039}")
        } else {
            ("\u{2039}", "\u{203A}")
        };
        if render::button(
            ui,
            egui::Id::new("carousel-previous"),
            prev_rect,
            prev_label,
            theme.accent,
            theme.on_accent(),
            theme.heading_size * scale,
            true,
        ) {
            target = Some(CarouselTarget::Previous);
        }
        if render::button(
            ui,
            egui::Id::new("carousel-next"),
            next_rect,
            next_label,
            theme.accent,
            theme.on_accent(),
            theme.heading_size * scale,
            true,
        ) {
            target = Some(CarouselTarget::Next);
        }

        let dot = 14.0 * scale;
        let dot_gap = 14.0 * scale;
        let count = gallery.len();
        let dots_w = count as f32 * dot + count.saturating_sub(1) as f32 * dot_gap;
        let dots_left = inner.center().x - dots_w / 2.0;
        for i in 0..count {
            let slot = if cx.is_rtl() { count - 1 - i } else { i };
            let center = Pos2::new(dots_left + slot as f32 * (dot + dot_gap) + dot / 2.0, y);
            let hit = egui::Rect::from_center_size(center, egui::vec2(dot + dot_gap, dot * 2.0));
            let response =
                ui.interact(hit, egui::Id::new(("carousel-dot", i)), egui::Sense::click());
            let color = if i == index {
                theme.gold
            } else {
                Theme::with_opacity(theme.muted, 0.6)
            };
            ui.painter().circle_filled(center, dot / 2.0, color);
            if response.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            if response.clicked() {
                target = Some(CarouselTarget::Dot(i));
            }
        }

        if close_button(ui, "carousel", panel, cx) {
            target = Some(CarouselTarget::Close);
        }

        let target = target.or(if panel_clicked {
            Some(CarouselTarget::Panel)
        } else if background_clicked {
            Some(CarouselTarget::Background)
        } else {
            None
        });
        if let Some(target) = target {
            clicks.push(PointerTarget::Carousel(target));
        }
    });
}
