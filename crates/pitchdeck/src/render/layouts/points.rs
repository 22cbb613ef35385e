use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::content::{Point, Slide};
use crate::render::{self, RenderCtx, markup};
use crate::shell::PointerTarget;
use crate::theme::Theme;

const DETAIL_SHARE: f32 = 0.6;

/// Point slide: the selected point enlarged in a detail card, with one
/// clickable entry per point beside it.
#[allow(clippy::too_many_arguments)]
pub fn render(
    ui: &mut egui::Ui,
    slide: &Slide,
    points: &[Point],
    selected: usize,
    cx: &RenderCtx,
    rect: egui::Rect,
    opacity: f32,
    detail_progress: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    let scale = cx.scale;
    let padding = 120.0 * scale;
    let title_bottom = render::draw_slide_title(
        ui,
        &slide.title,
        cx,
        rect,
        rect.top() + 150.0 * scale,
        opacity,
    );

    let area = egui::Rect::from_min_max(
        Pos2::new(rect.left() + padding, title_bottom + 48.0 * scale),
        Pos2::new(rect.right() - padding, rect.bottom() - 190.0 * scale),
    );
    let gap = 40.0 * scale;
    let detail_w = (area.width() - gap) * DETAIL_SHARE;
    let nav_w = area.width() - gap - detail_w;

    let (detail_rect, nav_rect) = if cx.is_rtl() {
        (
            egui::Rect::from_min_size(
                Pos2::new(area.right() - detail_w, area.top()),
                egui::vec2(detail_w, area.height()),
            ),
            egui::Rect::from_min_size(area.left_top(), egui::vec2(nav_w, area.height())),
        )
    } else {
        (
            egui::Rect::from_min_size(area.left_top(), egui::vec2(detail_w, area.height())),
            egui::Rect::from_min_size(
                Pos2::new(area.right() - nav_w, area.top()),
                egui::vec2(nav_w, area.height()),
            ),
        )
    };

    if let Some(point) = points.get(selected) {
        let details_clicked = draw_detail_card(
            ui,
            slide,
            point,
            selected,
            cx,
            detail_rect,
            opacity,
            detail_progress,
        );
        if details_clicked {
            clicks.push(PointerTarget::PointDetails(selected));
        }
    }

    draw_point_nav(ui, slide, points, selected, cx, nav_rect, opacity, clicks);
}

/// Returns whether the details button was clicked.
#[allow(clippy::too_many_arguments)]
fn draw_detail_card(
    ui: &mut egui::Ui,
    slide: &Slide,
    point: &Point,
    index: usize,
    cx: &RenderCtx,
    card: egui::Rect,
    opacity: f32,
    progress: f32,
) -> bool {
    let theme = cx.theme;
    let scale = cx.scale;
    let radius = 24.0 * scale;

    ui.painter()
        .rect_filled(card, radius, Theme::with_opacity(theme.panel, opacity * 0.92));
    ui.painter().rect_stroke(
        card,
        radius,
        Stroke::new(1.5 * scale, Theme::with_opacity(theme.panel_border, opacity)),
        egui::StrokeKind::Outside,
    );

    // Content rises into place as the selection changes
    let alpha = opacity * progress;
    let offset = (1.0 - progress) * 30.0 * scale;
    let inner = card.shrink(44.0 * scale);
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(card)
            .id_salt(("detail", &slide.id)),
    );
    child.set_clip_rect(card.intersect(ui.clip_rect()));

    let mut y = inner.top() + offset;
    let icon_size = 96.0 * scale;
    let icon_center = Pos2::new(inner.left() + icon_size / 2.0, y + icon_size / 2.0);
    child
        .painter()
        .circle_filled(icon_center, icon_size / 2.0, Theme::with_opacity(theme.accent, alpha));
    let glyph = child.painter().layout_no_wrap(
        point.icon.glyph().to_string(),
        FontId::proportional(48.0 * scale),
        Theme::with_opacity(theme.on_accent(), alpha),
    );
    let glyph_pos = icon_center - glyph.rect.size() / 2.0;
    child.painter().galley(glyph_pos, glyph, theme.on_accent());

    let title_x = inner.left() + icon_size + 28.0 * scale;
    let title_color = Theme::with_opacity(theme.heading_color, alpha);
    let title = child.painter().layout(
        point.title.clone(),
        FontId::proportional(theme.subheading_size * scale),
        title_color,
        inner.right() - title_x,
    );
    let title_y = icon_center.y - title.rect.height() / 2.0;
    child
        .painter()
        .galley(Pos2::new(title_x, title_y), title, title_color);
    y += icon_size + 28.0 * scale;

    let summary_color = Theme::with_opacity(theme.foreground, alpha);
    let summary = child.painter().layout(
        point.summary.clone(),
        FontId::proportional(theme.body_size * scale),
        summary_color,
        inner.width(),
    );
    let summary_h = summary.rect.height();
    child
        .painter()
        .galley(Pos2::new(inner.left(), y), summary, summary_color);
    y += summary_h + 24.0 * scale;

    let blocks = point.detail.blocks();
    let button_h = 52.0 * scale;
    let body_size = theme.body_size * 0.85 * scale;
    markup::draw_blocks(
        &child,
        &blocks,
        theme,
        Pos2::new(inner.left(), y),
        inner.width(),
        body_size,
        alpha,
        scale,
    );

    let button_w = 200.0 * scale;
    let button_x = if cx.is_rtl() {
        inner.left()
    } else {
        inner.right() - button_w
    };
    let button_rect = egui::Rect::from_min_size(
        Pos2::new(button_x, card.bottom() - 28.0 * scale - button_h),
        egui::vec2(button_w, button_h),
    );
    render::button(
        ui,
        egui::Id::new(("point-details", &slide.id, index)),
        button_rect,
        "Details \u{2197}",
        Theme::with_opacity(theme.gold, opacity),
        theme.on_accent(),
        theme.small_size * scale,
        opacity > 0.5,
    )
}

#[allow(clippy::too_many_arguments)]
fn draw_point_nav(
    ui: &egui::Ui,
    slide: &Slide,
    points: &[Point],
    selected: usize,
    cx: &RenderCtx,
    nav: egui::Rect,
    opacity: f32,
    clicks: &mut Vec<PointerTarget>,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let gap = 16.0 * scale;
    let count = points.len().max(1) as f32;
    let entry_h = ((nav.height() - gap * (count - 1.0)) / count).min(112.0 * scale);

    for (i, point) in points.iter().enumerate() {
        let entry = egui::Rect::from_min_size(
            Pos2::new(nav.left(), nav.top() + i as f32 * (entry_h + gap)),
            egui::vec2(nav.width(), entry_h),
        );
        let response = ui.interact(
            entry,
            egui::Id::new(("point-entry", &slide.id, i)),
            egui::Sense::click(),
        );
        let active = i == selected;
        let hovered = response.hovered() && opacity > 0.5;
        let draw_rect = if hovered && !active {
            entry.expand(3.0 * scale)
        } else {
            entry
        };

        let (fill, text_color) = if active {
            (theme.accent, theme.on_accent())
        } else {
            (theme.panel, theme.foreground)
        };
        let radius = 18.0 * scale;
        ui.painter()
            .rect_filled(draw_rect, radius, Theme::with_opacity(fill, opacity * 0.94));
        let border = if active { theme.gold } else { theme.panel_border };
        ui.painter().rect_stroke(
            draw_rect,
            radius,
            Stroke::new(2.0 * scale, Theme::with_opacity(border, opacity)),
            egui::StrokeKind::Outside,
        );

        let text_color = Theme::with_opacity(text_color, opacity);
        let pad = 24.0 * scale;
        let glyph = ui.painter().layout_no_wrap(
            point.icon.glyph().to_string(),
            FontId::proportional(30.0 * scale),
            text_color,
        );
        let label_w = draw_rect.width() - pad * 3.0 - glyph.rect.width();
        let label = ui.painter().layout(
            point.title.clone(),
            FontId::proportional(theme.body_size * 0.9 * scale),
            text_color,
            label_w,
        );
        let (glyph_x, label_x) = if cx.is_rtl() {
            let glyph_x = draw_rect.right() - pad - glyph.rect.width();
            (glyph_x, glyph_x - pad - label.rect.width())
        } else {
            let glyph_x = draw_rect.left() + pad;
            (glyph_x, glyph_x + glyph.rect.width() + pad)
        };
        let cy = draw_rect.center().y;
        ui.painter().galley(
            Pos2::new(glyph_x, cy - glyph.rect.height() / 2.0),
            glyph,
            text_color,
        );
        ui.painter().galley(
            Pos2::new(label_x, cy - label.rect.height() / 2.0),
            label,
            text_color,
        );

        if hovered {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() && opacity > 0.5 {
            clicks.push(PointerTarget::Point(i));
        }
    }
}
