use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::content::DeckMeta;
use crate::render::{self, RenderCtx};
use crate::shell::PointerTarget;
use crate::theme::Theme;

/// Where the navigator currently stands, as far as the chrome cares.
#[derive(Debug, Clone, Copy)]
pub struct NavState {
    pub current: usize,
    pub count: usize,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    /// 1.0 once the last move has settled.
    pub settle: f32,
}

/// Header, footer pill, navigation bar and counter drawn over every slide.
pub fn draw(
    ui: &egui::Ui,
    meta: &DeckMeta,
    nav: NavState,
    cx: &RenderCtx,
    rect: egui::Rect,
    clicks: &mut Vec<PointerTarget>,
) {
    draw_header(ui, meta, cx, rect);
    if let Some(footer) = &meta.footer {
        draw_footer(ui, footer, cx, rect);
    }
    draw_nav_bar(ui, nav, cx, rect, clicks);
    draw_counter(ui, nav, cx, rect);
}

fn draw_header(ui: &egui::Ui, meta: &DeckMeta, cx: &RenderCtx, rect: egui::Rect) {
    let theme = cx.theme;
    let scale = cx.scale;
    let margin = 48.0 * scale;
    let logo_size = 64.0 * scale;
    let top = rect.top() + 32.0 * scale;

    // Logo on the leading edge, badge on the trailing one
    let (lead_x, trail_x) = if cx.is_rtl() {
        (rect.right() - margin - logo_size, rect.left() + margin)
    } else {
        (rect.left() + margin, rect.right() - margin)
    };

    let mut text_x = lead_x;
    if let Some(logo) = &meta.logo {
        let logo_rect = egui::Rect::from_min_size(
            Pos2::new(lead_x, top),
            egui::vec2(logo_size, logo_size),
        );
        if let Some(texture) = cx.images.get_or_load(ui, logo) {
            let draw_rect = render::contain_rect(texture.size_vec2(), logo_rect);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(texture.id(), draw_rect, uv, egui::Color32::WHITE);
        }
        text_x = if cx.is_rtl() {
            lead_x - 20.0 * scale
        } else {
            lead_x + logo_size + 20.0 * scale
        };
    }

    if let Some(title) = &meta.title {
        let color = Theme::with_opacity(theme.heading_color, 0.9);
        let galley = ui.painter().layout_no_wrap(
            title.clone(),
            FontId::proportional(theme.small_size * 1.3 * scale),
            color,
        );
        let x = if cx.is_rtl() {
            text_x - galley.rect.width()
        } else {
            text_x
        };
        let y = top + logo_size / 2.0 - galley.rect.height() / 2.0;
        ui.painter().galley(Pos2::new(x, y), galley, color);
    }

    if let Some(badge) = &meta.badge {
        let galley = ui.painter().layout_no_wrap(
            badge.clone(),
            FontId::proportional(theme.small_size * scale),
            theme.on_accent(),
        );
        let pad = egui::vec2(20.0, 10.0) * scale;
        let size = galley.rect.size() + pad * 2.0;
        let x = if cx.is_rtl() { trail_x } else { trail_x - size.x };
        let badge_rect = egui::Rect::from_min_size(
            Pos2::new(x, top + logo_size / 2.0 - size.y / 2.0),
            size,
        );
        ui.painter()
            .rect_filled(badge_rect, size.y / 2.0, theme.gold);
        ui.painter()
            .galley(badge_rect.min + pad, galley, theme.on_accent());
    }
}

fn draw_footer(ui: &egui::Ui, footer: &str, cx: &RenderCtx, rect: egui::Rect) {
    let theme = cx.theme;
    let scale = cx.scale;
    let color = Theme::with_opacity(theme.foreground, 0.75);
    let galley = ui.painter().layout_no_wrap(
        footer.to_string(),
        FontId::proportional(theme.small_size * 0.9 * scale),
        color,
    );
    let pad = egui::vec2(24.0, 8.0) * scale;
    let size = galley.rect.size() + pad * 2.0;
    let pill = egui::Rect::from_min_size(
        Pos2::new(rect.center().x - size.x / 2.0, rect.bottom() - 24.0 * scale - size.y),
        size,
    );
    ui.painter()
        .rect_filled(pill, size.y / 2.0, Theme::with_opacity(theme.panel, 0.85));
    ui.painter().rect_stroke(
        pill,
        size.y / 2.0,
        Stroke::new(1.0 * scale, Theme::with_opacity(theme.panel_border, 0.8)),
        egui::StrokeKind::Outside,
    );
    ui.painter().galley(pill.min + pad, galley, color);
}

/// Previous button, one dot per slide, next button. Slides advance
/// vertically, hence the up and down arrows.
fn draw_nav_bar(
    ui: &egui::Ui,
    nav: NavState,
    cx: &RenderCtx,
    rect: egui::Rect,
    clicks: &mut Vec<PointerTarget>,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let button = egui::vec2(56.0, 56.0) * scale;
    let dot = 12.0 * scale;
    let dot_gap = 12.0 * scale;
    let gap = 24.0 * scale;
    let dots_w = nav.count as f32 * dot + nav.count.saturating_sub(1) as f32 * dot_gap;
    let total_w = button.x * 2.0 + gap * 2.0 + dots_w;
    let center_y = rect.bottom() - 110.0 * scale;
    let left = rect.center().x - total_w / 2.0;

    let prev_rect = egui::Rect::from_min_size(Pos2::new(left, center_y - button.y / 2.0), button);
    let next_rect = egui::Rect::from_min_size(
        Pos2::new(left + total_w - button.x, center_y - button.y / 2.0),
        button,
    );

    if render::button(
        ui,
        egui::Id::new("nav-previous"),
        prev_rect,
        "\u{25B2}",
        theme.accent,
        theme.on_accent(),
        theme.body_size * scale,
        nav.can_go_previous,
    ) {
        clicks.push(PointerTarget::PreviousSlide);
    }
    if render::button(
        ui,
        egui::Id::new("nav-next"),
        next_rect,
        "\u{25BC}",
        theme.accent,
        theme.on_accent(),
        theme.body_size * scale,
        nav.can_go_next,
    ) {
        clicks.push(PointerTarget::NextSlide);
    }

    let dots_left = prev_rect.right() + gap;
    for i in 0..nav.count {
        let center = Pos2::new(dots_left + i as f32 * (dot + dot_gap) + dot / 2.0, center_y);
        let hit = egui::Rect::from_center_size(center, egui::vec2(dot + dot_gap, dot * 2.5));
        let response = ui.interact(hit, egui::Id::new(("nav-dot", i)), egui::Sense::click());
        let active = i == nav.current;
        let radius = if active || response.hovered() {
            dot * 0.65
        } else {
            dot / 2.0
        };
        let color = if active {
            theme.gold
        } else {
            Theme::with_opacity(theme.muted, 0.6)
        };
        ui.painter().circle_filled(center, radius, color);
        if active && nav.settle < 1.0 {
            let w = (dot + dot_gap) * nav.settle;
            let y = center_y + dot * 1.2;
            ui.painter().line_segment(
                [
                    Pos2::new(center.x - w / 2.0, y),
                    Pos2::new(center.x + w / 2.0, y),
                ],
                Stroke::new(2.0 * scale, theme.gold),
            );
        }
        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        if response.clicked() {
            clicks.push(PointerTarget::Indicator(i));
        }
    }
}

fn draw_counter(ui: &egui::Ui, nav: NavState, cx: &RenderCtx, rect: egui::Rect) {
    let scale = cx.scale;
    let text = format!("{} / {}", nav.current + 1, nav.count);
    let color = Theme::with_opacity(cx.theme.foreground, 0.3);
    let galley = ui
        .painter()
        .layout_no_wrap(text, FontId::monospace(14.0 * scale), color);
    let x = if cx.is_rtl() {
        rect.left() + 16.0 * scale
    } else {
        rect.right() - galley.rect.width() - 16.0 * scale
    };
    let pos = Pos2::new(x, rect.bottom() - 30.0 * scale);
    ui.painter().galley(pos, galley, color);
}
