use eframe::egui::{self, FontId, Pos2, Stroke};

use crate::render::RenderCtx;
use crate::theme::Theme;

/// Opening slide: large centered headline over slowly drifting rings.
pub fn render(
    ui: &egui::Ui,
    headline: &str,
    subtitle: Option<&str>,
    cx: &RenderCtx,
    rect: egui::Rect,
    opacity: f32,
) {
    let theme = cx.theme;
    let scale = cx.scale;
    let time = ui.input(|i| i.time) as f32;

    draw_rings(ui, theme, rect, opacity, scale, time);

    let heading_color = Theme::with_opacity(theme.heading_color, opacity);
    let max_width = rect.width() * 0.75;
    let headline_galley = ui.painter().layout(
        headline.to_string(),
        FontId::proportional(theme.title_size * scale),
        heading_color,
        max_width,
    );

    let sub_galley = subtitle.map(|s| {
        ui.painter().layout(
            s.to_string(),
            FontId::proportional(theme.subheading_size * scale),
            Theme::with_opacity(theme.foreground, opacity * 0.85),
            max_width,
        )
    });

    let gap = 32.0 * scale;
    let total_h = headline_galley.rect.height()
        + sub_galley
            .as_ref()
            .map(|g| g.rect.height() + gap)
            .unwrap_or(0.0);

    // Gentle bob, a few pixels at most
    let bob = (time * 1.2).sin() * 6.0 * scale;
    let mut y = rect.center().y - total_h / 2.0 + bob;
    let pos = Pos2::new(rect.center().x - headline_galley.rect.width() / 2.0, y);
    y += headline_galley.rect.height();
    ui.painter().galley(pos, headline_galley, heading_color);

    if let Some(galley) = sub_galley {
        y += gap;
        let pos = Pos2::new(rect.center().x - galley.rect.width() / 2.0, y);
        ui.painter().galley(pos, galley, heading_color);
    }

    let hint_color = Theme::with_opacity(theme.muted, opacity * (0.5 + 0.3 * (time * 2.0).sin()));
    let hint = ui.painter().layout_no_wrap(
        "\u{2193}".to_string(),
        FontId::proportional(theme.subheading_size * scale),
        hint_color,
    );
    let hint_pos = Pos2::new(
        rect.center().x - hint.rect.width() / 2.0,
        rect.bottom() - 220.0 * scale,
    );
    ui.painter().galley(hint_pos, hint, hint_color);

    ui.ctx().request_repaint();
}

fn draw_rings(
    ui: &egui::Ui,
    theme: &Theme,
    rect: egui::Rect,
    opacity: f32,
    scale: f32,
    time: f32,
) {
    let rings = [
        (0.22, 0.30, 180.0, 0.0),
        (0.80, 0.25, 260.0, 1.7),
        (0.70, 0.78, 140.0, 3.1),
        (0.15, 0.80, 220.0, 4.4),
    ];
    for (fx, fy, radius, phase) in rings {
        let drift = egui::vec2((time * 0.3 + phase).sin(), (time * 0.25 + phase).cos())
            * 24.0
            * scale;
        let center = Pos2::new(
            rect.left() + rect.width() * fx,
            rect.top() + rect.height() * fy,
        ) + drift;
        ui.painter().circle_stroke(
            center,
            radius * scale,
            Stroke::new(2.0 * scale, Theme::with_opacity(theme.accent, opacity * 0.18)),
        );
        ui.painter().circle_filled(
            center,
            radius * 0.35 * scale,
            Theme::with_opacity(theme.gold, opacity * 0.06),
        );
    }
}
