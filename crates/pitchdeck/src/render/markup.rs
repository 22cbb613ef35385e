use eframe::egui::{self, Color32, FontFamily, FontId, Pos2};

use crate::content::markup::{MarkupBlock, Span};
use crate::theme::Theme;

/// Create a LayoutJob from spans.
pub fn spans_to_job(
    spans: &[Span],
    font_size: f32,
    color: Color32,
    strong_color: Color32,
    max_width: f32,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    for span in spans {
        let size = if span.bold { font_size + 1.0 } else { font_size };
        let format = egui::text::TextFormat {
            font_id: FontId::new(size, FontFamily::Proportional),
            color: if span.bold { strong_color } else { color },
            italics: span.italic,
            ..Default::default()
        };
        job.append(&span.text, 0.0, format);
    }
    job
}

/// Paint markup blocks top to bottom, returning the height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_blocks(
    ui: &egui::Ui,
    blocks: &[MarkupBlock],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    font_size: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    layout_blocks(ui, blocks, theme, pos, max_width, font_size, opacity, scale, true)
}

#[allow(clippy::too_many_arguments)]
pub fn measure_blocks_height(
    ui: &egui::Ui,
    blocks: &[MarkupBlock],
    theme: &Theme,
    max_width: f32,
    font_size: f32,
    scale: f32,
) -> f32 {
    layout_blocks(
        ui,
        blocks,
        theme,
        Pos2::ZERO,
        max_width,
        font_size,
        1.0,
        scale,
        false,
    )
}

#[allow(clippy::too_many_arguments)]
fn layout_blocks(
    ui: &egui::Ui,
    blocks: &[MarkupBlock],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    font_size: f32,
    opacity: f32,
    scale: f32,
    paint: bool,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    let strong = Theme::with_opacity(theme.heading_color, opacity);
    let bullet_color = Theme::with_opacity(theme.gold, opacity);
    let block_gap = font_size * 0.6;
    let item_gap = font_size * 0.3;
    let indent = font_size * 1.4;
    let mut y = pos.y;

    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            y += block_gap;
        }
        match block {
            MarkupBlock::Paragraph(spans) => {
                let job = spans_to_job(spans, font_size, color, strong, max_width);
                let galley = ui.painter().layout_job(job);
                let h = galley.rect.height();
                if paint {
                    ui.painter().galley(Pos2::new(pos.x, y), galley, color);
                }
                y += h;
            }
            MarkupBlock::List { ordered, items } => {
                for (n, item) in items.iter().enumerate() {
                    if n > 0 {
                        y += item_gap;
                    }
                    let marker = if *ordered {
                        format!("{}.", n + 1)
                    } else {
                        "\u{2022}".to_string()
                    };
                    let job =
                        spans_to_job(item, font_size, color, strong, max_width - indent);
                    let galley = ui.painter().layout_job(job);
                    let h = galley.rect.height();
                    if paint {
                        let marker_galley = ui.painter().layout_no_wrap(
                            marker,
                            FontId::proportional(font_size),
                            bullet_color,
                        );
                        let marker_x = pos.x + indent - marker_galley.rect.width() - 8.0 * scale;
                        ui.painter()
                            .galley(Pos2::new(marker_x, y), marker_galley, bullet_color);
                        ui.painter()
                            .galley(Pos2::new(pos.x + indent, y), galley, color);
                    }
                    y += h;
                }
            }
        }
    }

    y - pos.y
}
