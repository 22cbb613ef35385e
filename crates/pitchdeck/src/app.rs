use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;

use crate::audio::DefaultBackend;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::content::{self, Deck};
use crate::input::{Command, Key};
use crate::render::chrome::{self, NavState};
use crate::render::image_cache::ImageCache;
use crate::render::transition::EnterAnimation;
use crate::render::{self, RenderCtx, overlay};
use crate::shell::{PointerTarget, PresentationShell};
use crate::theme::Theme;
use crate::watch::DeckWatcher;

const SLIDE_ENTER: Duration = Duration::from_millis(800);
const DETAIL_ENTER: Duration = Duration::from_millis(400);
/// Horizontal distance an entering slide travels, at reference scale.
const SLIDE_ENTER_OFFSET: f32 = 100.0;
const TOAST_DURATION: f32 = 2.5;
const TOAST_FADE: f32 = 0.5;

/// How the presentation was asked to start.
pub struct LaunchOptions {
    /// `None` presents the bundled deck.
    pub deck_path: Option<PathBuf>,
    pub windowed: bool,
    /// 1-indexed.
    pub start_slide: Option<usize>,
    pub watch: bool,
}

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let fade_start = TOAST_DURATION - TOAST_FADE;
        if elapsed < fade_start {
            1.0
        } else if elapsed < TOAST_DURATION {
            1.0 - (elapsed - fade_start) / TOAST_FADE
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= TOAST_DURATION
    }
}

struct PresentationApp {
    shell: PresentationShell,
    theme: Theme,
    image_cache: ImageCache,
    slide_enter: EnterAnimation<usize>,
    detail_enter: EnterAnimation<(usize, usize)>,
    toast: Option<Toast>,
    show_hud: bool,
    watcher: Option<DeckWatcher>,
}

impl PresentationApp {
    fn new(shell: PresentationShell, theme: Theme, watcher: Option<DeckWatcher>) -> Self {
        let image_cache = ImageCache::new(shell.deck().base_path.clone());
        Self {
            shell,
            theme,
            image_cache,
            slide_enter: EnterAnimation::new(SLIDE_ENTER),
            detail_enter: EnterAnimation::new(DETAIL_ENTER),
            toast: None,
            show_hud: false,
            watcher,
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
    }

    fn reload_if_changed(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if !watcher.changed() {
            return;
        }
        match content::load(watcher.path()) {
            Ok(deck) => {
                self.image_cache.set_base_path(deck.base_path.clone());
                self.image_cache.clear();
                self.shell.replace_deck(deck);
                self.toast = Some(Toast::new("Deck reloaded".to_string()));
            }
            Err(e) => {
                log::warn!("reload of {} failed: {e}", watcher.path().display());
                self.toast = Some(Toast::new(format!("Reload failed: {e}")));
            }
        }
    }

    fn apply_clicks(&mut self, clicks: Vec<PointerTarget>) {
        for target in clicks {
            log::trace!("pointer {target:?}");
            if let Err(e) = self.shell.handle_pointer(target) {
                log::warn!("{target:?} rejected: {e}");
                self.toast = Some(Toast::new(e.to_string()));
            }
        }
    }

    /// Draws the mounted slide with its chrome and overlays. Returns the
    /// clicks collected while drawing and whether an animation is running.
    fn draw(&mut self, ui: &mut egui::Ui, rect: egui::Rect) -> (Vec<PointerTarget>, bool) {
        let mut clicks = Vec::new();
        let scale = render::compute_scale(rect);
        let index = self.shell.current_index();
        let selected = self.shell.selected_point().unwrap_or(0);
        let slide_progress = self.slide_enter.progress(index);
        let detail_progress = self.detail_enter.progress((index, selected));
        let animating = slide_progress < 1.0 || detail_progress < 1.0;

        let nav = NavState {
            current: index,
            count: self.shell.slide_count(),
            can_go_previous: self.shell.can_go_previous(),
            can_go_next: self.shell.can_go_next(),
            settle: self.shell.settle_progress(),
        };
        let deck = self.shell.deck();
        let cx = RenderCtx {
            theme: &self.theme,
            images: &self.image_cache,
            scale,
            direction: deck.meta.direction,
        };

        if let (Some(slide), Some(view)) = (self.shell.current_slide(), self.shell.view()) {
            let sign = if cx.is_rtl() { -1.0 } else { 1.0 };
            let offset = sign * SLIDE_ENTER_OFFSET * scale * (1.0 - slide_progress);
            let slide_rect = rect.translate(egui::vec2(offset, 0.0));
            let mut slide_ui = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(rect)
                    .id_salt(("slide", index)),
            );
            render::render_slide(
                &mut slide_ui,
                slide,
                view,
                &cx,
                slide_rect,
                slide_progress,
                detail_progress,
                &mut clicks,
            );
        }

        chrome::draw(ui, &deck.meta, nav, &cx, rect, &mut clicks);

        let modal = self.shell.modal();
        if let (Some(title), Some(body)) = (modal.title(), modal.body()) {
            overlay::draw_modal(ui.ctx(), title, body, &cx, rect, &mut clicks);
        }

        let gallery = self.shell.current_slide().and_then(|s| s.media());
        if let (Some(media), Some(carousel)) = (gallery, self.shell.carousel()) {
            if carousel.is_open() {
                overlay::draw_carousel(
                    ui.ctx(),
                    &media.gallery,
                    carousel.index(),
                    &cx,
                    rect,
                    &mut clicks,
                );
            }
        }

        if let Some(toast) = &self.toast {
            draw_toast(ui, toast, &self.theme, rect, scale);
        }
        if self.show_hud {
            draw_hud(ui, &self.shell, &self.theme, rect, scale);
        }

        (clicks, animating)
    }
}

impl eframe::App for PresentationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Collect viewport commands to send AFTER the input closure
        // (sending inside ctx.input() causes RwLock deadlock)
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut keys: Vec<Key> = Vec::new();
        let mut toggle_theme = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }
            if i.key_pressed(egui::Key::F) {
                let fullscreen = i.viewport().fullscreen.unwrap_or(false);
                viewport_cmds.push(egui::ViewportCommand::Fullscreen(!fullscreen));
            }
            if i.key_pressed(egui::Key::D) {
                toggle_theme = true;
            }
            if i.key_pressed(egui::Key::H) {
                self.show_hud = !self.show_hud;
            }
            keys.extend(i.events.iter().filter_map(translate_key));
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }
        if toggle_theme {
            self.toggle_theme();
        }
        for key in keys {
            self.shell.handle_key(key);
        }

        self.reload_if_changed();
        if self.shell.poll() {
            ctx.request_repaint();
        }
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }

        let bg = self.theme.background;
        let mut clicks = Vec::new();
        let mut animating = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                (clicks, animating) = self.draw(ui, rect);
            });
        self.apply_clicks(clicks);

        if animating || self.toast.is_some() {
            ctx.request_repaint();
        }
        // Wake up once the navigation lock expires so the arrows re-enable
        if self.shell.is_transitioning() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        if self.watcher.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

/// Key presses as the presentation core sees them, auto-repeats included.
/// Chords with a command modifier are left to the app.
fn translate_key(event: &egui::Event) -> Option<Key> {
    let egui::Event::Key {
        key,
        pressed: true,
        modifiers,
        ..
    } = event
    else {
        return None;
    };
    if modifiers.command || modifiers.alt {
        return None;
    }
    match key {
        egui::Key::ArrowUp => Some(Key::ArrowUp),
        egui::Key::ArrowDown => Some(Key::ArrowDown),
        egui::Key::ArrowLeft => Some(Key::ArrowLeft),
        egui::Key::ArrowRight => Some(Key::ArrowRight),
        egui::Key::Escape => Some(Key::Escape),
        other => {
            let mut chars = other.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => Some(Key::char(c)),
                _ => None,
            }
        }
    }
}

fn draw_toast(ui: &egui::Ui, toast: &Toast, theme: &Theme, rect: egui::Rect, scale: f32) {
    let opacity = toast.opacity();
    if opacity <= 0.0 {
        return;
    }
    let toast_color = Theme::with_opacity(theme.foreground, opacity * 0.9);
    let toast_bg = Theme::with_opacity(theme.panel, opacity * 0.95);
    let galley = ui.painter().layout_no_wrap(
        toast.message.clone(),
        egui::FontId::proportional(20.0 * scale),
        toast_color,
    );
    let padding = 16.0 * scale;
    let toast_rect = egui::Rect::from_min_size(
        egui::pos2(
            rect.center().x - galley.rect.width() / 2.0 - padding,
            rect.top() + 120.0 * scale,
        ),
        egui::vec2(
            galley.rect.width() + padding * 2.0,
            galley.rect.height() + padding * 2.0,
        ),
    );
    ui.painter().rect_filled(toast_rect, 8.0 * scale, toast_bg);
    let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
    ui.painter().galley(text_pos, galley, toast_color);
}

fn draw_hud(
    ui: &egui::Ui,
    shell: &PresentationShell,
    theme: &Theme,
    rect: egui::Rect,
    scale: f32,
) {
    let keymap = shell.keymap();
    let bound = |command: Command| {
        keymap
            .keys_for(command)
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(" / ")
    };
    let shortcuts = [
        (bound(Command::NextSlide), "Next slide"),
        (bound(Command::PreviousSlide), "Previous slide"),
        (bound(Command::Cancel), "Close dialog"),
        ("D".to_string(), "Toggle theme"),
        ("F".to_string(), "Toggle fullscreen"),
        ("H".to_string(), "Toggle this HUD"),
        ("Q".to_string(), "Quit"),
    ];

    let bg = Theme::with_opacity(theme.panel, 0.94);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0 * scale;
    let line_height = 32.0 * scale;
    let hud_height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0 * scale;
    let hud_width = 360.0 * scale;
    let hud_rect = egui::Rect::from_center_size(rect.center(), egui::vec2(hud_width, hud_height));
    ui.painter().rect_filled(hud_rect, 12.0 * scale, bg);

    let title_galley = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        egui::FontId::proportional(20.0 * scale),
        Theme::with_opacity(theme.heading_color, 0.9),
    );
    let title_pos = egui::pos2(hud_rect.left() + padding, hud_rect.top() + padding);
    ui.painter().galley(title_pos, title_galley, text_color);

    let mut y = hud_rect.top() + padding + 40.0 * scale;
    for (key, desc) in shortcuts {
        let key_galley =
            ui.painter()
                .layout_no_wrap(key, egui::FontId::monospace(15.0 * scale), key_color);
        ui.painter()
            .galley(egui::pos2(hud_rect.left() + padding, y), key_galley, key_color);

        let desc_galley = ui.painter().layout_no_wrap(
            desc.to_string(),
            egui::FontId::proportional(15.0 * scale),
            text_color,
        );
        ui.painter().galley(
            egui::pos2(hud_rect.left() + padding + 150.0 * scale, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

/// Put the configured font in front of egui's built-in proportional fonts.
fn install_font(ctx: &egui::Context, path: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;
    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(
        "deck".to_string(),
        Arc::new(egui::FontData::from_owned(bytes)),
    );
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, "deck".to_string());
    ctx.set_fonts(fonts);
    Ok(())
}

/// Window icon from the deck logo, when it has one that decodes.
fn load_app_icon(deck: &Deck) -> Option<egui::IconData> {
    let logo = deck.meta.logo.as_deref()?;
    let image = image::open(deck.resolve(logo)).ok()?.into_rgba8();
    let (w, h) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width: w,
        height: h,
    })
}

fn load_deck(path: Option<&Path>) -> anyhow::Result<Deck> {
    match path {
        Some(path) => {
            content::load(path).with_context(|| format!("Failed to load deck {}", path.display()))
        }
        None => {
            // Bundled deck assets are looked up next to where we run
            let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            content::bundled(&base).context("Bundled deck is invalid")
        }
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let deck = load_deck(options.deck_path.as_deref())?;

    let watcher = match (&options.deck_path, options.watch) {
        (Some(path), true) => Some(DeckWatcher::new(path)?),
        _ => None,
    };

    let title = deck.display_title();
    let icon = load_app_icon(&deck);

    // CLI flag first, then config; both 1-indexed
    let start = options
        .start_slide
        .or(config.start_slide())
        .map(|s| s.saturating_sub(1))
        .unwrap_or(0);

    let backend = Box::new(DefaultBackend::new(config.volume()));
    let mut shell = PresentationShell::new(deck, SystemClock::new(), config.transition(), backend);
    shell.start_at(start);

    let theme = Theme::from_name(config.theme_name());
    let font = config.font().map(Path::to_path_buf);

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };
    let viewport = if let Some(icon) = icon {
        viewport.with_icon(Arc::new(icon))
    } else {
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            if let Some(font) = &font {
                if let Err(e) = install_font(&cc.egui_ctx, font) {
                    log::warn!("{e:#}");
                }
            }
            shell.mount();
            Ok(Box::new(PresentationApp::new(shell, theme, watcher)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_event(key: egui::Key, modifiers: egui::Modifiers) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    #[test]
    fn test_translate_navigation_keys() {
        let none = egui::Modifiers::NONE;
        assert_eq!(translate_key(&key_event(egui::Key::ArrowDown, none)), Some(Key::ArrowDown));
        assert_eq!(translate_key(&key_event(egui::Key::N, none)), Some(Key::Char('n')));
        assert_eq!(translate_key(&key_event(egui::Key::P, none)), Some(Key::Char('p')));
        assert_eq!(translate_key(&key_event(egui::Key::Escape, none)), Some(Key::Escape));
    }

    #[test]
    fn test_translate_ignores_chords_and_releases() {
        assert_eq!(translate_key(&key_event(egui::Key::N, egui::Modifiers::COMMAND)), None);
        let release = egui::Event::Key {
            key: egui::Key::N,
            physical_key: None,
            pressed: false,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        };
        assert_eq!(translate_key(&release), None);
        assert_eq!(translate_key(&key_event(egui::Key::Space, egui::Modifiers::NONE)), None);
    }

    #[test]
    fn test_held_key_advances_once_per_lock_window() {
        use crate::audio::testing::RecordingBackend;
        use crate::clock::ManualClock;
        use crate::navigator::DEFAULT_TRANSITION;

        let clock = ManualClock::new();
        let mut shell = PresentationShell::new(
            content::test_deck(5),
            clock.clone(),
            DEFAULT_TRANSITION,
            Box::new(RecordingBackend::default()),
        );
        shell.mount();

        let held = egui::Event::Key {
            key: egui::Key::ArrowDown,
            physical_key: None,
            pressed: true,
            repeat: true,
            modifiers: egui::Modifiers::NONE,
        };
        assert_eq!(translate_key(&held), Some(Key::ArrowDown));

        // Repeats arriving inside the lock window are absorbed
        for _ in 0..10 {
            shell.handle_key(Key::ArrowDown);
            clock.advance(Duration::from_millis(30));
        }
        assert_eq!(shell.current_index(), 1);

        clock.advance(DEFAULT_TRANSITION);
        if let Some(key) = translate_key(&held) {
            shell.handle_key(key);
        }
        assert_eq!(shell.current_index(), 2);
    }

    #[test]
    fn test_toast_fades_out() {
        let mut toast = Toast::new("hi".to_string());
        assert_eq!(toast.opacity(), 1.0);
        toast.start = Instant::now() - Duration::from_secs(10);
        assert!(toast.is_expired());
        assert_eq!(toast.opacity(), 0.0);
    }
}
