//! Terminal host: event pump, frame pacing and page rendering.

use crate::animation::{AvatarAnimationLoop, AvatarPose};
use crate::avatar::{RigSpec, Scene, EDGES};
use crate::background::Background;
use crate::color::Rgb;
use crate::config::Config;
use crate::contact::{ContactController, ContactForm, DisabledRelay, EmailJsRelay, EmailRelay, FormField};
use crate::error::Result;
use crate::graphics::{draw_line, draw_triangle, Framebuffer};
use crate::halfblock;
use crate::page::{footer_line, render_section, ContactView, Navigation, Section};
use crate::palette::Palette;
use crate::state::{FpsCounter, FrameClock, ViewState};
use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::theme::{SystemColorScheme, ThemeController, ThemeMode};
use crate::vertex::Camera;
use chrono::Datelike;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub type Theme = ThemeController<Box<dyn KeyValueStore>>;

/// Relays are shared with the worker thread that sends the contact form
pub type Relay = Box<dyn EmailRelay + Send + Sync>;

/// Options for the interactive page that come from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub rig: Option<PathBuf>,
    pub theme: Option<ThemeMode>,
    pub ephemeral: bool,
    pub seed: Option<u64>,
    pub fps: Option<u32>,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

/// Navigation bar on the first row, footer on the last, avatar and text
/// panel side by side in between (avatar alone on narrow terminals)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
    pub avatar: Rect,
    pub panel: Option<Rect>,
}

impl Layout {
    pub const MIN_SPLIT_COLS: u16 = 60;

    pub fn compute(cols: u16, rows: u16) -> Layout {
        let body_height = rows.saturating_sub(2).max(1);
        if cols >= Self::MIN_SPLIT_COLS {
            let avatar_width = cols / 2;
            Layout {
                cols,
                rows,
                avatar: Rect { x: 0, y: 1, width: avatar_width, height: body_height },
                panel: Some(Rect {
                    x: avatar_width + 1,
                    y: 1,
                    width: cols - avatar_width - 1,
                    height: body_height,
                }),
            }
        } else {
            Layout {
                cols,
                rows,
                avatar: Rect { x: 0, y: 1, width: cols, height: body_height },
                panel: None,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Section(Section),
    ThemeToggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub start: u16,
    pub target: NavTarget,
}

impl NavItem {
    fn width(&self) -> u16 {
        self.label.chars().count() as u16 + 2
    }
}

/// Restores the terminal on drop, whichever way the loop exits
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter<W: Write>(out: &mut W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            event::EnableMouseCapture,
            cursor::Hide
        )?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            ResetColor,
            cursor::Show,
            event::DisableMouseCapture,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

pub struct App {
    config: Config,
    theme: Theme,
    animation: AvatarAnimationLoop,
    scene: Scene,
    background: Background,
    navigation: Navigation,
    contact: ContactController<Relay>,
    editing: Option<FormField>,
    view: ViewState,
    clock: FrameClock,
    fps: FpsCounter,
    framebuffer: Framebuffer,
    layout: Layout,
    pose: AvatarPose,
    year: i32,
}

impl App {
    pub fn new(
        config: Config,
        theme: Theme,
        relay: Relay,
        rig: RigSpec,
        background: Background,
        size: (u16, u16),
    ) -> Self {
        let view = ViewState::new(config.display.zoom, config.display.light_position);
        App {
            animation: AvatarAnimationLoop::new(config.animation.clone()),
            scene: Scene::new(rig),
            background,
            navigation: Navigation::default(),
            contact: ContactController::new(relay),
            editing: None,
            view,
            clock: FrameClock::default(),
            fps: FpsCounter::new(Instant::now()),
            framebuffer: Framebuffer::new(0, 0),
            layout: Layout::compute(size.0, size.1),
            pose: AvatarPose::default(),
            year: chrono::Local::now().year(),
            theme,
            config,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn animation(&self) -> &AvatarAnimationLoop {
        &self.animation
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn editing(&self) -> Option<FormField> {
        self.editing
    }

    pub fn contact(&self) -> &ContactController<Relay> {
        &self.contact
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn pose(&self) -> &AvatarPose {
        &self.pose
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.view.debug = debug;
    }

    pub fn handle_event(&mut self, event: Event) -> Control {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Control::Continue
            }
            Event::Resize(cols, rows) => {
                self.layout = Layout::compute(cols, rows);
                Control::Continue
            }
            _ => Control::Continue,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        if let Some(field) = self.editing {
            self.handle_form_key(field, key.code);
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.theme.toggle_theme();
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.view.debug = !self.view.debug,
            KeyCode::Char('p') | KeyCode::Char('P') => self.view.paused = !self.view.paused,
            KeyCode::Char('w') | KeyCode::Char('W') => {
                if !self.view.paused {
                    self.view.wireframe = !self.view.wireframe;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if !self.view.paused {
                    // Reset to default values
                    self.animation.reset();
                    self.view.zoom = self.config.display.zoom.clamp(0.1, 10.0);
                    self.view.wireframe = false;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.view.zoom_by(1.1),
            KeyCode::Char('-') => self.view.zoom_by(1.0 / 1.1),
            KeyCode::Tab => self.navigation.next(),
            KeyCode::BackTab => self.navigation.previous(),
            KeyCode::Char(c @ '1'..='3') => {
                self.navigation.go_to(Section::ALL[(c as u8 - b'1') as usize]);
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                self.navigation.go_to(Section::Contact);
                self.contact.reset_status();
                self.editing = Some(FormField::Name);
            }
            _ => {}
        }
        Control::Continue
    }

    fn handle_form_key(&mut self, field: FormField, code: KeyCode) {
        match code {
            KeyCode::Esc => self.editing = None,
            KeyCode::Tab => self.editing = Some(field.next()),
            KeyCode::Backspace => {
                self.contact.form_mut().field_mut(field).pop();
            }
            KeyCode::Enter => {
                self.contact.submit_in_background();
                self.editing = None;
            }
            KeyCode::Char(c) => self.contact.form_mut().field_mut(field).push(c),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let avatar = self.layout.avatar;
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                // Cell centres, relative to the avatar viewport
                self.animation.on_pointer_move(
                    f64::from(mouse.column) - f64::from(avatar.x) + 0.5,
                    f64::from(mouse.row) - f64::from(avatar.y) + 0.5,
                    f64::from(avatar.width),
                    f64::from(avatar.height),
                );
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if avatar.contains(mouse.column, mouse.row) {
                    if !self.view.paused {
                        self.animation.on_click();
                    }
                } else if mouse.row == 0 {
                    match self.nav_target_at(mouse.column) {
                        Some(NavTarget::Section(section)) => self.navigation.go_to(section),
                        Some(NavTarget::ThemeToggle) => {
                            self.theme.toggle_theme();
                        }
                        None => {}
                    }
                }
            }
            MouseEventKind::ScrollDown => self.navigation.next(),
            MouseEventKind::ScrollUp => self.navigation.previous(),
            _ => {}
        }
    }

    /// Advances animation time by `dt`, computes the next pose and picks up
    /// the result of a contact send once it arrives
    pub fn tick(&mut self, dt: Duration) {
        let elapsed = self.clock.advance(dt, self.view.paused);
        if !self.view.paused {
            self.pose = self.animation.advance_frame(elapsed);
        }
        self.contact.poll();
        self.fps.record(Instant::now());
    }

    pub fn nav_items(&self) -> Vec<NavItem> {
        let mut labels: Vec<(String, NavTarget)> = Section::ALL
            .iter()
            .map(|s| (s.title().to_string(), NavTarget::Section(*s)))
            .collect();
        let theme_label = if self.theme.mode().is_dark() { "☾ dark" } else { "☀ light" };
        labels.push((theme_label.to_string(), NavTarget::ThemeToggle));

        let total: u16 = labels.iter().map(|(l, _)| l.chars().count() as u16 + 2).sum();
        let mut start = self.layout.cols.saturating_sub(total);
        labels
            .into_iter()
            .map(|(label, target)| {
                let item = NavItem { label, start, target };
                start += item.width();
                item
            })
            .collect()
    }

    fn nav_target_at(&self, col: u16) -> Option<NavTarget> {
        self.nav_items()
            .into_iter()
            .find(|item| col >= item.start && col < item.start + item.width())
            .map(|item| item.target)
    }

    /// Rasterizes the avatar viewport into the framebuffer
    fn paint_avatar(&mut self, palette: &Palette) {
        let width = self.layout.avatar.width as usize;
        let height = self.layout.avatar.height as usize * 2;
        self.framebuffer.clear(width, height, palette.background);
        if width == 0 || height == 0 {
            return;
        }

        for particle in self.background.sample(self.clock.elapsed()) {
            let x = (particle.x * (width - 1) as f64).round() as isize;
            let y = (particle.y * (height - 1) as f64).round() as isize;
            self.framebuffer.blend(x, y, palette.particle, particle.opacity * 0.6);
        }

        let (lo, hi) = self.scene.rig().vertical_bounds();
        // headroom for the click bounce
        let camera = Camera::fit(width, height, (hi - lo) * 1.3, self.view.zoom, [0.0, (lo + hi) / 2.0]);

        if self.view.wireframe {
            for segment in self.scene.pose(&self.pose, palette) {
                for &(start, end) in &EDGES {
                    let v0 = camera.project(segment.corners[start], [0.0; 3]);
                    let v1 = camera.project(segment.corners[end], [0.0; 3]);
                    draw_line(
                        v0.screen_position[0],
                        v0.screen_position[1],
                        v1.screen_position[0],
                        v1.screen_position[1],
                        &mut self.framebuffer,
                        palette.wireframe,
                    );
                }
            }
        } else {
            for triangle in self.scene.mesh(&self.pose, palette) {
                let [a, b, c] = triangle.vertices.map(|v| camera.project(v, triangle.normal));
                draw_triangle(&a, &b, &c, &mut self.framebuffer, &self.view.light_position, triangle.color);
            }
        }
    }

    pub fn render<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let palette = self.theme.palette();
        self.paint_avatar(&palette);

        self.render_nav(out, &palette)?;

        let avatar = self.layout.avatar;
        let cells = halfblock::encode(&self.framebuffer);
        halfblock::queue_cells(out, &cells, avatar.x, avatar.y)?;

        if self.view.debug {
            for (i, line) in self.debug_lines().iter().enumerate() {
                if i as u16 >= avatar.height {
                    break;
                }
                print_at(out, avatar.x + 1, avatar.y + i as u16, line, avatar.width.saturating_sub(1), palette.text, palette.background)?;
            }
        }

        // Display 'Paused' if the animation is paused
        if self.view.paused {
            let label = Label::centered(PAUSED_LABEL, avatar);
            print_at(out, label.col, label.row, PAUSED_LABEL, label.width, palette.background, palette.text)?;
        }

        if let Some(panel) = self.layout.panel {
            self.render_panel(out, panel, &palette)?;
        }

        let footer = footer_line(&self.config.profile, self.year);
        print_at(out, 0, self.layout.rows.saturating_sub(1), &footer, self.layout.cols, palette.muted, palette.background)?;
        queue!(out, ResetColor)?;
        Ok(())
    }

    fn render_nav<W: Write>(&self, out: &mut W, palette: &Palette) -> io::Result<()> {
        let bar = if self.navigation.scrolled() {
            palette.background.mix(palette.accent, 0.15)
        } else {
            palette.background
        };
        let brand = format!(" {}'s Portfolio", self.config.profile.name);
        print_at(out, 0, 0, &brand, self.layout.cols, palette.accent_secondary, bar)?;
        for item in self.nav_items() {
            let fg = match item.target {
                NavTarget::Section(s) if s == self.navigation.current() => palette.accent,
                _ => palette.text,
            };
            print_at(out, item.start, 0, &format!(" {} ", item.label), item.width(), fg, bar)?;
        }
        Ok(())
    }

    fn render_panel<W: Write>(&self, out: &mut W, panel: Rect, palette: &Palette) -> io::Result<()> {
        let section = self.navigation.current();
        let view = ContactView {
            form: self.contact.form(),
            status: self.contact.status(),
            focus: self.editing,
        };
        let text_width = panel.width.saturating_sub(2) as usize;
        let title = format!("── {} ──", section.title());
        let lines = render_section(section, &self.config.profile, &view, text_width);

        for row in 0..panel.height {
            let (text, fg) = match row {
                0 => (title.as_str(), palette.accent),
                1 => ("", palette.text),
                n => {
                    let line = lines.get(n as usize - 2).map(String::as_str).unwrap_or("");
                    let fg = if line.starts_with("Sending failed") {
                        palette.error
                    } else {
                        palette.text
                    };
                    (line, fg)
                }
            };
            print_at(out, panel.x, panel.y + row, &format!(" {}", text), panel.width, fg, palette.background)?;
        }
        Ok(())
    }

    fn debug_lines(&self) -> Vec<String> {
        let rotation = self.animation.rotation();
        let pulse = self.animation.pulse();
        let light = self.view.light_position;
        vec![
            format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            format!("Yaw: {:.2}, Pitch: {:.2}", rotation.yaw, rotation.pitch),
            format!("Pulse: {:.2}", pulse.remaining_intensity),
            format!("Light: ({:.2}, {:.2}, {:.2})", light[0], light[1], light[2]),
            format!("FPS: {:.2}", self.fps.fps()),
            format!("Zoom: {:.2}", self.view.zoom),
            format!("Theme: {}", self.theme.mode()),
        ]
    }
}

const PAUSED_LABEL: &str = " Paused ";

/// Placement of a one-line overlay inside a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Label {
    col: u16,
    row: u16,
    width: u16,
}

impl Label {
    /// Centred in `area` and clipped to its width
    fn centered(text: &str, area: Rect) -> Label {
        let width = (text.chars().count() as u16).min(area.width);
        Label {
            col: area.x + (area.width - width) / 2,
            row: area.y + area.height / 2,
            width,
        }
    }
}

/// Prints `text` at (col, row), truncated or space-padded to exactly `width` columns
fn print_at<W: Write>(out: &mut W, col: u16, row: u16, text: &str, width: u16, fg: Rgb, bg: Rgb) -> io::Result<()> {
    let width = width as usize;
    let mut line: String = text.chars().take(width).collect();
    let len = line.chars().count();
    line.extend(std::iter::repeat(' ').take(width - len));
    queue!(
        out,
        cursor::MoveTo(col, row),
        SetForegroundColor(fg.into()),
        SetBackgroundColor(bg.into()),
        Print(line)
    )
}

fn open_store(ephemeral: bool) -> Box<dyn KeyValueStore> {
    if ephemeral {
        return Box::new(MemoryStore::new());
    }
    match FileStore::default_location() {
        Some(path) => {
            tracing::debug!("preferences at {}", path.display());
            Box::new(FileStore::new(path))
        }
        None => {
            tracing::warn!("no data directory available, preferences will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

pub fn open_theme(ephemeral: bool) -> Theme {
    ThemeController::new(open_store(ephemeral), &SystemColorScheme)
}

pub fn open_relay(config: &Config) -> Relay {
    match EmailJsRelay::from_config(&config.relay) {
        Ok(relay) => Box::new(relay),
        Err(e) => {
            tracing::info!("contact relay disabled: {}", e);
            Box::new(DisabledRelay(e.to_string()))
        }
    }
}

/// Reads the config file and applies the relay overrides from the environment
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(explicit)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Sends one message outside the interactive page; a missing relay
/// configuration is an error here rather than a disabled form
pub fn send_message(config: &Config, form: &ContactForm) -> Result<()> {
    let relay = EmailJsRelay::from_config(&config.relay)?;
    form.validate()?;
    relay.send(form)?;
    tracing::info!("contact message sent");
    Ok(())
}

fn terminal_size() -> (u16, u16) {
    terminal::size()
        .ok()
        .or_else(|| termsize::get().map(|size| (size.cols, size.rows)))
        .unwrap_or((80, 24))
}

/// Runs the interactive page until the user quits
pub fn run(mut config: Config, options: RunOptions) -> Result<()> {
    let mut theme = open_theme(options.ephemeral);
    if let Some(mode) = options.theme {
        theme.apply_theme(mode);
    }

    let rig_path = options.rig.clone().or_else(|| config.display.rig.clone());
    let rig = match rig_path {
        Some(path) => RigSpec::load_or_placeholder(&path),
        None => RigSpec::default_figure(),
    };

    if let Some(seed) = options.seed {
        config.background.seed = Some(seed);
    }
    let background = Background::from_config(&config.background);
    let fps = options.fps.unwrap_or(config.display.fps).clamp(1, 240);
    let relay = open_relay(&config);

    let mut app = App::new(config, theme, relay, rig, background, terminal_size());
    app.set_debug(options.debug);

    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));
    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;
    tracing::info!("scene mounted at {} fps", fps);

    let mut last = Instant::now();
    loop {
        let deadline = last + frame;
        while event::poll(deadline.saturating_duration_since(Instant::now()))? {
            if app.handle_event(event::read()?) == Control::Quit {
                tracing::info!("scene unmounted");
                return Ok(());
            }
        }
        let now = Instant::now();
        app.tick(now - last);
        last = now;
        app.render(&mut stdout)?;
        stdout.flush()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::contact::{RelayError, SubmissionStatus};
    use crate::error::Error;
    use std::sync::{mpsc, Mutex};

    struct AcceptAll;

    impl EmailRelay for AcceptAll {
        fn send(&self, _form: &ContactForm) -> std::result::Result<(), RelayError> {
            Ok(())
        }
    }

    /// Holds every send until the test lets it through
    struct GatedRelay {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl EmailRelay for GatedRelay {
        fn send(&self, _form: &ContactForm) -> std::result::Result<(), RelayError> {
            let gate = self.gate.lock().map_err(|e| RelayError::Unavailable(e.to_string()))?;
            gate.recv().map_err(|e| RelayError::Unavailable(e.to_string()))
        }
    }

    fn app(size: (u16, u16)) -> App {
        app_with(size, Box::new(AcceptAll))
    }

    fn app_with(size: (u16, u16), relay: Relay) -> App {
        let theme: Theme = ThemeController::new(Box::new(MemoryStore::new()), &Some(false));
        App::new(
            Config::default(),
            theme,
            relay,
            RigSpec::default_figure(),
            Background::seeded(10, 3),
            size,
        )
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn code(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn layout_splits_wide_terminals() {
        let wide = Layout::compute(100, 30);
        assert_eq!(wide.avatar, Rect { x: 0, y: 1, width: 50, height: 28 });
        assert_eq!(wide.panel.map(|p| p.width), Some(49));
        assert!(Layout::compute(40, 20).panel.is_none());
    }

    #[test]
    fn theme_key_toggles_and_persists() {
        let mut app = app((100, 30));
        assert_eq!(app.theme().mode(), ThemeMode::Light);
        app.handle_event(key('t'));
        assert_eq!(app.theme().mode(), ThemeMode::Dark);
        assert_eq!(app.theme().store().get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn quit_keys() {
        let mut app = app((100, 30));
        assert_eq!(app.handle_event(key('x')), Control::Continue);
        assert_eq!(app.handle_event(key('q')), Control::Quit);
        assert_eq!(app.handle_event(code(KeyCode::Esc)), Control::Quit);
    }

    #[test]
    fn pointer_and_click_reach_the_animation() {
        let mut app = app((100, 30));
        app.handle_event(mouse(MouseEventKind::Moved, 49, 1));
        let pointer = app.animation().pointer();
        assert!(pointer.normalized_x > 0.9);
        assert!(pointer.normalized_y > 0.9);

        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert!(app.animation().pulse().active);
        app.tick(Duration::from_millis(16));
        assert!(app.pose().bounce > 0.1);
    }

    #[test]
    fn pause_freezes_pose() {
        let mut app = app((100, 30));
        app.tick(Duration::from_millis(100));
        app.handle_event(key('p'));
        let frozen = *app.pose();
        app.tick(Duration::from_millis(500));
        assert_eq!(*app.pose(), frozen);
        // clicks are ignored while paused
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert!(!app.animation().pulse().active);
    }

    #[test]
    fn navigation_by_keys_scroll_and_nav_bar() {
        let mut app = app((100, 30));
        app.handle_event(code(KeyCode::Tab));
        assert_eq!(app.navigation().current(), Section::About);
        app.handle_event(key('3'));
        assert_eq!(app.navigation().current(), Section::Contact);
        app.handle_event(mouse(MouseEventKind::ScrollDown, 70, 10));
        assert_eq!(app.navigation().current(), Section::Home);

        let about = app
            .nav_items()
            .into_iter()
            .find(|i| i.target == NavTarget::Section(Section::About))
            .unwrap();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), about.start + 1, 0));
        assert_eq!(app.navigation().current(), Section::About);

        let toggle = app.nav_items().pop().unwrap();
        assert_eq!(toggle.target, NavTarget::ThemeToggle);
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), toggle.start, 0));
        assert_eq!(app.theme().mode(), ThemeMode::Dark);
    }

    fn fill_contact_form(app: &mut App) {
        app.handle_event(key('e'));
        assert_eq!(app.editing(), Some(FormField::Name));
        for c in "Ada".chars() {
            app.handle_event(key(c));
        }
        app.handle_event(code(KeyCode::Tab));
        for c in "ada@example.com".chars() {
            app.handle_event(key(c));
        }
        app.handle_event(code(KeyCode::Tab));
        for c in "Hi q!x".chars() {
            app.handle_event(key(c));
        }
        app.handle_event(code(KeyCode::Backspace));
        // 'q' is text while editing
        assert_eq!(app.contact().form().message, "Hi q!");
    }

    fn tick_until_sent(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.contact().status() == &SubmissionStatus::Sending {
            assert!(Instant::now() < deadline, "send never finished");
            std::thread::sleep(Duration::from_millis(5));
            app.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn contact_form_editing_and_submit() {
        let mut app = app((100, 30));
        fill_contact_form(&mut app);
        app.handle_event(code(KeyCode::Enter));
        assert_eq!(app.editing(), None);
        tick_until_sent(&mut app);
        assert_eq!(app.contact().status(), &SubmissionStatus::Success);
        assert_eq!(app.contact().form().message, "");
    }

    #[test]
    fn slow_relay_does_not_stall_the_frame_loop() {
        let (release, gate) = mpsc::channel();
        let mut app = app_with((100, 30), Box::new(GatedRelay { gate: Mutex::new(gate) }));
        fill_contact_form(&mut app);

        let started = Instant::now();
        assert_eq!(app.handle_event(code(KeyCode::Enter)), Control::Continue);
        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(app.contact().status(), &SubmissionStatus::Sending);

        // frames keep advancing and input is still handled while the relay hangs
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.tick(Duration::from_millis(16));
        assert!(app.pose().bounce > 0.1);
        assert_eq!(app.contact().status(), &SubmissionStatus::Sending);
        assert_eq!(app.handle_event(key('q')), Control::Quit);

        release.send(()).unwrap();
        tick_until_sent(&mut app);
        assert_eq!(app.contact().status(), &SubmissionStatus::Success);
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("folio3d.toml");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(Error::Config(ConfigError::Io { .. }))
        ));

        let present = dir.path().join("present.toml");
        std::fs::write(&present, "[display]\nfps = 24\n").unwrap();
        assert_eq!(load_config(Some(&present)).unwrap().display.fps, 24);
    }

    #[test]
    fn send_message_needs_relay_tokens() {
        let form = ContactForm::new("Ada", "ada@example.com", "Hello");
        assert!(matches!(
            send_message(&Config::default(), &form),
            Err(Error::Relay(RelayError::MissingToken("service_id")))
        ));
    }

    #[test]
    fn paused_label_stays_inside_the_viewport() {
        let wide = Label::centered(PAUSED_LABEL, Rect { x: 0, y: 1, width: 50, height: 28 });
        assert_eq!(wide, Label { col: 21, row: 15, width: 8 });

        for width in 0..8 {
            let area = Rect { x: 3, y: 1, width, height: 4 };
            let label = Label::centered(PAUSED_LABEL, area);
            assert_eq!(label.width, width);
            assert!(label.col >= area.x);
            assert!(label.col + label.width <= area.x + area.width);
        }
    }

    #[test]
    fn render_fills_the_screen_without_panicking() {
        for size in [(100, 30), (40, 12), (1, 1), (0, 0)] {
            let mut app = app(size);
            app.tick(Duration::from_millis(16));
            let mut out = Vec::new();
            app.render(&mut out).unwrap();
            app.handle_event(key('w'));
            app.handle_event(key('d'));
            app.handle_event(key('p'));
            app.render(&mut out).unwrap();
        }
    }

    #[test]
    fn avatar_is_drawn_in_the_viewport() {
        let mut app = app((100, 30));
        app.tick(Duration::from_millis(16));
        let palette = app.theme().palette();
        app.paint_avatar(&palette);
        let fb = &app.framebuffer;
        let painted = fb.pixels.iter().filter(|p| **p != palette.background).count();
        assert!(painted > 100, "only {painted} pixels painted");
    }
}
