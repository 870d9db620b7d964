use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Local};
use eframe::egui::{self, Direction, Layout, RichText, Stroke};

use crate::countdown::{self, CountdownSnapshot};
use crate::theme::Theme;

const TICK_STEP: Duration = Duration::from_secs(1);
const WINDOWED_SIZE: [f32; 2] = [1000.0, 400.0];

pub fn run_gui(target: DateTime<Local>, theme: Theme, windowed: bool) -> Result<()> {
    let title = format!("Timer ending at {}", target.format("%H:%M"));
    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size(WINDOWED_SIZE)
    } else {
        egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_fullscreen(true)
            .with_decorations(false)
    };
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let app = CountdownApp::new(target, theme);
    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| {
            configure_visuals(&cc.egui_ctx, &app.theme);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch timer window: {err}"))?;

    Ok(())
}

fn configure_visuals(ctx: &egui::Context, theme: &Theme) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = theme.background();
    visuals.window_fill = theme.background();
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(2.0, theme.divider_color());
    ctx.set_visuals(visuals);
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum TickerState {
    Running,
    Closed,
}

/// One-second cadence handle. Lives for the whole window lifetime and is
/// cancelled exactly once when the window goes away.
#[derive(Debug)]
struct Ticker {
    step: Duration,
    next_tick: Instant,
    state: TickerState,
}

impl Ticker {
    fn new(step: Duration, now: Instant) -> Self {
        Self {
            step,
            next_tick: now,
            state: TickerState::Running,
        }
    }

    /// Reports whether a tick is due and advances the cadence anchor past
    /// `now`. Missed ticks collapse into one instead of replaying a backlog.
    fn poll(&mut self, now: Instant) -> bool {
        if self.state != TickerState::Running || now < self.next_tick {
            return false;
        }
        while self.next_tick <= now {
            self.next_tick += self.step;
        }
        true
    }

    fn time_to_next(&self, now: Instant) -> Duration {
        self.next_tick.saturating_duration_since(now)
    }

    fn cancel(&mut self) -> bool {
        if self.state == TickerState::Running {
            self.state = TickerState::Closed;
            true
        } else {
            false
        }
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.state == TickerState::Running
    }
}

/// Style actually applied to the labels, regenerated from the theme whenever
/// the window's inner dimensions change.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AppliedStyle {
    width: f32,
    height: f32,
    font_px: f32,
}

impl AppliedStyle {
    fn for_size(theme: &Theme, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            font_px: theme.font_px(width, height),
        }
    }

    fn matches(&self, width: f32, height: f32) -> bool {
        self.width == width && self.height == height
    }
}

struct CountdownApp {
    target: DateTime<Local>,
    theme: Theme,
    snapshot: CountdownSnapshot,
    ticker: Ticker,
    applied: Option<AppliedStyle>,
}

impl CountdownApp {
    fn new(target: DateTime<Local>, theme: Theme) -> Self {
        Self {
            snapshot: countdown::snapshot(target, Local::now()),
            ticker: Ticker::new(TICK_STEP, Instant::now()),
            applied: None,
            target,
            theme,
        }
    }

    fn applied_style(&mut self, width: f32, height: f32) -> AppliedStyle {
        match self.applied {
            Some(style) if style.matches(width, height) => style,
            _ => {
                let style = AppliedStyle::for_size(&self.theme, width, height);
                self.applied = Some(style);
                style
            }
        }
    }
}

impl eframe::App for CountdownApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ticker.poll(Instant::now()) {
            self.snapshot = countdown::snapshot(self.target, Local::now());
        }

        let panel_frame = egui::Frame::new().fill(self.theme.background());
        egui::CentralPanel::default()
            .frame(panel_frame)
            .show(ctx, |ui| {
                let size = ui.available_size();
                let style = self.applied_style(size.x, size.y);
                let color = self.theme.text_color(self.snapshot.overdue);
                let half_height = ui.available_height() / 2.0;

                ui.allocate_ui_with_layout(
                    egui::vec2(ui.available_width(), half_height),
                    Layout::centered_and_justified(Direction::TopDown),
                    |ui| {
                        ui.label(
                            RichText::new(self.snapshot.clock_text.as_str())
                                .size(style.font_px)
                                .color(color)
                                .strong(),
                        );
                    },
                );
                ui.separator();
                ui.allocate_ui_with_layout(
                    egui::vec2(ui.available_width(), ui.available_height()),
                    Layout::centered_and_justified(Direction::TopDown),
                    |ui| {
                        ui.label(
                            RichText::new(self.snapshot.remaining_text.as_str())
                                .size(style.font_px)
                                .color(color)
                                .strong(),
                        );
                    },
                );
            });

        ctx.request_repaint_after(self.ticker.time_to_next(Instant::now()));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.ticker.cancel();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn ticker_is_due_immediately_then_once_per_step() {
        let start = Instant::now();
        let mut ticker = Ticker::new(TICK_STEP, start);
        assert!(ticker.poll(start));
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + Duration::from_millis(999)));
        assert!(ticker.poll(start + Duration::from_secs(1)));
    }

    #[test]
    fn missed_ticks_collapse_without_backlog() {
        let start = Instant::now();
        let mut ticker = Ticker::new(TICK_STEP, start);
        assert!(ticker.poll(start));

        let late = start + Duration::from_secs(5);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        let wait = ticker.time_to_next(late);
        assert!(wait > Duration::ZERO && wait <= TICK_STEP);
    }

    #[test]
    fn cancel_is_a_one_way_transition() {
        let start = Instant::now();
        let mut ticker = Ticker::new(TICK_STEP, start);
        assert!(ticker.is_running());
        assert!(ticker.cancel());
        assert!(!ticker.is_running());
        assert!(!ticker.cancel());
        assert!(!ticker.poll(start + Duration::from_secs(10)));
    }

    #[test]
    fn applied_style_regenerates_only_on_resize() {
        let target = Local
            .with_ymd_and_hms(2099, 1, 1, 0, 0, 0)
            .single()
            .expect("valid fixture datetime");
        let mut app = CountdownApp::new(target, Theme::default());

        let first = app.applied_style(1000.0, 400.0);
        assert_eq!(first.font_px, 160.0);
        let second = app.applied_style(1000.0, 400.0);
        assert_eq!(first, second);

        let resized = app.applied_style(1920.0, 1080.0);
        assert_eq!(resized.font_px, 432.0);
        assert_ne!(first, resized);
    }
}
