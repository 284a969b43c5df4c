//! Desktop preview app for falcon-lights
//!
//! Runs the light show on synthetic time and draws every light of the model
//! in a window, together with the story state and recent transitions.

use std::collections::VecDeque;
use std::time::{Instant as StdInstant, SystemTime, UNIX_EPOCH};

use eframe::egui::{self};
use falcon_lights::{
    Clock, Instant, OutputDriver, Pin, PinMap, Show, ShowConfig, Transition, TransitionLog,
    seeded_rng,
};
use rand::rngs::SmallRng;

/// Size of each light circle in pixels
const LIGHT_RADIUS: f32 = 22.0;

/// Gap between lights
const LIGHT_GAP: f32 = 24.0;

/// Upper bound of 1 ms polls per frame, so a stalled window does not freeze
const MAX_POLLS_PER_FRAME: u64 = 10_000;

/// How many transitions are listed
const HISTORY_SIZE: usize = 12;

/// Transitions recorded by the show, drained by the UI
static TRANSITIONS: TransitionLog = TransitionLog::new();

/// Preview boots instantly, the self-test flash is not simulated
const PREVIEW_CONFIG: ShowConfig = ShowConfig {
    pins: PinMap::DEFAULT,
    self_test: embassy_time::Duration::from_millis(0),
};

/// Light labels, tints and pins in drawing order
const LIGHTS: [(&str, [u8; 3], fn(&PinMap) -> Pin); 6] = [
    ("cockpit", [255, 214, 170], |p| p.cockpit),
    ("headlights", [235, 240, 255], |p| p.headlights),
    ("landing", [255, 236, 150], |p| p.landing_lights),
    ("engine 1", [120, 180, 255], |p| p.engine[0]),
    ("engine 2", [120, 180, 255], |p| p.engine[1]),
    ("engine 3", [120, 180, 255], |p| p.engine[2]),
];

/// PWM levels kept in memory instead of on pins
struct PreviewOutput {
    levels: [u8; 256],
}

impl OutputDriver for PreviewOutput {
    fn write(&mut self, pin: Pin, brightness: u8) {
        self.levels[usize::from(pin)] = brightness;
    }

    fn hold(&mut self, _duration: embassy_time::Duration) {}
}

/// Clock pinned to the synthetic time of the preview
struct SyntheticClock(u64);

impl Clock for SyntheticClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0)
    }
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 420.0])
            .with_title("Falcon Lights Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "falcon-lights-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// The show instance
    show: Show<'static, PreviewOutput, SmallRng>,
    /// Seed of the current run
    seed: u64,
    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Most recent transitions, newest first
    history: VecDeque<Transition>,
}

impl PreviewApp {
    fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
            .unwrap_or_default();

        Self {
            show: Self::start_show(seed),
            seed,
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            history: VecDeque::with_capacity(HISTORY_SIZE),
        }
    }

    fn start_show(seed: u64) -> Show<'static, PreviewOutput, SmallRng> {
        TRANSITIONS.clear();
        let output = PreviewOutput { levels: [0; 256] };
        let mut show = Show::new(output, seeded_rng(seed), &PREVIEW_CONFIG).with_log(&TRANSITIONS);
        show.setup(&SyntheticClock(0));
        show
    }

    /// Restart the story with a fresh seed
    fn restart(&mut self) {
        self.seed = self.seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        self.show = Self::start_show(self.seed);
        self.history.clear();
        self.t_ms = 0;
        self.last_frame = StdInstant::now();
    }

    /// Advance synthetic time, polling the show once per millisecond
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if !self.playing {
            return;
        }

        let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delta_ms = if delta_ms_f64.is_finite() {
            delta_ms_f64.clamp(0.0, 1e9) as u64
        } else {
            0
        };

        for _ in 0..delta_ms.min(MAX_POLLS_PER_FRAME) {
            self.t_ms += 1;
            self.show.poll(Instant::from_millis(self.t_ms));
        }

        while let Some(transition) = TRANSITIONS.take() {
            if self.history.len() == HISTORY_SIZE {
                self.history.pop_back();
            }
            self.history.push_front(transition);
        }
    }
}

impl eframe::App for PreviewApp {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();
        ctx.request_repaint();

        let now = Instant::from_millis(self.t_ms);
        let story = self.show.story();
        let status = format!(
            "State: {}   next: {} in {} ms   engine: {:?}",
            story.state().as_str(),
            story.step().next.as_str(),
            story.remaining(now).as_millis(),
            self.show.fixtures().engine.state(),
        );

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⏮ Restart").clicked() {
                    self.restart();
                }
                if ui
                    .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                    .clicked()
                {
                    self.playing = !self.playing;
                }

                ui.add_space(8.0);
                ui.label("Speed:");
                ui.add(egui::Slider::new(&mut self.time_scale, 0.1..=5.0).logarithmic(true));
            });

            ui.add_space(4.0);

            let secs = self.t_ms / 1000;
            let ms = self.t_ms % 1000;
            ui.label(format!("Time: {secs}.{ms:03}s   seed: {:#x}", self.seed));
            ui.label(status);

            ui.add_space(16.0);

            // === Lights ===
            let pitch = LIGHT_RADIUS * 2.0 + LIGHT_GAP;
            let width = LIGHTS.len() as f32 * pitch;
            let (response, painter) =
                ui.allocate_painter(egui::vec2(width, pitch + 20.0), egui::Sense::hover());
            let origin = response.rect.min;

            let levels = &self.show.output().levels;
            for (i, (label, tint, pin_of)) in LIGHTS.iter().enumerate() {
                let level = levels[usize::from(pin_of(&PREVIEW_CONFIG.pins))];
                let center = egui::pos2(
                    origin.x + i as f32 * pitch + pitch / 2.0,
                    origin.y + LIGHT_RADIUS + 4.0,
                );
                let scale = |c: u8| ((u16::from(c) * u16::from(level)) / 255) as u8;
                let color = egui::Color32::from_rgb(scale(tint[0]), scale(tint[1]), scale(tint[2]));

                painter.circle_filled(center, LIGHT_RADIUS, color);
                painter.circle_stroke(
                    center,
                    LIGHT_RADIUS,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(70)),
                );
                painter.text(
                    center + egui::vec2(0.0, LIGHT_RADIUS + 6.0),
                    egui::Align2::CENTER_TOP,
                    format!("{label} {level}"),
                    egui::FontId::proportional(12.0),
                    egui::Color32::from_gray(200),
                );
            }

            ui.add_space(16.0);
            ui.separator();

            // === History ===
            ui.label("Transitions:");
            for transition in &self.history {
                ui.monospace(format!(
                    "{:>8} ms  {:<20} {:>6} ms -> {}",
                    transition.at.as_millis(),
                    transition.entered.as_str(),
                    transition.dwell.as_millis(),
                    transition.next.as_str(),
                ));
            }
        });
    }
}
