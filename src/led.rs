//! Single PWM channel with time based waveforms
//!
//! A [`Led`] remembers the last level it emitted and every new waveform
//! cross-fades from that level, so mode switches never produce a visible jump
//! regardless of where the previous waveform was in its cycle.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::board::RandomSource;
use crate::waveform::{Waveform, crossfade};
use crate::{Clock, OutputDriver, Pin};

const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

/// One controllable light output and its animation state
#[derive(Debug, Clone)]
pub struct Led {
    pin: Pin,
    waveform: Waveform,
    /// Length of one ramp or oscillation cycle.
    ///
    /// Kept across mode switches: the cross-fade of every mode uses it.
    period: Duration,
    /// Time after activation during which the channel is frozen.
    ///
    /// Kept across mode switches like `period`.
    delay: Duration,
    started: Instant,
    last: u8,
}

impl Led {
    pub const fn new(pin: Pin) -> Self {
        Self {
            pin,
            waveform: Waveform::Off,
            period: DEFAULT_PERIOD,
            delay: Duration::from_millis(0),
            started: Instant::from_millis(0),
            last: 0,
        }
    }

    pub const fn pin(&self) -> Pin {
        self.pin
    }

    /// Last emitted brightness
    pub const fn level(&self) -> u8 {
        self.last
    }

    pub const fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub const fn period(&self) -> Duration {
        self.period
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Configure the pin and flash it once for visual confirmation.
    ///
    /// Blocks for `self_test`; call only at boot.
    pub fn initialize<O: OutputDriver, C: Clock>(
        &mut self,
        output: &mut O,
        self_test: Duration,
        clock: &C,
    ) {
        #[cfg(feature = "esp32-log")]
        println!("[Led.initialize] self-test on pin {}", self.pin);
        output.configure(self.pin);
        output.write(self.pin, 255);
        output.hold(self_test);
        output.write(self.pin, 0);
        self.last = 0;
        self.started = clock.now();
    }

    /// Switch off immediately
    pub fn set_off<O: OutputDriver>(&mut self, now: Instant, output: &mut O) {
        self.waveform = Waveform::Off;
        self.started = now;
        self.emit_now(0, output);
    }

    /// Switch to a constant level immediately
    pub fn set_on<O: OutputDriver>(&mut self, level: u8, now: Instant, output: &mut O) {
        self.waveform = Waveform::On { level };
        self.started = now;
        self.emit_now(level, output);
    }

    /// Ramp from the current level to `target` over `duration`
    pub fn ramp_to<O: OutputDriver>(
        &mut self,
        target: u8,
        duration: Duration,
        now: Instant,
        output: &mut O,
    ) {
        self.ramp_to_after(target, duration, Duration::from_millis(0), now, output);
    }

    /// Ramp from the current level to `target`, starting after `delay`
    pub fn ramp_to_after<O: OutputDriver>(
        &mut self,
        target: u8,
        duration: Duration,
        delay: Duration,
        now: Instant,
        output: &mut O,
    ) {
        self.waveform = Waveform::Ramp {
            from: self.last,
            to: target,
        };
        self.period = duration;
        self.delay = delay;
        self.started = now;
        self.render(now, output, None);
    }

    /// Oscillate between `min` and `max` with a raised cosine
    pub fn start_sinusoid<O: OutputDriver>(
        &mut self,
        period: Duration,
        min: u8,
        max: u8,
        phase: Duration,
        now: Instant,
        output: &mut O,
    ) {
        self.waveform = Waveform::Sinusoid { min, max, phase };
        self.period = period;
        self.started = now;
        self.render(now, output, None);
    }

    /// Flicker randomly between `min` and `max`.
    ///
    /// Keeps the current activation instant and is sampled lazily on the
    /// next [`recompute`](Self::recompute).
    pub fn start_flicker(&mut self, min: u8, max: u8, delay: Duration) {
        self.waveform = Waveform::Flicker { min, max };
        self.delay = delay;
    }

    /// Recompute the brightness for `now` and write it if it changed
    pub fn recompute<O: OutputDriver, R: RandomSource>(
        &mut self,
        now: Instant,
        output: &mut O,
        rng: &mut R,
    ) {
        self.render(now, output, Some(rng));
    }

    /// Time since activation, `None` while the delay is still running
    fn elapsed(&self, now: Instant) -> Option<Duration> {
        now.checked_duration_since(self.started + self.delay)
    }

    fn render<O: OutputDriver>(
        &mut self,
        now: Instant,
        output: &mut O,
        rng: Option<&mut dyn RandomSource>,
    ) {
        let Some(elapsed) = self.elapsed(now) else {
            return;
        };

        let target = self.waveform.sample(elapsed, self.period, self.last, rng);
        let value = crossfade(self.last, target, elapsed, self.period);

        if value != self.last {
            output.write(self.pin, value);
        }
        self.last = value;
    }

    fn emit_now<O: OutputDriver>(&mut self, value: u8, output: &mut O) {
        self.last = value;
        output.write(self.pin, value);
    }
}
