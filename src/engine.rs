//! Engine glow
//!
//! Three LEDs behind the engine grille animated as one unit. Oscillating
//! states run the three channels with phases spread by a third of the period
//! so the glow shimmers instead of pulsing in lockstep.

use embassy_time::{Duration, Instant};

use crate::board::RandomSource;
use crate::led::Led;
use crate::{Clock, OutputDriver, Pin};

const IDLE_PERIOD: Duration = Duration::from_millis(2000);
const IDLE_MIN: u8 = 10;
const IDLE_MAX: u8 = 40;

const FULL_POWER_PERIOD: Duration = Duration::from_millis(60);
const FULL_POWER_MIN: u8 = 200;
const FULL_POWER_MAX: u8 = 255;

const FAILING_PERIOD: Duration = Duration::from_millis(1000);

const SPOOL_UP_LEVEL: u8 = 220;
const SPOOL_UP_DURATION: Duration = Duration::from_millis(6000);
const SPOOL_DOWN_DURATION: Duration = Duration::from_millis(2000);
const LANDING_LEVEL: u8 = 25;
const LANDING_DURATION: Duration = Duration::from_millis(4000);

/// What the engine is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Off,
    Idling,
    FullPower,
    Failing,
    RampingUp,
    RampingDown,
    Landing,
}

/// Group of three synchronized LEDs simulating one thruster
#[derive(Debug, Clone)]
pub struct Engine {
    state: EngineState,
    leds: [Led; 3],
}

impl Engine {
    pub const fn new(pins: [Pin; 3]) -> Self {
        Self {
            state: EngineState::Idling,
            leds: [Led::new(pins[0]), Led::new(pins[1]), Led::new(pins[2])],
        }
    }

    pub const fn state(&self) -> EngineState {
        self.state
    }

    pub const fn leds(&self) -> &[Led; 3] {
        &self.leds
    }

    /// Run the boot self-test on all three channels
    pub fn initialize<O: OutputDriver, C: Clock>(
        &mut self,
        output: &mut O,
        self_test: Duration,
        clock: &C,
    ) {
        for led in &mut self.leds {
            led.initialize(output, self_test, clock);
        }
    }

    /// Reconfigure the three channels for a new engine state
    pub fn set_state<O: OutputDriver>(&mut self, state: EngineState, now: Instant, output: &mut O) {
        self.state = state;
        match state {
            EngineState::Off => {
                for led in &mut self.leds {
                    led.set_off(now, output);
                }
            }
            EngineState::Idling => {
                self.shimmer(IDLE_PERIOD, IDLE_MIN, IDLE_MAX, now, output);
            }
            EngineState::FullPower => {
                self.shimmer(FULL_POWER_PERIOD, FULL_POWER_MIN, FULL_POWER_MAX, now, output);
            }
            EngineState::Failing => {
                let [led1, led2, led3] = &mut self.leds;
                led1.start_flicker(64, 128, Duration::from_millis(0));
                led2.start_flicker(0, 64, Duration::from_millis(0));
                led3.start_sinusoid(FAILING_PERIOD, 64, 170, Duration::from_millis(0), now, output);
            }
            EngineState::RampingUp => self.ramp_all(SPOOL_UP_LEVEL, SPOOL_UP_DURATION, now, output),
            EngineState::RampingDown => self.ramp_all(0, SPOOL_DOWN_DURATION, now, output),
            EngineState::Landing => self.ramp_all(LANDING_LEVEL, LANDING_DURATION, now, output),
        }
    }

    /// Recompute all three channels
    pub fn recompute<O: OutputDriver, R: RandomSource>(
        &mut self,
        now: Instant,
        output: &mut O,
        rng: &mut R,
    ) {
        for led in &mut self.leds {
            led.recompute(now, output, rng);
        }
    }

    /// Same sinusoid on every channel, phases at 0, +1/3 and -1/3 period
    fn shimmer<O: OutputDriver>(
        &mut self,
        period: Duration,
        min: u8,
        max: u8,
        now: Instant,
        output: &mut O,
    ) {
        let third = period / 3;
        let phases = [Duration::from_millis(0), third, period - third];
        for (led, phase) in self.leds.iter_mut().zip(phases) {
            led.start_sinusoid(period, min, max, phase, now, output);
        }
    }

    fn ramp_all<O: OutputDriver>(&mut self, target: u8, duration: Duration, now: Instant, output: &mut O) {
        for led in &mut self.leds {
            led.ramp_to(target, duration, now, output);
        }
    }
}
