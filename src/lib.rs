#![no_std]

pub mod board;
pub mod config;
pub mod engine;
pub mod fixtures;
pub mod led;
pub mod show;
pub mod story;
pub mod transition_log;
pub mod waveform;

pub use board::{Board, RandomSource, seed_from_noise, seeded_rng};
pub use config::{PinMap, ShowConfig};
pub use engine::{Engine, EngineState};
pub use fixtures::Fixtures;
pub use led::Led;
pub use show::Show;
pub use story::{Step, Story, StoryState};
pub use transition_log::{TRANSITION_LOG_SIZE, Transition, TransitionLog};
pub use waveform::Waveform;

pub use embassy_time::{Duration, Instant};

/// Identifier of a physical output pin
pub type Pin = u8;

/// Abstract PWM output trait
///
/// Implement this trait to support different hardware platforms.
/// Every light on the model is driven through it.
pub trait OutputDriver {
    /// Write a brightness (0-255) to the given pin
    fn write(&mut self, pin: Pin, brightness: u8);

    /// Prepare the pin for analog (PWM) output
    fn configure(&mut self, _pin: Pin) {}

    /// Block for the given duration.
    ///
    /// Only used by the boot self-test, never from the poll loop.
    fn hold(&mut self, duration: Duration) {
        embassy_time::block_for(duration);
    }
}

/// Monotonic millisecond clock
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
