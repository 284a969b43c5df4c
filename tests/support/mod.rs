#![allow(dead_code)]

use std::cell::Cell;

use falcon_lights::{Clock, Duration, Instant, OutputDriver, Pin, RandomSource};

/// Output driver that remembers everything written to it
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub writes: Vec<(Pin, u8)>,
    pub configured: Vec<Pin>,
    pub holds: Vec<Duration>,
}

impl RecordingOutput {
    /// Last value written to `pin`
    pub fn level(&self, pin: Pin) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
    }

    /// All values written to `pin`, oldest first
    pub fn writes_to(&self, pin: Pin) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl OutputDriver for RecordingOutput {
    fn write(&mut self, pin: Pin, brightness: u8) {
        self.writes.push((pin, brightness));
    }

    fn configure(&mut self, pin: Pin) {
        self.configured.push(pin);
    }

    fn hold(&mut self, duration: Duration) {
        self.holds.push(duration);
    }
}

/// Clock moved by hand
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    pub fn at(ms: u64) -> Self {
        Self {
            now_ms: Cell::new(ms),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now_ms.get())
    }
}

/// Always the lowest value of the range
#[derive(Debug, Default)]
pub struct LowRandom;

impl RandomSource for LowRandom {
    fn uniform(&mut self, low: u32, _high: u32) -> u32 {
        low
    }
}

/// Always the highest value of the range
#[derive(Debug, Default)]
pub struct HighRandom;

impl RandomSource for HighRandom {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        if high <= low { low } else { high - 1 }
    }
}

/// Wraps another source and counts draws
#[derive(Debug, Default)]
pub struct Counting<R> {
    pub inner: R,
    pub draws: usize,
}

impl<R: RandomSource> RandomSource for Counting<R> {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        self.draws += 1;
        self.inner.uniform(low, high)
    }
}

pub const fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

pub const fn at(value: u64) -> Instant {
    Instant::from_millis(value)
}
