//! Brightness waveforms
//!
//! Pure sampling functions shared by every [`Led`](crate::Led).
//! All of them work on elapsed time relative to the moment a waveform was
//! activated, so they can be tested without any hardware.

use core::f32::consts::PI;

use embassy_time::Duration;

use crate::board::RandomSource;

/// Flicker picks a new random level once per this many milliseconds
pub const FLICKER_INTERVAL_MS: u64 = 29;

/// Animation behaviour of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// Constant zero
    Off,
    /// Constant level
    On { level: u8 },
    /// Linear ramp over the channel period, holding `to` afterwards
    Ramp { from: u8, to: u8 },
    /// Raised cosine oscillating between `min` and `max`
    Sinusoid { min: u8, max: u8, phase: Duration },
    /// Random steps in `[min, max)`
    Flicker { min: u8, max: u8 },
}

impl Waveform {
    /// Sample the raw (unsmoothed) level of the waveform.
    ///
    /// `last` is the previously emitted level; flicker holds it between
    /// samples. Without a random source flicker always holds.
    pub fn sample(
        &self,
        elapsed: Duration,
        period: Duration,
        last: u8,
        rng: Option<&mut dyn RandomSource>,
    ) -> u8 {
        match *self {
            Self::Off => 0,
            Self::On { level } => level,
            Self::Ramp { from, to } => ramp(from, to, elapsed, period),
            Self::Sinusoid { min, max, phase } => raised_cosine(min, max, elapsed, period, phase),
            Self::Flicker { min, max } => match rng {
                Some(rng) => flicker(min, max, elapsed, last, rng),
                None => last,
            },
        }
    }
}

/// Interpolate between `a` and `b`, rounding to the nearest level
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn lerp8(a: u8, b: u8, t: f32) -> u8 {
    let a = f32::from(a);
    let b = f32::from(b);
    libm::roundf(a + (b - a) * t).clamp(0.0, 255.0) as u8
}

/// Linear ramp from `from` to `to` over `duration`
#[allow(clippy::cast_precision_loss)]
pub fn ramp(from: u8, to: u8, elapsed: Duration, duration: Duration) -> u8 {
    if elapsed >= duration {
        return to;
    }
    let progress = elapsed.as_millis() as f32 / duration.as_millis() as f32;
    lerp8(from, to, progress)
}

/// Raised cosine bell: `min` at the cycle boundaries, `max` at mid-cycle
#[allow(clippy::cast_precision_loss)]
pub fn raised_cosine(min: u8, max: u8, elapsed: Duration, period: Duration, phase: Duration) -> u8 {
    let period_ms = period.as_millis().max(1);
    let position = (elapsed.as_millis() + phase.as_millis() % period_ms) % period_ms;
    let t = position as f32 / (period_ms - 1).max(1) as f32;
    let bell = (libm::cosf(2.0 * PI * (t - 0.5)) + 1.0) / 2.0;
    lerp8(min, max, bell)
}

/// Flicker step: a new level every [`FLICKER_INTERVAL_MS`], otherwise `last`
#[allow(clippy::cast_possible_truncation)]
pub fn flicker(
    min: u8,
    max: u8,
    elapsed: Duration,
    last: u8,
    rng: &mut dyn RandomSource,
) -> u8 {
    if elapsed.as_millis() % FLICKER_INTERVAL_MS != 0 {
        return last;
    }
    rng.uniform(u32::from(min), u32::from(max)).min(255) as u8
}

/// Cross-fade from `previous` into `next` during the first half period.
///
/// The weight of `previous` falls linearly from 1 at activation to 0 at
/// half the period; afterwards `next` is returned untouched.
#[allow(clippy::cast_precision_loss)]
pub fn crossfade(previous: u8, next: u8, elapsed: Duration, period: Duration) -> u8 {
    let half = period.as_millis() as f32 / 2.0;
    let factor = (half - elapsed.as_millis() as f32) / half;
    if factor > 0.0 {
        lerp8(next, previous, factor)
    } else {
        next
    }
}
