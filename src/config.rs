use embassy_time::Duration;

use crate::Pin;

/// Default duration of the boot flash on every light
pub const DEFAULT_SELF_TEST: Duration = Duration::from_millis(250);

/// Wiring of the model lights to output pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub cockpit: Pin,
    pub headlights: Pin,
    pub landing_lights: Pin,
    /// Three LEDs behind the engine grille
    pub engine: [Pin; 3],
}

impl PinMap {
    /// PWM capable pins of an ATmega328 board
    pub const DEFAULT: Self = Self {
        cockpit: 3,
        headlights: 5,
        landing_lights: 6,
        engine: [9, 10, 11],
    };
}

impl Default for PinMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for the show
#[derive(Debug, Clone, Copy)]
pub struct ShowConfig {
    pub pins: PinMap,
    /// How long each light is held at full brightness during boot
    pub self_test: Duration,
}

impl ShowConfig {
    pub const DEFAULT: Self = Self {
        pins: PinMap::DEFAULT,
        self_test: DEFAULT_SELF_TEST,
    };
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
