use embassy_time::{Duration, Instant};

use crate::board::{Board, RandomSource};
use crate::config::PinMap;
use crate::engine::Engine;
use crate::led::Led;
use crate::{Clock, OutputDriver};

/// Every light on the model
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub cockpit: Led,
    pub headlights: Led,
    pub landing_lights: Led,
    pub engine: Engine,
}

impl Fixtures {
    pub const fn new(pins: &PinMap) -> Self {
        Self {
            cockpit: Led::new(pins.cockpit),
            headlights: Led::new(pins.headlights),
            landing_lights: Led::new(pins.landing_lights),
            engine: Engine::new(pins.engine),
        }
    }

    /// Boot self-test, engine first
    pub fn initialize<O: OutputDriver, C: Clock>(
        &mut self,
        output: &mut O,
        self_test: Duration,
        clock: &C,
    ) {
        self.engine.initialize(output, self_test, clock);
        self.cockpit.initialize(output, self_test, clock);
        self.headlights.initialize(output, self_test, clock);
        self.landing_lights.initialize(output, self_test, clock);
    }

    /// Recompute every light for `now`
    pub fn recompute<O: OutputDriver, R: RandomSource>(&mut self, now: Instant, board: &mut Board<O, R>) {
        let Board { output, rng } = board;
        self.engine.recompute(now, output, rng);
        self.cockpit.recompute(now, output, rng);
        self.headlights.recompute(now, output, rng);
        self.landing_lights.recompute(now, output, rng);
    }

    /// Current levels in pin-map order: cockpit, headlights, landing, engine
    pub fn levels(&self) -> [u8; 6] {
        let [e1, e2, e3] = self.engine.leds();
        [
            self.cockpit.level(),
            self.headlights.level(),
            self.landing_lights.level(),
            e1.level(),
            e2.level(),
            e3.level(),
        ]
    }
}
