//! Top-level poll loop.
//!
//! [`Show`] is the application context: it owns the board, every light and
//! the story, and is driven by calling [`Show::poll`] as often as possible.
//!
//! # Usage
//!
//! ```ignore
//! let rng = seeded_rng(seed_from_noise(noise_samples));
//! let mut show = Show::new(pwm, rng, &ShowConfig::DEFAULT);
//! show.setup(&SystemClock);
//! show.run(&SystemClock);
//! ```

use embassy_time::Instant;

use crate::board::{Board, RandomSource};
use crate::config::ShowConfig;
use crate::fixtures::Fixtures;
use crate::story::Story;
use crate::transition_log::{Transition, TransitionLog};
use crate::{Clock, OutputDriver};

/// The light show running on the model
pub struct Show<'a, O: OutputDriver, R: RandomSource> {
    board: Board<O, R>,
    fixtures: Fixtures,
    story: Story,
    log: Option<&'a TransitionLog>,
    config: ShowConfig,
}

impl<'a, O: OutputDriver, R: RandomSource> Show<'a, O, R> {
    pub fn new(output: O, rng: R, config: &ShowConfig) -> Self {
        Self {
            board: Board::new(output, rng),
            fixtures: Fixtures::new(&config.pins),
            story: Story::new(),
            log: None,
            config: *config,
        }
    }

    /// Record every story transition into `log`
    #[must_use]
    pub fn with_log(mut self, log: &'a TransitionLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Replace the story, e.g. to resume with a remembered failure flag
    #[must_use]
    pub fn with_story(mut self, story: Story) -> Self {
        self.story = story;
        self
    }

    /// Self-test every light, set the boot levels and enter the first scene.
    ///
    /// Blocks for the self-test of all six lights.
    pub fn setup<C: Clock>(&mut self, clock: &C) {
        let output = &mut self.board.output;
        self.fixtures
            .initialize(output, self.config.self_test, clock);

        let now = clock.now();
        self.fixtures.cockpit.set_on(255, now, output);
        self.fixtures.headlights.set_off(now, output);
        self.fixtures.landing_lights.set_on(255, now, output);

        let transition = self.story.begin(now, &mut self.fixtures, &mut self.board);
        self.record(transition);
    }

    /// Advance the story if due, then recompute every light for `now`
    pub fn poll(&mut self, now: Instant) {
        if let Some(transition) = self.story.poll(now, &mut self.fixtures, &mut self.board) {
            self.record(transition);
        }
        self.fixtures.recompute(now, &mut self.board);
    }

    /// Busy-poll forever
    pub fn run<C: Clock>(&mut self, clock: &C) -> ! {
        loop {
            self.poll(clock.now());
        }
    }

    pub const fn story(&self) -> &Story {
        &self.story
    }

    pub const fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    pub const fn output(&self) -> &O {
        &self.board.output
    }

    fn record(&self, transition: Transition) {
        if let Some(log) = self.log {
            log.record(transition);
        }
    }
}
