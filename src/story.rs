//! Narrative state machine
//!
//! The model cycles through a scripted story: it idles on the ground, spools
//! up and flies, or fails to start, shuts down and tries again. Each state
//! configures the lights once on entry and then dwells for a fixed or random
//! time before moving on. A dwell cannot be cut short.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::board::{Board, RandomSource};
use crate::engine::EngineState;
use crate::fixtures::Fixtures;
use crate::transition_log::Transition;

/// A failed start is rolled with a 1 in `START_FAILURE_ODDS` chance
pub const START_FAILURE_ODDS: u32 = 4;

const fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Scene of the story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryState {
    OnGround,
    PrepareForFlight,
    FailingStart,
    Failing,
    EmergencyShutdown,
    Restarting,
    InFlight,
    Landing,
}

impl StoryState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnGround => "on_ground",
            Self::PrepareForFlight => "prepare_for_flight",
            Self::FailingStart => "failing_start",
            Self::Failing => "failing",
            Self::EmergencyShutdown => "emergency_shutdown",
            Self::Restarting => "restarting",
            Self::InFlight => "in_flight",
            Self::Landing => "landing",
        }
    }
}

/// How long to stay in a state and where to go afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub dwell: Duration,
    pub next: StoryState,
}

/// Story progress and dwell timer
#[derive(Debug, Clone)]
pub struct Story {
    state: StoryState,
    last_start_failed: bool,
    entered_at: Instant,
    step: Step,
}

impl Default for Story {
    fn default() -> Self {
        Self::new()
    }
}

impl Story {
    pub const fn new() -> Self {
        Self {
            state: StoryState::OnGround,
            last_start_failed: false,
            entered_at: Instant::from_millis(0),
            step: Step {
                dwell: ms(0),
                next: StoryState::OnGround,
            },
        }
    }

    /// Start with the given start-failure memory, mostly useful for replays
    #[must_use]
    pub const fn with_last_start_failed(mut self, failed: bool) -> Self {
        self.last_start_failed = failed;
        self
    }

    pub const fn state(&self) -> StoryState {
        self.state
    }

    pub const fn step(&self) -> Step {
        self.step
    }

    pub const fn entered_at(&self) -> Instant {
        self.entered_at
    }

    pub const fn last_start_failed(&self) -> bool {
        self.last_start_failed
    }

    /// Time left in the current state
    pub fn remaining(&self, now: Instant) -> Duration {
        let spent = now.saturating_duration_since(self.entered_at);
        if spent >= self.step.dwell {
            ms(0)
        } else {
            self.step.dwell - spent
        }
    }

    /// Enter the first scene
    pub fn begin<O: OutputDriver, R: RandomSource>(
        &mut self,
        now: Instant,
        fixtures: &mut Fixtures,
        board: &mut Board<O, R>,
    ) -> Transition {
        self.enter(StoryState::OnGround, now, fixtures, board)
    }

    /// Move to the next scene once the dwell time has passed
    pub fn poll<O: OutputDriver, R: RandomSource>(
        &mut self,
        now: Instant,
        fixtures: &mut Fixtures,
        board: &mut Board<O, R>,
    ) -> Option<Transition> {
        if now.saturating_duration_since(self.entered_at) <= self.step.dwell {
            return None;
        }
        Some(self.enter(self.step.next, now, fixtures, board))
    }

    fn enter<O: OutputDriver, R: RandomSource>(
        &mut self,
        state: StoryState,
        now: Instant,
        fixtures: &mut Fixtures,
        board: &mut Board<O, R>,
    ) -> Transition {
        let step = self.advance(state, fixtures, board, now);
        self.state = state;
        self.entered_at = now;
        self.step = step;

        #[cfg(feature = "esp32-log")]
        println!(
            "[Story.enter] {} for {} ms, then {}",
            state.as_str(),
            step.dwell.as_millis(),
            step.next.as_str()
        );

        Transition {
            at: now,
            entered: state,
            dwell: step.dwell,
            next: step.next,
        }
    }

    /// Configure the lights for `state` and decide its dwell and successor
    pub fn advance<O: OutputDriver, R: RandomSource>(
        &mut self,
        state: StoryState,
        fixtures: &mut Fixtures,
        board: &mut Board<O, R>,
        now: Instant,
    ) -> Step {
        let Fixtures {
            cockpit,
            headlights,
            landing_lights,
            engine,
        } = fixtures;
        let Board { output, rng } = board;

        match state {
            StoryState::OnGround => {
                cockpit.ramp_to(255, ms(250), now, output);
                headlights.ramp_to(0, ms(1000), now, output);
                landing_lights.ramp_to_after(255, ms(1000), ms(1000), now, output);
                engine.set_state(EngineState::Idling, now, output);

                // Never two failed starts in a row
                self.last_start_failed =
                    !self.last_start_failed && rng.uniform(0, START_FAILURE_ODDS) == 0;

                #[cfg(feature = "esp32-log")]
                println!(
                    "[Story.advance] next start fails: {}",
                    self.last_start_failed
                );

                Step {
                    dwell: random_dwell(rng, 5000, 20000),
                    next: if self.last_start_failed {
                        StoryState::FailingStart
                    } else {
                        StoryState::PrepareForFlight
                    },
                }
            }
            StoryState::PrepareForFlight | StoryState::FailingStart => {
                cockpit.ramp_to_after(64, ms(3000), ms(2000), now, output);
                headlights.ramp_to_after(255, ms(500), ms(1400), now, output);
                landing_lights.ramp_to(0, ms(1500), now, output);
                engine.set_state(EngineState::RampingUp, now, output);

                if state == StoryState::FailingStart {
                    Step {
                        dwell: random_dwell(rng, 2000, 4000),
                        next: StoryState::Failing,
                    }
                } else {
                    Step {
                        dwell: ms(6000),
                        next: StoryState::InFlight,
                    }
                }
            }
            StoryState::Failing => {
                cockpit.start_flicker(0, 128, random_dwell(rng, 100, 1500));
                headlights.start_flicker(0, 32, random_dwell(rng, 1000, 2000));
                landing_lights.start_flicker(32, 128, random_dwell(rng, 100, 2000));
                engine.set_state(EngineState::Failing, now, output);

                Step {
                    dwell: random_dwell(rng, 1000, 2000),
                    next: StoryState::EmergencyShutdown,
                }
            }
            StoryState::EmergencyShutdown => {
                headlights.ramp_to(0, ms(750), now, output);
                cockpit.ramp_to_after(0, ms(250), ms(750), now, output);
                landing_lights.ramp_to(0, ms(500), now, output);
                engine.set_state(EngineState::RampingDown, now, output);

                Step {
                    dwell: ms(5000),
                    next: StoryState::Restarting,
                }
            }
            StoryState::Restarting => {
                headlights.set_off(now, output);
                cockpit.ramp_to(255, ms(750), now, output);
                landing_lights.ramp_to_after(255, ms(1500), ms(2000), now, output);
                engine.set_state(EngineState::Off, now, output);

                Step {
                    dwell: ms(4000),
                    next: StoryState::OnGround,
                }
            }
            StoryState::InFlight => {
                cockpit.ramp_to(64, ms(250), now, output);
                headlights.ramp_to(255, ms(500), now, output);
                landing_lights.ramp_to(0, ms(500), now, output);
                engine.set_state(EngineState::FullPower, now, output);

                Step {
                    dwell: random_dwell(rng, 10000, 20000),
                    next: StoryState::Landing,
                }
            }
            StoryState::Landing => {
                cockpit.ramp_to(200, ms(500), now, output);
                landing_lights.ramp_to_after(255, ms(1500), ms(1500), now, output);
                headlights.ramp_to_after(0, ms(2000), ms(1500), now, output);
                engine.set_state(EngineState::Landing, now, output);

                Step {
                    dwell: ms(4000),
                    next: StoryState::OnGround,
                }
            }
        }
    }
}

/// Uniform duration in `[low_ms, high_ms)`
fn random_dwell<R: RandomSource>(rng: &mut R, low_ms: u32, high_ms: u32) -> Duration {
    ms(u64::from(rng.uniform(low_ms, high_ms)))
}
