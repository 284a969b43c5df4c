//! Record of story transitions for observers.
//!
//! A bounded ring built on `critical-section` and `heapless::Deque`, so the
//! poll loop can record from one context while an interrupt, another
//! executor or a host UI drains it. Recording never fails: a full log
//! forgets its oldest entry.

use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use heapless::Deque;

use crate::story::StoryState;

/// Number of transitions kept before the oldest are dropped
pub const TRANSITION_LOG_SIZE: usize = 16;

/// One entry into a story state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// When the state was entered
    pub at: Instant,
    pub entered: StoryState,
    /// Planned time in the state
    pub dwell: Duration,
    pub next: StoryState,
}

/// Interrupt safe transition history
pub struct TransitionLog {
    inner: Mutex<RefCell<Deque<Transition, TRANSITION_LOG_SIZE>>>,
}

impl TransitionLog {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Append a transition, evicting the oldest one when full
    pub fn record(&self, transition: Transition) {
        critical_section::with(|cs| {
            let mut entries = self.inner.borrow(cs).borrow_mut();
            if entries.is_full() {
                entries.pop_front();
            }
            entries.push_back(transition).ok();
        });
    }

    /// Remove and return the oldest transition
    pub fn take(&self) -> Option<Transition> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().clear());
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new()
    }
}
