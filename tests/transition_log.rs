mod tests {
    use falcon_lights::{
        Duration, Instant, StoryState, TRANSITION_LOG_SIZE, Transition, TransitionLog,
    };

    fn transition(at_ms: u64) -> Transition {
        Transition {
            at: Instant::from_millis(at_ms),
            entered: StoryState::InFlight,
            dwell: Duration::from_millis(12_000),
            next: StoryState::Landing,
        }
    }

    #[test]
    fn test_take_is_fifo() {
        let log = TransitionLog::new();
        assert!(log.is_empty());

        log.record(transition(1));
        log.record(transition(2));
        assert_eq!(log.len(), 2);

        assert_eq!(log.take(), Some(transition(1)));
        assert_eq!(log.take(), Some(transition(2)));
        assert_eq!(log.take(), None);
    }

    #[test]
    fn test_full_log_drops_oldest() {
        let log = TransitionLog::new();
        let total = TRANSITION_LOG_SIZE as u64 + 3;
        for at in 0..total {
            log.record(transition(at));
        }

        assert_eq!(log.len(), TRANSITION_LOG_SIZE);
        assert_eq!(log.take(), Some(transition(3)));
    }

    #[test]
    fn test_clear() {
        let log = TransitionLog::new();
        log.record(transition(1));
        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_shared_static_log() {
        static LOG: TransitionLog = TransitionLog::new();
        LOG.record(transition(5));
        assert_eq!(LOG.take().map(|t| t.entered), Some(StoryState::InFlight));
    }
}
