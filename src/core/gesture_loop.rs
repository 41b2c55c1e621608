use crate::core::config::KeyBindings;
use crate::core::gesture_classifier::classify_frame;
use crate::core::key_state::KeyStateController;
use crate::core::shutdown::ShutdownSignal;
use crate::models::gesture::{Action, SessionStats};
use crate::models::input::KeyEventType;
use crate::platform::hands::LandmarkSource;
use crate::platform::input::InputSink;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Consecutive failed frames tolerated before the held key is let go
const RELEASE_AFTER_FAILURES: u32 = 5;

const FIRST_BACKOFF_MS: u64 = 5;
const MAX_BACKOFF_MS: u64 = 250;

/// Pause after the n-th consecutive failed frame, doubling up to a cap
fn failure_backoff(consecutive: u32) -> Duration {
    let shift = consecutive.saturating_sub(1).min(16);
    Duration::from_millis((FIRST_BACKOFF_MS << shift).min(MAX_BACKOFF_MS))
}

/// Frame-by-frame controller: landmarks in, key presses out
pub struct GestureController<L: LandmarkSource, S: InputSink> {
    source: L,
    keys: KeyStateController<S>,
    stats: SessionStats,
    last_action: Action,
    consecutive_failures: u32,
}

impl<L: LandmarkSource, S: InputSink> GestureController<L, S> {
    pub fn new(source: L, sink: S, bindings: KeyBindings) -> Self {
        Self {
            source,
            keys: KeyStateController::new(sink, bindings),
            stats: SessionStats::default(),
            last_action: Action::None,
            consecutive_failures: 0,
        }
    }

    /// Process one frame. Returns the action in effect afterwards, or `None` once
    /// the source has ended.
    ///
    /// A frame the source fails to deliver is skipped and the held key stays
    /// down. After `RELEASE_AFTER_FAILURES` failures in a row the key is
    /// released. Each failure waits a little longer before the next read.
    pub fn step(&mut self) -> Option<Action> {
        match self.source.next_frame() {
            Ok(Some(frame)) => {
                self.consecutive_failures = 0;
                if frame.has_hand() {
                    self.stats.frames_with_hand += 1;
                }
                self.stats.processing_ms_total += frame.processing_time_ms;
                let action = classify_frame(&frame.hands);
                self.apply(action);
                Some(action)
            }
            Ok(None) => None,
            Err(e) => {
                self.consecutive_failures += 1;
                self.stats.total_frames += 1;
                self.stats.failed_frames += 1;
                debug!(consecutive = self.consecutive_failures, "Frame skipped: {}", e);

                if self.consecutive_failures == RELEASE_AFTER_FAILURES {
                    warn!(
                        "{} frames failed in a row, releasing held keys",
                        RELEASE_AFTER_FAILURES
                    );
                    self.release_all();
                    self.last_action = Action::None;
                }

                std::thread::sleep(failure_backoff(self.consecutive_failures));
                Some(self.last_action)
            }
        }
    }

    fn apply(&mut self, action: Action) {
        self.stats.record_action(action);

        for event in self.keys.apply(action) {
            match event.event_type {
                KeyEventType::KeyDown => self.stats.key_presses += 1,
                KeyEventType::KeyUp => self.stats.key_releases += 1,
            }
        }

        if action != self.last_action {
            info!("Gesture: {}", action.label());
            self.last_action = action;
        }
    }

    /// Run until shutdown is requested or the source ends, then release all keys
    pub fn run(&mut self, shutdown: &ShutdownSignal) -> SessionStats {
        info!(
            "Gesture loop started (source: {}, sink: {})",
            self.source.describe(),
            self.keys.sink().name()
        );

        while !shutdown.is_requested() {
            if self.step().is_none() {
                info!("Landmark source ended");
                break;
            }
        }

        self.release_all();
        self.stats.clone()
    }

    /// Release whatever key is held
    pub fn release_all(&mut self) {
        let released = self.keys.flush();
        self.stats.key_releases += released.len() as u64;
        if !released.is_empty() {
            debug!("Released {} held key(s)", released.len());
        }
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn keys(&self) -> &KeyStateController<S> {
        &self.keys
    }
}

/// Log an end-of-session summary
pub fn log_session_summary(stats: &SessionStats) {
    info!(
        frames = stats.total_frames,
        with_hand = stats.frames_with_hand,
        failed = stats.failed_frames,
        presses = stats.key_presses,
        releases = stats.key_releases,
        "Session finished"
    );

    if stats.key_presses != stats.key_releases {
        warn!(
            "Press/release mismatch: {} presses, {} releases",
            stats.key_presses, stats.key_releases
        );
    }

    if let Some(mean) = stats.mean_processing_ms() {
        info!("Mean hand tracking time: {:.1} ms per frame", mean);
    }

    if let Some(action) = stats.dominant_action() {
        info!(
            "Most used gesture: {} ({} frames)",
            action.label(),
            stats.frames_for(action)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hand::{Hand, HandError, HandFrame, HandResult, Handedness, Landmark, LANDMARK_COUNT};
    use crate::models::input::VirtualKey;
    use crate::platform::input::RecordingSink;
    use std::collections::VecDeque;

    /// Scripted source: each entry is one frame result
    struct ScriptedSource {
        frames: VecDeque<HandResult<Option<HandFrame>>>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<HandResult<Option<HandFrame>>>) -> Self {
            Self {
                frames: frames.into(),
            }
        }
    }

    impl LandmarkSource for ScriptedSource {
        fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn hand(fingers: [bool; 5], handedness: Handedness) -> Hand {
        let mut lms = [Landmark::new(100, 100); LANDMARK_COUNT];
        lms[4] = Landmark::new(if fingers[0] { 110 } else { 90 }, 100);
        for (slot, tip) in [8, 12, 16, 20].into_iter().enumerate() {
            lms[tip] = Landmark::new(100, if fingers[slot + 1] { 50 } else { 150 });
        }
        Hand::from_array(lms, handedness)
    }

    fn frame(hands: Vec<Hand>) -> HandResult<Option<HandFrame>> {
        Ok(Some(HandFrame {
            hands,
            processing_time_ms: 4,
        }))
    }

    #[test]
    fn test_step_sequence() {
        let source = ScriptedSource::new(vec![
            frame(vec![hand([true, true, true, true, false], Handedness::Right)]),
            frame(vec![hand([true, true, true, true, true], Handedness::Left)]),
            frame(vec![]),
        ]);
        let recorder = RecordingSink::new();
        let mut controller = GestureController::new(source, recorder.clone(), KeyBindings::default());

        assert_eq!(controller.step(), Some(Action::SteerLeft));
        assert_eq!(controller.keys().held_key(), Some(VirtualKey::Left));
        assert_eq!(controller.step(), Some(Action::SteerRight));
        assert_eq!(controller.keys().held_key(), Some(VirtualKey::Right));
        assert_eq!(controller.step(), Some(Action::None));
        assert_eq!(controller.keys().held_key(), None);
        assert_eq!(controller.step(), None);

        assert_eq!(recorder.events().len(), 4);
        assert_eq!(controller.stats().frames_with_hand, 2);
        assert_eq!(controller.stats().total_frames, 3);
    }

    #[test]
    fn test_failed_frame_keeps_key_held() {
        let source = ScriptedSource::new(vec![
            frame(vec![hand([false; 5], Handedness::Right)]),
            Err(HandError::CaptureFailed("camera hiccup".to_string())),
            frame(vec![hand([false; 5], Handedness::Right)]),
        ]);
        let recorder = RecordingSink::new();
        let mut controller = GestureController::new(source, recorder.clone(), KeyBindings::default());

        assert_eq!(controller.step(), Some(Action::Brake));
        assert_eq!(controller.step(), Some(Action::Brake));
        assert_eq!(controller.keys().held_key(), Some(VirtualKey::Down));
        assert_eq!(controller.step(), Some(Action::Brake));

        assert_eq!(controller.stats().failed_frames, 1);
        assert_eq!(controller.stats().total_frames, 3);
        assert_eq!(recorder.events().len(), 1);
    }

    #[test]
    fn test_repeated_failures_release_key() {
        let mut frames = vec![frame(vec![hand([false, true, false, false, false], Handedness::Left)])];
        for _ in 0..RELEASE_AFTER_FAILURES {
            frames.push(Err(HandError::CaptureFailed("camera unplugged".to_string())));
        }
        let recorder = RecordingSink::new();
        let mut controller =
            GestureController::new(ScriptedSource::new(frames), recorder.clone(), KeyBindings::default());

        assert_eq!(controller.step(), Some(Action::Accelerate));
        for _ in 1..RELEASE_AFTER_FAILURES {
            assert_eq!(controller.step(), Some(Action::Accelerate));
            assert_eq!(controller.keys().held_key(), Some(VirtualKey::Up));
        }
        assert_eq!(controller.step(), Some(Action::None));
        assert_eq!(controller.keys().held_key(), None);

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].same_as(KeyEventType::KeyUp, VirtualKey::Up));
        assert_eq!(controller.stats().key_releases, 1);
    }

    #[test]
    fn test_failure_backoff_grows_to_cap() {
        assert_eq!(failure_backoff(1), Duration::from_millis(FIRST_BACKOFF_MS));
        assert_eq!(failure_backoff(2), Duration::from_millis(FIRST_BACKOFF_MS * 2));
        assert!(failure_backoff(4) > failure_backoff(3));
        assert_eq!(failure_backoff(40), Duration::from_millis(MAX_BACKOFF_MS));
        assert_eq!(failure_backoff(u32::MAX), Duration::from_millis(MAX_BACKOFF_MS));
    }

    #[test]
    fn test_source_error_then_end_stops_loop() {
        let source = ScriptedSource::new(vec![
            Err(HandError::Io(std::io::Error::new(std::io::ErrorKind::Other, "gone"))),
            Ok(None),
        ]);
        let mut controller = GestureController::new(source, RecordingSink::new(), KeyBindings::default());

        let stats = controller.run(&ShutdownSignal::new());
        assert_eq!(stats.failed_frames, 1);
        assert_eq!(stats.total_frames, 1);
    }

    #[test]
    fn test_shutdown_mid_session_releases_key() {
        // Source that raises the shutdown flag while a key is held, as a signal would
        struct TerminatingSource {
            shutdown: ShutdownSignal,
            delivered: u32,
        }

        impl LandmarkSource for TerminatingSource {
            fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
                self.delivered += 1;
                if self.delivered == 3 {
                    self.shutdown.request();
                }
                frame(vec![hand([true, true, true, true, false], Handedness::Right)])
            }

            fn describe(&self) -> String {
                "terminating".to_string()
            }
        }

        let shutdown = ShutdownSignal::new();
        let source = TerminatingSource {
            shutdown: shutdown.clone(),
            delivered: 0,
        };
        let recorder = RecordingSink::new();
        let mut controller = GestureController::new(source, recorder.clone(), KeyBindings::default());

        let stats = controller.run(&shutdown);

        assert_eq!(stats.total_frames, 3);
        assert_eq!(stats.key_presses, stats.key_releases);
        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].same_as(KeyEventType::KeyUp, VirtualKey::Left));
    }

    #[test]
    fn test_run_flushes_when_source_ends() {
        let source = ScriptedSource::new(vec![
            frame(vec![hand([false, true, false, false, false], Handedness::Left)]),
            frame(vec![hand([false, true, false, false, false], Handedness::Left)]),
        ]);
        let recorder = RecordingSink::new();
        let mut controller = GestureController::new(source, recorder.clone(), KeyBindings::default());

        let stats = controller.run(&ShutdownSignal::new());

        assert_eq!(stats.total_frames, 2);
        assert_eq!(stats.accelerate_frames, 2);
        assert_eq!(stats.key_presses, 1);
        assert_eq!(stats.key_releases, 1);
        assert_eq!(stats.mean_processing_ms(), Some(4.0));
        assert_eq!(controller.keys().held_key(), None);

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert!(events[1].same_as(KeyEventType::KeyUp, VirtualKey::Up));
    }

    #[test]
    fn test_run_stops_on_shutdown() {
        let frames = (0..100)
            .map(|_| frame(vec![hand([false; 5], Handedness::Left)]))
            .collect();
        let recorder = RecordingSink::new();
        let mut controller =
            GestureController::new(ScriptedSource::new(frames), recorder.clone(), KeyBindings::default());

        controller.step();
        assert_eq!(controller.keys().held_key(), Some(VirtualKey::Down));

        let shutdown = ShutdownSignal::new();
        shutdown.request();
        let stats = controller.run(&shutdown);

        assert_eq!(stats.total_frames, 1);
        assert_eq!(controller.keys().held_key(), None);
        assert_eq!(recorder.events().len(), 2);
    }
}
