//! A real SIGTERM during a session releases the held key before the loop returns.
//! Kept in its own test binary: the listener owns the process's signal handlers.

#![cfg(unix)]

use gesture_drive_lib::core::config::KeyBindings;
use gesture_drive_lib::core::gesture_loop::GestureController;
use gesture_drive_lib::core::shutdown::ShutdownSignal;
use gesture_drive_lib::models::hand::{
    Hand, HandFrame, HandResult, Handedness, Landmark, LANDMARK_COUNT,
};
use gesture_drive_lib::models::input::{KeyEventType, VirtualKey};
use gesture_drive_lib::platform::hands::LandmarkSource;
use gesture_drive_lib::platform::input::RecordingSink;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Shows a fist forever at roughly camera pace
struct EndlessFist;

impl LandmarkSource for EndlessFist {
    fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
        thread::sleep(Duration::from_millis(10));
        let mut lms = [Landmark::new(100, 100); LANDMARK_COUNT];
        lms[4] = Landmark::new(90, 100);
        for tip in [8, 12, 16, 20] {
            lms[tip] = Landmark::new(100, 150);
        }
        Ok(Some(HandFrame {
            hands: vec![Hand::from_array(lms, Handedness::Right)],
            processing_time_ms: 0,
        }))
    }

    fn describe(&self) -> String {
        "endless fist".to_string()
    }
}

#[test]
fn sigterm_releases_held_key() {
    let shutdown = ShutdownSignal::new();
    shutdown.install_signal_handlers().unwrap();

    let pid = std::process::id().to_string();
    let killer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        Command::new("kill")
            .args(["-TERM", &pid])
            .status()
            .unwrap()
    });

    let recorder = RecordingSink::new();
    let mut controller = GestureController::new(EndlessFist, recorder.clone(), KeyBindings::default());
    let stats = controller.run(&shutdown);

    assert!(killer.join().unwrap().success());
    assert!(shutdown.is_requested());
    assert!(stats.brake_frames > 0);
    assert_eq!(stats.key_presses, 1);
    assert_eq!(stats.key_releases, 1);

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].same_as(KeyEventType::KeyDown, VirtualKey::Down));
    assert!(events[1].same_as(KeyEventType::KeyUp, VirtualKey::Down));
}
