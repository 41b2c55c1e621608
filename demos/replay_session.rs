// Demo: drive the gesture pipeline with a synthetic recorded session
// Run with: cargo run --example replay_session

use gesture_drive_lib::core::config::KeyBindings;
use gesture_drive_lib::core::gesture_loop::{log_session_summary, GestureController};
use gesture_drive_lib::core::shutdown::ShutdownSignal;
use gesture_drive_lib::models::hand::{Hand, Handedness, Landmark, LANDMARK_COUNT};
use gesture_drive_lib::platform::hands::replay::{RecordedFrame, RecordedHand};
use gesture_drive_lib::platform::hands::ReplaySource;
use gesture_drive_lib::platform::input::RecordingSink;
use std::io::Cursor;

fn synthetic_hand(fingers: [bool; 5], handedness: Handedness) -> Hand {
    let mut lms = [Landmark::new(320, 240); LANDMARK_COUNT];
    lms[4] = Landmark::new(if fingers[0] { 340 } else { 300 }, 240);
    for (slot, tip) in [8, 12, 16, 20].into_iter().enumerate() {
        lms[tip] = Landmark::new(320, if fingers[slot + 1] { 150 } else { 280 });
    }
    Hand::from_array(lms, handedness)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== Replay Session Demo ===\n");

    // Accelerate, steer left, steer right, brake, then let go
    let script: Vec<(usize, Option<([bool; 5], Handedness)>)> = vec![
        (10, Some(([false, true, false, false, false], Handedness::Right))),
        (5, Some(([true, true, true, true, false], Handedness::Right))),
        (5, Some(([true, true, true, true, true], Handedness::Left))),
        (8, Some(([false; 5], Handedness::Right))),
        (3, None),
    ];

    let mut lines = Vec::new();
    for (count, gesture) in &script {
        let hands = match gesture {
            Some((fingers, handedness)) => vec![RecordedHand::from_hand(&synthetic_hand(*fingers, *handedness))],
            None => vec![],
        };
        let line = serde_json::to_string(&RecordedFrame { hands })?;
        for _ in 0..*count {
            lines.push(line.clone());
        }
    }

    let source = ReplaySource::from_reader(Cursor::new(lines.join("\n")), "synthetic session");
    let recorder = RecordingSink::new();
    let mut controller = GestureController::new(source, recorder.clone(), KeyBindings::default());

    let stats = controller.run(&ShutdownSignal::new());
    log_session_summary(&stats);

    println!("\nKey events:");
    for event in recorder.events() {
        println!("  {:>8}  {}", event.event_type.to_string(), event.key.to_string());
    }

    println!("\n✓ {} frames, {} presses, {} releases", stats.total_frames, stats.key_presses, stats.key_releases);

    Ok(())
}
