pub mod config;
pub mod shutdown;

// Gesture pipeline: landmarks -> finger state -> action -> key presses
pub mod finger_state;
pub mod gesture_classifier;
pub mod key_state;
pub mod gesture_loop;
