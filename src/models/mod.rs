// Data models for hand landmarks, gestures, and synthetic keyboard input

pub mod gesture;
pub mod hand;
pub mod input;
