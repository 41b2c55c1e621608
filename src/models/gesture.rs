// Data models for finger states, gesture actions, and session statistics

use serde::{Deserialize, Serialize};

// ==============================================================================
// Finger State
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

/// Which fingers are extended in one frame (thumb, index, middle, ring, pinky)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    pub fn new(extended: [bool; 5]) -> Self {
        Self(extended)
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    /// Number of extended fingers
    pub fn total(&self) -> usize {
        self.0.iter().filter(|&&extended| extended).count()
    }
}

// ==============================================================================
// Actions
// ==============================================================================

/// Logical controller action selected by a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    SteerLeft,
    SteerRight,
    Accelerate,
    Brake,
    None,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::SteerLeft,
        Action::SteerRight,
        Action::Accelerate,
        Action::Brake,
        Action::None,
    ];

    /// Short label shown to the player
    pub fn label(&self) -> &'static str {
        match self {
            Action::SteerLeft => "LEFT",
            Action::SteerRight => "RIGHT",
            Action::Accelerate => "UP",
            Action::Brake => "DOWN",
            Action::None => "NONE",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Action::None)
    }
}

// ==============================================================================
// Session Statistics
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_frames: u64,
    pub frames_with_hand: u64,
    pub failed_frames: u64,
    pub key_presses: u64,
    pub key_releases: u64,
    pub steer_left_frames: u64,
    pub steer_right_frames: u64,
    pub accelerate_frames: u64,
    pub brake_frames: u64,
    pub idle_frames: u64,
    /// Hand tracking time summed over every delivered frame
    pub processing_ms_total: u64,
}

impl SessionStats {
    pub fn record_action(&mut self, action: Action) {
        self.total_frames += 1;
        let counter = match action {
            Action::SteerLeft => &mut self.steer_left_frames,
            Action::SteerRight => &mut self.steer_right_frames,
            Action::Accelerate => &mut self.accelerate_frames,
            Action::Brake => &mut self.brake_frames,
            Action::None => &mut self.idle_frames,
        };
        *counter += 1;
    }

    pub fn frames_for(&self, action: Action) -> u64 {
        match action {
            Action::SteerLeft => self.steer_left_frames,
            Action::SteerRight => self.steer_right_frames,
            Action::Accelerate => self.accelerate_frames,
            Action::Brake => self.brake_frames,
            Action::None => self.idle_frames,
        }
    }

    /// Mean hand tracking time over frames the source delivered
    pub fn mean_processing_ms(&self) -> Option<f64> {
        let delivered = self.total_frames.saturating_sub(self.failed_frames);
        if delivered == 0 {
            return None;
        }
        Some(self.processing_ms_total as f64 / delivered as f64)
    }

    /// The non-idle action seen in the most frames
    pub fn dominant_action(&self) -> Option<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|action| !action.is_none())
            .map(|action| (action, self.frames_for(action)))
            .filter(|(_, frames)| *frames > 0)
            .max_by_key(|(_, frames)| *frames)
            .map(|(action, _)| action)
    }
}
