// Data models for hand landmark detection (21 keypoints per hand)

use serde::{Deserialize, Serialize};

/// Number of landmarks MediaPipe Hands reports for one hand
pub const LANDMARK_COUNT: usize = 21;

// ==============================================================================
// Landmarks
// ==============================================================================

/// A landmark position in pixel coordinates of the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: i32,
    pub y: i32,
}

impl Landmark {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert a normalized [0, 1] detector coordinate into frame pixels.
    /// Truncates toward zero, matching how the capture pipeline rasterizes landmarks.
    pub fn from_normalized(nx: f32, ny: f32, width: u32, height: u32) -> Self {
        Self {
            x: (nx * width as f32) as i32,
            y: (ny * height as f32) as i32,
        }
    }
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

// ==============================================================================
// Hands
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn to_string(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }

    /// Parse the classification label produced by the detector ("Left" / "Right")
    pub fn from_label(label: &str) -> HandResult<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            other => Err(HandError::InvalidHandedness(other.to_string())),
        }
    }
}

/// One fully detected hand. Always holds exactly 21 landmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
    handedness: Handedness,
}

impl Hand {
    /// Build a hand from a detector landmark list, rejecting partial detections
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> HandResult<Self> {
        let found = landmarks.len();
        let landmarks: [Landmark; LANDMARK_COUNT] = landmarks
            .try_into()
            .map_err(|_| HandError::IncompleteHand { found })?;

        Ok(Self {
            landmarks,
            handedness,
        })
    }

    pub fn from_array(landmarks: [Landmark; LANDMARK_COUNT], handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    pub fn landmark(&self, which: HandLandmark) -> Landmark {
        self.landmarks[which.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }
}

/// Hands detected in a single frame
#[derive(Debug, Clone, Default)]
pub struct HandFrame {
    pub hands: Vec<Hand>,
    pub processing_time_ms: u64,
}

impl HandFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_hand(&self) -> bool {
        !self.hands.is_empty()
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HandError {
    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Camera read failed: {0}")]
    CaptureFailed(String),

    #[error("Incomplete hand: expected 21 landmarks, found {found}")]
    IncompleteHand { found: usize },

    #[error("Unknown handedness label: {0}")]
    InvalidHandedness(String),

    #[error("Invalid recorded frame at line {line}: {reason}")]
    InvalidFrame { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type HandResult<T> = Result<T, HandError>;
