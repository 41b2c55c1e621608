use crate::core::finger_state::extract_finger_state;
use crate::models::gesture::{Action, FingerState};
use crate::models::hand::{Hand, Handedness};

/// Map a finger state and handedness label to a controller action.
///
/// Rules are checked in order and the first match wins:
///
/// | extended | hand  | action      |
/// |----------|-------|-------------|
/// | 4        | right | steer left  |
/// | 5        | left  | steer right |
/// | 1        | any   | accelerate  |
/// | 0        | any   | brake       |
/// | other    | any   | none        |
///
/// With a mirrored camera the same open-hand gesture counts four fingers under
/// one label and five under the other, which is what separates the two steering
/// directions.
pub fn classify(state: FingerState, handedness: Handedness) -> Action {
    match (state.total(), handedness) {
        (4, Handedness::Right) => Action::SteerLeft,
        (5, Handedness::Left) => Action::SteerRight,
        (1, _) => Action::Accelerate,
        (0, _) => Action::Brake,
        _ => Action::None,
    }
}

/// Classify a whole frame. Only the first detected hand steers; an empty frame is `None`.
pub fn classify_frame(hands: &[Hand]) -> Action {
    match hands.first() {
        Some(hand) => classify(extract_finger_state(hand), hand.handedness()),
        None => Action::None,
    }
}
