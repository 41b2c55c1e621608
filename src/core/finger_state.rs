use crate::models::gesture::FingerState;
use crate::models::hand::{Hand, HandLandmark};

/// Fingertips paired with the joint two landmarks below them
const FINGER_JOINTS: [(HandLandmark, HandLandmark); 4] = [
    (HandLandmark::IndexFingerTip, HandLandmark::IndexFingerPip),
    (HandLandmark::MiddleFingerTip, HandLandmark::MiddleFingerPip),
    (HandLandmark::RingFingerTip, HandLandmark::RingFingerPip),
    (HandLandmark::PinkyTip, HandLandmark::PinkyPip),
];

/// Work out which fingers are extended in this frame.
///
/// The thumb counts as extended when its tip lies to the right of the IP joint
/// in image space. This comparison is not mirrored for left hands, so a left
/// thumb reads the opposite way round; gesture thresholds are tuned around that.
///
/// The other fingers count as extended when the tip sits strictly higher in the
/// frame (smaller y) than the PIP joint.
pub fn extract_finger_state(hand: &Hand) -> FingerState {
    let mut extended = [false; 5];

    let thumb_tip = hand.landmark(HandLandmark::ThumbTip);
    let thumb_ip = hand.landmark(HandLandmark::ThumbIp);
    extended[0] = thumb_tip.x > thumb_ip.x;

    for (slot, (tip, joint)) in FINGER_JOINTS.iter().enumerate() {
        extended[slot + 1] = hand.landmark(*tip).y < hand.landmark(*joint).y;
    }

    FingerState::new(extended)
}
