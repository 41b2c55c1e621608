// MediaPipe integration bridge
// Runs webcam capture and MediaPipe Hands through PyO3 when the `ml-pyo3` feature is enabled

use crate::core::config::Config;
use crate::models::hand::{HandFrame, HandResult};
use crate::platform::hands::LandmarkSource;
use tracing::warn;

// ==============================================================================
// PyO3 Implementation (Python MediaPipe + OpenCV capture)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::hand::{Hand, HandError, Handedness, Landmark};
    use pyo3::prelude::*;
    use pyo3::types::PyDict;
    use tracing::{debug, info};

    fn inference_err(context: &str) -> impl Fn(PyErr) -> HandError + '_ {
        move |e| HandError::InferenceFailed(format!("{}: {}", context, e))
    }

    pub struct MediaPipeSource {
        capture: PyObject,
        hands: PyObject,
        cv2: PyObject,
        camera_index: u32,
    }

    impl MediaPipeSource {
        pub fn new(config: &Config) -> HandResult<Self> {
            let source = Python::with_gil(|py| -> HandResult<Self> {
                let cv2 = py.import_bound("cv2").map_err(|e| {
                    HandError::ModelLoadFailed(format!(
                        "Failed to import cv2: {}. Install it with pip install opencv-python",
                        e
                    ))
                })?;
                let mediapipe = py.import_bound("mediapipe").map_err(|e| {
                    HandError::ModelLoadFailed(format!(
                        "Failed to import mediapipe: {}. Install it with pip install mediapipe",
                        e
                    ))
                })?;

                let capture = cv2
                    .call_method1("VideoCapture", (config.camera_index,))
                    .map_err(|e| HandError::CaptureFailed(format!("Failed to open camera: {}", e)))?;

                let opened: bool = capture
                    .call_method0("isOpened")
                    .and_then(|v| v.extract())
                    .map_err(inference_err("isOpened"))?;
                if !opened {
                    return Err(HandError::CaptureFailed(format!(
                        "Camera {} could not be opened",
                        config.camera_index
                    )));
                }

                let kwargs = PyDict::new_bound(py);
                kwargs
                    .set_item("min_detection_confidence", config.min_detection_confidence)
                    .map_err(inference_err("min_detection_confidence"))?;
                kwargs
                    .set_item("min_tracking_confidence", config.min_tracking_confidence)
                    .map_err(inference_err("min_tracking_confidence"))?;
                kwargs
                    .set_item("max_num_hands", config.max_num_hands)
                    .map_err(inference_err("max_num_hands"))?;

                let hands = mediapipe
                    .getattr("solutions")
                    .and_then(|s| s.getattr("hands"))
                    .and_then(|h| h.call_method("Hands", (), Some(&kwargs)))
                    .map_err(|e| HandError::ModelLoadFailed(format!("Failed to build Hands: {}", e)))?;

                Ok(Self {
                    capture: capture.unbind(),
                    hands: hands.unbind(),
                    cv2: cv2.into_any().unbind(),
                    camera_index: config.camera_index,
                })
            })?;

            // Let auto-exposure settle before the first read
            std::thread::sleep(std::time::Duration::from_millis(config.warmup_ms));

            info!(
                "MediaPipe hand tracking ready on camera {} (detection={}, tracking={}, max_hands={})",
                config.camera_index,
                config.min_detection_confidence,
                config.min_tracking_confidence,
                config.max_num_hands
            );

            Ok(source)
        }

        fn parse_hand(
            hand_landmarks: &Bound<'_, PyAny>,
            handedness: &Bound<'_, PyAny>,
            width: u32,
            height: u32,
        ) -> HandResult<Hand> {
            let label: String = handedness
                .getattr("classification")
                .and_then(|c| c.get_item(0))
                .and_then(|c| c.getattr("label"))
                .and_then(|l| l.extract())
                .map_err(inference_err("handedness label"))?;

            let mut landmarks = Vec::new();
            for lm in hand_landmarks
                .getattr("landmark")
                .and_then(|l| l.iter())
                .map_err(inference_err("landmark list"))?
            {
                let lm = lm.map_err(inference_err("landmark"))?;
                let x: f32 = lm.getattr("x").and_then(|v| v.extract()).map_err(inference_err("x"))?;
                let y: f32 = lm.getattr("y").and_then(|v| v.extract()).map_err(inference_err("y"))?;
                landmarks.push(Landmark::from_normalized(x, y, width, height));
            }

            Hand::new(landmarks, Handedness::from_label(&label)?)
        }
    }

    impl LandmarkSource for MediaPipeSource {
        fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
            Python::with_gil(|py| {
                let (ok, image): (bool, Bound<'_, PyAny>) = self
                    .capture
                    .bind(py)
                    .call_method0("read")
                    .and_then(|r| r.extract())
                    .map_err(|e| HandError::CaptureFailed(e.to_string()))?;

                if !ok {
                    return Err(HandError::CaptureFailed(format!(
                        "No frame from camera {}",
                        self.camera_index
                    )));
                }

                let start_time = std::time::Instant::now();

                let shape: Vec<usize> = image
                    .getattr("shape")
                    .and_then(|s| s.extract())
                    .map_err(inference_err("frame shape"))?;
                let (height, width) = match shape.as_slice() {
                    [h, w, ..] => (*h as u32, *w as u32),
                    _ => return Err(HandError::InferenceFailed("Unexpected frame shape".to_string())),
                };

                let cv2 = self.cv2.bind(py);
                let code = cv2.getattr("COLOR_BGR2RGB").map_err(inference_err("COLOR_BGR2RGB"))?;
                let rgb = cv2
                    .call_method1("cvtColor", (image, code))
                    .map_err(inference_err("cvtColor"))?;

                let results = self
                    .hands
                    .bind(py)
                    .call_method1("process", (rgb,))
                    .map_err(inference_err("Hands.process"))?;

                let multi_landmarks = results
                    .getattr("multi_hand_landmarks")
                    .map_err(inference_err("multi_hand_landmarks"))?;
                let multi_handedness = results
                    .getattr("multi_handedness")
                    .map_err(inference_err("multi_handedness"))?;

                let mut hands = Vec::new();
                if !multi_landmarks.is_none() && !multi_handedness.is_none() {
                    let landmark_iter = multi_landmarks.iter().map_err(inference_err("hands"))?;
                    let handedness_iter = multi_handedness.iter().map_err(inference_err("handedness"))?;

                    for (hand_landmarks, handedness) in landmark_iter.zip(handedness_iter) {
                        let hand_landmarks = hand_landmarks.map_err(inference_err("hand"))?;
                        let handedness = handedness.map_err(inference_err("handedness"))?;

                        // A partial detection is dropped, the rest of the frame still counts
                        match Self::parse_hand(&hand_landmarks, &handedness, width, height) {
                            Ok(hand) => hands.push(hand),
                            Err(e) => debug!("Skipping hand: {}", e),
                        }
                    }
                }

                Ok(Some(HandFrame {
                    hands,
                    processing_time_ms: start_time.elapsed().as_millis() as u64,
                }))
            })
        }

        fn describe(&self) -> String {
            format!("MediaPipe Hands via PyO3 (camera {})", self.camera_index)
        }
    }

    impl Drop for MediaPipeSource {
        fn drop(&mut self) {
            Python::with_gil(|py| {
                let _ = self.capture.bind(py).call_method0("release");
                let _ = self.hands.bind(py).call_method0("close");
            });
        }
    }
}

// ==============================================================================
// Null Implementation (for builds without ML features)
// ==============================================================================

/// Never detects a hand. Used when no inference backend is compiled in.
pub struct NullSource;

impl NullSource {
    pub fn new(_config: &Config) -> HandResult<Self> {
        warn!("Using null hand tracker (no ML inference)");
        warn!("Enable the 'ml-pyo3' feature for MediaPipe hand tracking");
        Ok(Self)
    }
}

impl LandmarkSource for NullSource {
    fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
        // Pace the loop roughly like a 30 fps camera instead of spinning
        std::thread::sleep(std::time::Duration::from_millis(33));
        Ok(Some(HandFrame::empty()))
    }

    fn describe(&self) -> String {
        "Null hand tracker (no ML inference - enable 'ml-pyo3' feature)".to_string()
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub type DefaultLandmarkSource = pyo3_backend::MediaPipeSource;

#[cfg(not(feature = "ml-pyo3"))]
pub type DefaultLandmarkSource = NullSource;
