// Hand landmark sources
// Provides the MediaPipe bridge and a recorded-session replay source

pub mod mediapipe_bridge;
pub mod replay;

pub use mediapipe_bridge::{DefaultLandmarkSource, NullSource};
pub use replay::ReplaySource;

use crate::models::hand::{HandFrame, HandResult};

/// Produces the hands visible in each captured frame.
///
/// `next_frame` blocks until the next frame is available. `Ok(None)` means the
/// stream has ended; an `Err` is a per-frame failure and the caller may simply
/// ask again.
pub trait LandmarkSource {
    fn next_frame(&mut self) -> HandResult<Option<HandFrame>>;

    /// Backend description for logs
    fn describe(&self) -> String;
}

impl<L: LandmarkSource + ?Sized> LandmarkSource for Box<L> {
    fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
