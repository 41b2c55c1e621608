use crate::models::hand::{Hand, HandError, HandFrame, HandResult, Handedness, Landmark};
use crate::platform::hands::LandmarkSource;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use tracing::{debug, info, warn};

/// One hand as stored in a recorded session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedHand {
    pub handedness: Handedness,
    /// Pixel coordinates, `[x, y]` per landmark
    pub landmarks: Vec<[i32; 2]>,
}

impl RecordedHand {
    pub fn from_hand(hand: &Hand) -> Self {
        Self {
            handedness: hand.handedness(),
            landmarks: hand.landmarks().iter().map(|lm| [lm.x, lm.y]).collect(),
        }
    }

    pub fn into_hand(self) -> HandResult<Hand> {
        let landmarks = self
            .landmarks
            .into_iter()
            .map(|[x, y]| Landmark::new(x, y))
            .collect();
        Hand::new(landmarks, self.handedness)
    }
}

/// One line of a recorded session file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    #[serde(default)]
    pub hands: Vec<RecordedHand>,
}

/// Replays hand frames recorded as JSON lines, one frame per line.
///
/// Blank lines are ignored. A line that fails to parse (bad JSON or bad UTF-8)
/// is reported as a frame error; a hand with the wrong landmark count is dropped
/// from its frame. Any other read error ends the replay.
pub struct ReplaySource<R: BufRead = BufReader<File>> {
    lines: Lines<R>,
    line_number: usize,
    origin: String,
    finished: bool,
}

impl ReplaySource {
    pub fn open(path: &Path) -> HandResult<Self> {
        let file = File::open(path)?;
        info!("Replaying recorded hand frames from {}", path.display());
        Ok(Self::from_reader(
            BufReader::new(file),
            path.display().to_string(),
        ))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn from_reader(reader: R, origin: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            origin: origin.into(),
            finished: false,
        }
    }

    fn parse_line(&self, line: &str) -> HandResult<HandFrame> {
        let recorded: RecordedFrame =
            serde_json::from_str(line).map_err(|e| HandError::InvalidFrame {
                line: self.line_number,
                reason: e.to_string(),
            })?;

        let mut hands = Vec::with_capacity(recorded.hands.len());
        for hand in recorded.hands {
            match hand.into_hand() {
                Ok(hand) => hands.push(hand),
                Err(e) => debug!(line = self.line_number, "Skipping hand: {}", e),
            }
        }

        Ok(HandFrame {
            hands,
            processing_time_ms: 0,
        })
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn next_frame(&mut self) -> HandResult<Option<HandFrame>> {
        loop {
            if self.finished {
                return Ok(None);
            }

            let next = self.lines.next();
            if next.is_some() {
                self.line_number += 1;
            }

            let line = match next {
                Some(Ok(line)) => line,
                Some(Err(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    // The reader has already moved past the offending line
                    return Err(HandError::InvalidFrame {
                        line: self.line_number,
                        reason: e.to_string(),
                    });
                }
                Some(Err(e)) => {
                    warn!(line = self.line_number, "Stopping replay of {}: {}", self.origin, e);
                    self.finished = true;
                    return Ok(None);
                }
                None => {
                    self.finished = true;
                    return Ok(None);
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            return self.parse_line(&line).map(Some);
        }
    }

    fn describe(&self) -> String {
        format!("Replay of {}", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hand::LANDMARK_COUNT;
    use std::io::Cursor;

    fn frame_line(handedness: &str, count: usize) -> String {
        let landmarks: Vec<[i32; 2]> = (0..count).map(|i| [i as i32, 100]).collect();
        format!(
            "{{\"hands\":[{{\"handedness\":\"{}\",\"landmarks\":{}}}]}}",
            handedness,
            serde_json::to_string(&landmarks).unwrap()
        )
    }

    #[test]
    fn test_replays_frames_in_order() {
        let data = format!(
            "{}\n\n{{\"hands\":[]}}\n{}\n",
            frame_line("right", LANDMARK_COUNT),
            frame_line("left", LANDMARK_COUNT)
        );
        let mut source = ReplaySource::from_reader(Cursor::new(data), "memory");

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.hands.len(), 1);
        assert_eq!(first.hands[0].handedness(), Handedness::Right);
        assert_eq!(first.hands[0].landmarks()[20], Landmark::new(20, 100));

        let second = source.next_frame().unwrap().unwrap();
        assert!(!second.has_hand());

        let third = source.next_frame().unwrap().unwrap();
        assert_eq!(third.hands[0].handedness(), Handedness::Left);

        assert!(source.next_frame().unwrap().is_none());
        assert_eq!(source.describe(), "Replay of memory");
    }

    #[test]
    fn test_incomplete_hand_is_dropped() {
        let data = frame_line("right", 12);
        let mut source = ReplaySource::from_reader(Cursor::new(data), "memory");

        let frame = source.next_frame().unwrap().unwrap();
        assert!(!frame.has_hand());
    }

    #[test]
    fn test_malformed_line_is_a_frame_error() {
        let data = format!("not json\n{}\n", frame_line("right", LANDMARK_COUNT));
        let mut source = ReplaySource::from_reader(Cursor::new(data), "memory");

        match source.next_frame() {
            Err(HandError::InvalidFrame { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected InvalidFrame, got {:?}", other.map(|f| f.is_some())),
        }

        // The stream continues after a bad line
        assert!(source.next_frame().unwrap().unwrap().has_hand());
    }

    #[test]
    fn test_invalid_utf8_reports_its_own_line() {
        let mut data = Vec::new();
        data.extend_from_slice(frame_line("right", LANDMARK_COUNT).as_bytes());
        data.extend_from_slice(b"\n{\"hands\":[]}\n");
        data.extend_from_slice(&[0xff, 0xfe, b'\n']);
        data.extend_from_slice(b"still not json\n");

        let mut source = ReplaySource::from_reader(Cursor::new(data), "memory");
        assert!(source.next_frame().unwrap().unwrap().has_hand());
        assert!(!source.next_frame().unwrap().unwrap().has_hand());

        match source.next_frame() {
            Err(HandError::InvalidFrame { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidFrame, got {:?}", other.map(|f| f.is_some())),
        }
        match source.next_frame() {
            Err(HandError::InvalidFrame { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected InvalidFrame, got {:?}", other.map(|f| f.is_some())),
        }
        assert!(source.next_frame().unwrap().is_none());
    }

    /// Reader that fails every read, like a directory opened as a file
    struct BrokenReader;

    impl io::Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "Is a directory"))
        }
    }

    #[test]
    fn test_read_error_ends_replay() {
        let mut source = ReplaySource::from_reader(BufReader::new(BrokenReader), "broken");
        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_replay_ends_immediately() {
        let mut source = ReplaySource::open(&std::env::temp_dir()).unwrap();
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_recorded_hand_round_trip() {
        let lms = [Landmark::new(3, 4); LANDMARK_COUNT];
        let hand = Hand::from_array(lms, Handedness::Left);
        let recorded = RecordedHand::from_hand(&hand);
        assert_eq!(recorded.into_hand().unwrap(), hand);
    }
}
