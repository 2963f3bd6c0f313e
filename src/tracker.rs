// Where fingertip positions come from. Two sources, same output shape:
//   - MediaPipeTracker: real hand landmarks from a Python helper process
//     (mediapipe has no Rust bindings; frames go out over stdin, one JSON
//     line per frame comes back over stdout).
//   - MouseTracker: the cursor stands in for the fingertip, so everything
//     downstream can be exercised without a camera-facing hand.
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Deserialize;

use crate::error::Error;
use crate::types::{FrameBuffer, Point};

/// Hand landmark indices (MediaPipe hand landmark model convention).
/// See: https://google.github.io/mediapipe/solutions/hands.html
pub mod landmark {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    pub const COUNT: usize = 21;
}

/// Landmark pairs that form the hand skeleton, for the overlay.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = {
    use landmark::*;
    [
        // palm
        (WRIST, THUMB_CMC),
        (WRIST, INDEX_FINGER_MCP),
        (WRIST, PINKY_MCP),
        (INDEX_FINGER_MCP, MIDDLE_FINGER_MCP),
        (MIDDLE_FINGER_MCP, RING_FINGER_MCP),
        (RING_FINGER_MCP, PINKY_MCP),
        // thumb
        (THUMB_CMC, THUMB_MCP),
        (THUMB_MCP, THUMB_IP),
        (THUMB_IP, THUMB_TIP),
        // index
        (INDEX_FINGER_MCP, INDEX_FINGER_PIP),
        (INDEX_FINGER_PIP, INDEX_FINGER_DIP),
        (INDEX_FINGER_DIP, INDEX_FINGER_TIP),
        // middle
        (MIDDLE_FINGER_MCP, MIDDLE_FINGER_PIP),
        (MIDDLE_FINGER_PIP, MIDDLE_FINGER_DIP),
        (MIDDLE_FINGER_DIP, MIDDLE_FINGER_TIP),
        // ring
        (RING_FINGER_MCP, RING_FINGER_PIP),
        (RING_FINGER_PIP, RING_FINGER_DIP),
        (RING_FINGER_DIP, RING_FINGER_TIP),
        // pinky
        (PINKY_MCP, PINKY_PIP),
        (PINKY_PIP, PINKY_DIP),
        (PINKY_DIP, PINKY_TIP),
    ]
};

/// Detections below this score are treated as "no hand".
pub const DETECTION_CONFIDENCE: f32 = 0.7;

const HELPER_SCRIPT: &str = "hand_detect.py";
const VENV_PYTHON: &str = ".venv/bin/python";

/// One landmark, coordinates normalized to the frame (0.0 to 1.0 inside it).
#[derive(Clone, Copy, Debug, Default)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist; carried along but unused here.
    pub z: f32,
}

/// One detected hand: all 21 landmarks plus detection metadata.
#[derive(Clone, Debug)]
pub struct Hand {
    pub landmarks: [Landmark; landmark::COUNT],
    pub confidence: f32,
    /// "Left" or "Right" as reported by the model.
    pub handedness: String,
}

impl Hand {
    /// Index fingertip in pixel coordinates. This is the single point the
    /// rest of the program steers by.
    pub fn fingertip_px(&self, width: usize, height: usize) -> Point {
        self.landmark_px(landmark::INDEX_FINGER_TIP, width, height)
    }

    /// Any landmark in pixel coordinates.
    pub fn landmark_px(&self, idx: usize, width: usize, height: usize) -> Point {
        let lm = &self.landmarks[idx];
        Point::new((lm.x * width as f32) as i32, (lm.y * height as f32) as i32)
    }
}

// Wire structs for the helper's JSON lines.
#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Map one response line to at most one hand.
/// Helper-side errors and malformed hands degrade to "no hand" with a log
/// line; an unparseable response is a real error.
fn parse_detection(line: &str, min_confidence: f32) -> Result<Option<Hand>, Error> {
    let result: DetectionJson = serde_json::from_str(line)
        .map_err(|e| Error::TrackerIo(format!("bad detector response {line:?}: {e}")))?;

    if let Some(error) = result.error {
        log::warn!("hand detector reported: {error}");
        return Ok(None);
    }

    for hand in result.hands {
        if hand.score < min_confidence {
            continue;
        }
        if hand.landmarks.len() != landmark::COUNT {
            log::warn!("expected {} landmarks, got {}", landmark::COUNT, hand.landmarks.len());
            continue;
        }

        let mut landmarks = [Landmark::default(); landmark::COUNT];
        for (i, lm) in hand.landmarks.iter().enumerate() {
            landmarks[i] = Landmark { x: lm.x, y: lm.y, z: lm.z };
        }

        let tip = landmarks[landmark::INDEX_FINGER_TIP];
        log::debug!(
            "hand: {} (score {:.2}), index tip ({:.3},{:.3},{:.3})",
            hand.handedness,
            hand.score,
            tip.x,
            tip.y,
            tip.z,
        );

        return Ok(Some(Hand { landmarks, confidence: hand.score, handedness: hand.handedness }));
    }

    Ok(None)
}

/// Real hand tracking through the bundled `hand_detect.py`.
///
/// Protocol per frame: a 12-byte little-endian header (width, height,
/// channels) followed by that many raw RGB bytes on the helper's stdin;
/// one JSON line back on its stdout. The helper prints READY once its
/// model is loaded.
pub struct MediaPipeTracker {
    process: Child,
    stdout: BufReader<ChildStdout>,
    rgb_scratch: Vec<u8>,
    min_confidence: f32,
}

impl MediaPipeTracker {
    /// True when both the helper script and its virtualenv are in place.
    pub fn available() -> bool {
        Path::new(HELPER_SCRIPT).exists() && Path::new(VENV_PYTHON).exists()
    }

    pub fn new() -> Result<Self, Error> {
        if !Path::new(HELPER_SCRIPT).exists() {
            return Err(Error::TrackerInit(format!("{HELPER_SCRIPT} not found in working directory")));
        }
        if !Path::new(VENV_PYTHON).exists() {
            return Err(Error::TrackerInit(
                "python venv missing; run: python3 -m venv .venv && .venv/bin/pip install mediapipe numpy".into(),
            ));
        }

        log::info!("starting mediapipe helper process");
        let mut process = Command::new(VENV_PYTHON)
            .arg(HELPER_SCRIPT)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::TrackerInit(format!("spawning {VENV_PYTHON}: {e}")))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| Error::TrackerInit("helper stdout unavailable".into()))?;
        let mut stdout = BufReader::new(stdout);

        // The model load takes a moment; the helper prints READY when done.
        let mut ready = String::new();
        stdout
            .read_line(&mut ready)
            .map_err(|e| Error::TrackerInit(format!("waiting for READY: {e}")))?;
        if ready.trim() != "READY" {
            return Err(Error::TrackerInit(format!("helper did not signal READY, got {ready:?}")));
        }
        log::info!("mediapipe helper ready");

        Ok(Self {
            process,
            stdout,
            rgb_scratch: Vec::new(),
            min_confidence: DETECTION_CONFIDENCE,
        })
    }

    /// Ship one frame to the helper and read back the detection for it.
    pub fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error> {
        // Unpack 0x00RRGGBB into the byte order the helper expects.
        self.rgb_scratch.clear();
        self.rgb_scratch.reserve(frame.pixels.len() * 3);
        for &px in &frame.pixels {
            self.rgb_scratch.push(((px >> 16) & 0xFF) as u8);
            self.rgb_scratch.push(((px >> 8) & 0xFF) as u8);
            self.rgb_scratch.push((px & 0xFF) as u8);
        }

        let stdin = self
            .process
            .stdin
            .as_mut()
            .ok_or_else(|| Error::TrackerIo("helper stdin closed".into()))?;

        let io_err = |e: std::io::Error| Error::TrackerIo(format!("sending frame: {e}"));
        stdin.write_all(&(frame.width as u32).to_le_bytes()).map_err(io_err)?;
        stdin.write_all(&(frame.height as u32).to_le_bytes()).map_err(io_err)?;
        stdin.write_all(&3u32.to_le_bytes()).map_err(io_err)?;
        stdin.write_all(&self.rgb_scratch).map_err(io_err)?;
        stdin.flush().map_err(io_err)?;

        let mut response = String::new();
        let n = self
            .stdout
            .read_line(&mut response)
            .map_err(|e| Error::TrackerIo(format!("reading detection: {e}")))?;
        if n == 0 {
            return Err(Error::TrackerIo("helper process exited".into()));
        }

        parse_detection(&response, self.min_confidence)
    }
}

impl Drop for MediaPipeTracker {
    fn drop(&mut self) {
        let _ = self.process.kill();
    }
}

// A raised-index silhouette, as (dx, dy) offsets from the fingertip in
// normalized coordinates. Only there so the simulated hand draws like a
// real detection; the classifier never looks past the fingertip.
const SIM_HAND_SHAPE: [(f32, f32); landmark::COUNT] = [
    (0.02, 0.30),   // wrist
    (-0.04, 0.26),  // thumb
    (-0.08, 0.22),
    (-0.11, 0.19),
    (-0.13, 0.16),
    (0.00, 0.15),   // index, raised
    (0.00, 0.10),
    (0.00, 0.05),
    (0.00, 0.00),   // index tip = fingertip
    (0.04, 0.15),   // middle, curled
    (0.05, 0.11),
    (0.05, 0.14),
    (0.05, 0.17),
    (0.08, 0.16),   // ring, curled
    (0.09, 0.12),
    (0.09, 0.15),
    (0.09, 0.18),
    (0.12, 0.18),   // pinky, curled
    (0.13, 0.15),
    (0.13, 0.17),
    (0.13, 0.19),
];

/// Simulated tracking: the window cursor is the index fingertip.
/// The cursor leaving the window reads as the hand leaving the frame.
pub struct MouseTracker {
    cursor: Option<(usize, usize)>,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self { cursor: None }
    }

    /// Called once per frame with the cursor position, if it is inside the
    /// window.
    pub fn set_cursor(&mut self, cursor: Option<(usize, usize)>) {
        self.cursor = cursor;
    }

    pub fn detect(&self, frame: &FrameBuffer) -> Option<Hand> {
        let (mx, my) = self.cursor?;
        let tip_x = mx as f32 / frame.width as f32;
        let tip_y = my as f32 / frame.height as f32;

        let mut landmarks = [Landmark::default(); landmark::COUNT];
        for (i, (dx, dy)) in SIM_HAND_SHAPE.iter().enumerate() {
            landmarks[i] = Landmark { x: tip_x + dx, y: tip_y + dy, z: 0.0 };
        }

        Some(Hand { landmarks, confidence: 1.0, handedness: "Right".into() })
    }
}

/// The tracker the frame loop actually runs, picked once at startup.
pub enum Tracker {
    MediaPipe(MediaPipeTracker),
    Mouse(MouseTracker),
}

impl Tracker {
    pub fn detect(&mut self, frame: &FrameBuffer) -> Result<Option<Hand>, Error> {
        match self {
            Tracker::MediaPipe(t) => t.detect(frame),
            Tracker::Mouse(t) => Ok(t.detect(frame)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tracker::MediaPipe(_) => "mediapipe hand tracking",
            Tracker::Mouse(_) => "mouse simulation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hand_json(score: f32, n_landmarks: usize) -> String {
        let landmarks: Vec<_> = (0..n_landmarks)
            .map(|i| json!({ "x": 0.5, "y": if i == landmark::INDEX_FINGER_TIP { 0.25 } else { 0.5 }, "z": 0.0 }))
            .collect();
        json!({ "hands": [{ "handedness": "Right", "score": score, "landmarks": landmarks }] })
            .to_string()
    }

    #[test]
    fn test_parse_confident_hand() {
        let hand = parse_detection(&hand_json(0.93, 21), DETECTION_CONFIDENCE)
            .unwrap()
            .expect("hand expected");

        assert_eq!(hand.handedness, "Right");
        assert!((hand.confidence - 0.93).abs() < 1e-6);
        assert_eq!(hand.fingertip_px(640, 480), Point::new(320, 120));
    }

    #[test]
    fn test_parse_rejects_low_confidence() {
        let hand = parse_detection(&hand_json(0.4, 21), DETECTION_CONFIDENCE).unwrap();
        assert!(hand.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_landmark_count() {
        let hand = parse_detection(&hand_json(0.95, 17), DETECTION_CONFIDENCE).unwrap();
        assert!(hand.is_none());
    }

    #[test]
    fn test_parse_empty_and_error_responses() {
        assert!(parse_detection(r#"{"hands":[]}"#, 0.7).unwrap().is_none());
        assert!(
            parse_detection(r#"{"hands":[],"error":"camera frame was garbage"}"#, 0.7)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(parse_detection("not json at all", 0.7).is_err());
    }

    #[test]
    fn test_mouse_tracker_with_no_cursor() {
        let tracker = MouseTracker::new();
        let frame = FrameBuffer { width: 640, height: 480, pixels: vec![0; 640 * 480] };
        assert!(tracker.detect(&frame).is_none());
    }

    #[test]
    fn test_mouse_tracker_cursor_is_the_fingertip() {
        let mut tracker = MouseTracker::new();
        let frame = FrameBuffer { width: 640, height: 480, pixels: vec![0; 640 * 480] };
        tracker.set_cursor(Some((320, 240)));

        let hand = tracker.detect(&frame).expect("hand expected");
        assert_eq!(hand.fingertip_px(frame.width, frame.height), Point::new(320, 240));
        assert!((hand.confidence - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_hand_connections_stay_in_range() {
        assert_eq!(HAND_CONNECTIONS.len(), 21);
        for (a, b) in HAND_CONNECTIONS {
            assert!(a < landmark::COUNT);
            assert!(b < landmark::COUNT);
            assert_ne!(a, b);
        }
    }
}
