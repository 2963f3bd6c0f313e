// Turns fingertip positions from consecutive frames into swipe directions.
// Stateless apart from one anchor point: where the fingertip was last frame.

use crate::types::{Direction, Point};

/// Per-axis displacement, in pixels, that inter-frame motion must exceed
/// before it counts as a swipe. Below this it is jitter.
pub const SWIPE_THRESHOLD: i32 = 15;

/// The motion seen between the two most recent fingertip sightings.
/// Kept around so the renderer can trace what the classifier last looked at.
#[derive(Debug, Clone, Copy)]
pub struct Motion {
    pub from: Point,
    pub to: Point,
    /// Whether this motion cleared the threshold.
    pub swipe: bool,
}

pub struct SwipeClassifier {
    threshold: i32,
    prev: Option<Point>,
    motion: Option<Motion>,
}

impl SwipeClassifier {
    pub fn new(threshold: i32) -> Self {
        Self { threshold, prev: None, motion: None }
    }

    /// Feed one frame's fingertip position, `None` when no hand was seen.
    /// Returns `Some(direction)` only on the frame that completes a swipe.
    ///
    /// The anchor always moves to the current position, swipe or not, so a
    /// slow drift across the whole frame never accumulates into a gesture.
    /// A tracking gap clears the anchor: the hand may re-enter anywhere
    /// without producing a phantom swipe.
    pub fn observe(&mut self, fingertip: Option<Point>) -> Option<Direction> {
        let Some(cur) = fingertip else {
            self.prev = None;
            self.motion = None;
            return None;
        };

        let Some(prev) = self.prev.replace(cur) else {
            // First sighting after a gap: nothing to compare against yet.
            self.motion = None;
            return None;
        };

        let dx = cur.x - prev.x;
        let dy = cur.y - prev.y;

        let dir = if dx.abs() > self.threshold || dy.abs() > self.threshold {
            if dx.abs() > dy.abs() {
                Some(if dx > 0 { Direction::Right } else { Direction::Left })
            } else {
                // |dx| == |dy| lands here: the vertical reading wins.
                Some(if dy > 0 { Direction::Down } else { Direction::Up })
            }
        } else {
            None
        };

        self.motion = Some(Motion { from: prev, to: cur, swipe: dir.is_some() });
        dir
    }

    /// The motion checked on the most recent `observe`, if there was one.
    pub fn motion(&self) -> Option<Motion> {
        self.motion
    }
}

impl Default for SwipeClassifier {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD)
    }
}
