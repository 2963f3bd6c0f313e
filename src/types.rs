// Core types shared by the camera, tracker, game and renderer.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

/// A pixel position. Signed so that off-frame arithmetic (a snake head past
/// the top edge, a fingertip partly out of view) stays representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// The cell one `block`-sized step away in `dir`.
    pub fn stepped(self, dir: Direction, block: i32) -> Point {
        let (dx, dy) = dir.delta();
        Point::new(self.x + dx * block, self.y + dy * block)
    }
}

/// The four directions the snake (and a swipe) can take.
/// Screen coordinates: y grows downward, so Up is negative y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid step for this direction, in (dx, dy).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// True when `other` is the 180-degree reversal of `self`.
    pub fn is_opposite(self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// HUD label.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
            Direction::Left => "LEFT",
            Direction::Right => "RIGHT",
        }
    }
}

/// Every color the overlay uses, in one place.
/// Visual: green snake and swipe, red food and trail, magenta fingertip,
/// pale hand skeleton, white HUD, red game-over title.
pub struct Palette {
    pub snake_body: u32,
    pub snake_head: u32,
    pub food: u32,
    pub cell_alpha: f32, // translucency of snake/food cells over the video
    pub swipe: u32,      // the last inter-frame motion when it classified
    pub trail: u32,      // the same motion when it stayed below threshold
    pub finger: u32,     // fingertip marker dot
    pub bone: u32,       // hand skeleton segments
    pub joint: u32,      // hand skeleton landmarks
    pub hud: u32,
    pub banner: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            snake_body: 0x0000C800,
            snake_head: 0x0032FF32,
            food: 0x00C80000,
            cell_alpha: 0.65,
            swipe: 0x0000FF00,
            trail: 0x00FF0000,
            finger: 0x00FF00FF,
            bone: 0x00DCDCDC,
            joint: 0x00FF3232,
            hud: 0x00FFFFFF,
            banner: 0x00FF0000,
        }
    }
}
