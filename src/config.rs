use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the playfield and the pace of the game.
/// The playfield spans the whole camera frame, so `width`/`height` are in
/// pixels and the grid is derived by dividing through `block`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Playfield width in pixels
    pub width: i32,
    /// Playfield height in pixels
    pub height: i32,
    /// Side of one grid cell in pixels
    pub block: i32,
    /// Initial length of the snake, in cells
    pub initial_len: usize,
    /// Wall-clock time between simulation steps
    pub tick_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            block: 20,
            initial_len: 3,
            tick_interval: Duration::from_millis(150),
        }
    }
}

impl GameConfig {
    /// Configuration for a playfield of the given pixel size.
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height, ..Default::default() }
    }

    /// A 5x5-cell playfield for tests.
    #[cfg(test)]
    pub fn small() -> Self {
        Self::new(100, 100)
    }

    /// Number of whole cells per axis, (columns, rows).
    pub fn grid_cells(&self) -> (i32, i32) {
        (self.width / self.block, self.height / self.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.block, 20);
        assert_eq!(config.initial_len, 3);
        assert_eq!(config.tick_interval, Duration::from_millis(150));
    }

    #[test]
    fn test_grid_cells() {
        let config = GameConfig::default();
        assert_eq!(config.grid_cells(), (32, 24));
        assert_eq!(GameConfig::small().grid_cells(), (5, 5));
    }
}
