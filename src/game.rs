// Snake rules on a pixel grid. The playfield is the camera frame; every
// coordinate the game hands out is the top-left corner of a block-sized cell.
use rand::Rng;

use crate::config::GameConfig;
use crate::types::{Direction, Point};

// Rejection sampling gives up after this many draws and falls back to an
// explicit free-cell list, so a crowded board cannot stall the frame loop.
const FOOD_RETRY_CAP: usize = 1000;

pub struct SnakeGame {
    config: GameConfig,
    /// Body cells, head at index 0.
    body: Vec<Point>,
    heading: Direction,
    food: Point,
    score: u32,
    game_over: bool,
    rng: rand::rngs::ThreadRng,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Self {
        let mut game = Self {
            config,
            body: Vec::new(),
            heading: Direction::Right,
            food: Point::new(0, 0),
            score: 0,
            game_over: false,
            rng: rand::thread_rng(),
        };
        game.reset();
        game
    }

    /// Back to the starting layout: a short snake at the center of the
    /// playfield, heading right, nothing eaten yet.
    pub fn reset(&mut self) {
        let block = self.config.block;
        let cx = self.config.width / block / 2 * block;
        let cy = self.config.height / block / 2 * block;

        self.body.clear();
        self.body.push(Point::new(cx, cy));
        for i in 1..self.config.initial_len {
            self.body.push(Point::new(cx - i as i32 * block, cy));
        }

        self.heading = Direction::Right;
        self.score = 0;
        self.game_over = false;
        self.food = self.place_food();
    }

    /// Advance the simulation by one step.
    ///
    /// `proposed` is the most recent swipe, if any. A proposal that would
    /// reverse the snake onto itself is ignored and the snake keeps going.
    /// Once the game is over this is a no-op until `reset`.
    pub fn tick(&mut self, proposed: Option<Direction>) {
        if self.game_over {
            return;
        }

        if let Some(dir) = proposed {
            if !dir.is_opposite(self.heading) {
                self.heading = dir;
            }
        }

        // Collision is decided before the body changes, so a losing tick
        // leaves the snake exactly where it was.
        let new_head = self.body[0].stepped(self.heading, self.config.block);
        if !self.in_bounds(new_head) || self.body.contains(&new_head) {
            self.game_over = true;
            return;
        }

        self.body.insert(0, new_head);
        if new_head == self.food {
            self.score += 1;
            self.food = self.place_food();
        } else {
            self.body.pop();
        }
    }

    pub fn body(&self) -> &[Point] {
        &self.body
    }

    pub fn food(&self) -> Point {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.config.width && p.y < self.config.height
    }

    /// Pick a grid-aligned cell that the snake does not occupy.
    /// Random draws first; if the board is so crowded that the cap runs out,
    /// enumerate the free cells and pick among those.
    fn place_food(&mut self) -> Point {
        let (cols, rows) = self.config.grid_cells();
        let block = self.config.block;

        for _ in 0..FOOD_RETRY_CAP {
            let x = self.rng.gen_range(0..cols) * block;
            let y = self.rng.gen_range(0..rows) * block;
            let pos = Point::new(x, y);
            if !self.body.contains(&pos) {
                return pos;
            }
        }

        let mut free = Vec::new();
        for cy in 0..rows {
            for cx in 0..cols {
                let pos = Point::new(cx * block, cy * block);
                if !self.body.contains(&pos) {
                    free.push(pos);
                }
            }
        }
        // The snake can never cover every cell of a camera-sized board.
        free[self.rng.gen_range(0..free.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_layout() {
        let game = SnakeGame::new(GameConfig::default());

        assert_eq!(
            game.body(),
            &[Point::new(320, 240), Point::new(300, 240), Point::new(280, 240)]
        );
        assert_eq!(game.heading, Direction::Right);
        assert_eq!(game.score(), 0);
        assert!(!game.is_over());
    }

    #[test]
    fn test_basic_movement() {
        let mut game = SnakeGame::new(GameConfig::small());
        let initial_head = game.body[0];
        let initial_len = game.body().len();

        game.tick(None);

        assert!(!game.is_over());
        assert_eq!(game.body[0], initial_head.stepped(Direction::Right, 20));
        assert_eq!(game.body().len(), initial_len);
    }

    #[test]
    fn test_tail_cell_is_vacated() {
        let mut game = SnakeGame::new(GameConfig::small());
        game.food = Point::new(0, 80); // off the snake's path
        let old_tail = *game.body().last().unwrap();

        game.tick(None);

        assert!(!game.body().contains(&old_tail));
    }

    #[test]
    fn test_food_consumption_grows_and_scores() {
        let mut game = SnakeGame::new(GameConfig::small());
        let target = game.body[0].stepped(Direction::Right, 20);
        game.food = target;
        let initial_len = game.body().len();

        game.tick(None);

        assert_eq!(game.score(), 1);
        assert_eq!(game.body().len(), initial_len + 1);
        assert_eq!(game.body[0], target);
        // Replacement food is somewhere else and off the body.
        assert_ne!(game.food(), target);
        assert!(!game.body().contains(&game.food()));
    }

    #[test]
    fn test_two_meals_two_points() {
        let mut game = SnakeGame::new(GameConfig::small());

        game.food = game.body[0].stepped(Direction::Right, 20);
        game.tick(None);
        game.food = game.body[0].stepped(Direction::Right, 20);
        game.tick(None);

        assert_eq!(game.score(), 2);
        assert_eq!(game.body().len(), 5);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut game = SnakeGame::new(GameConfig::small());
        let initial_head = game.body[0];

        game.tick(Some(Direction::Left));

        assert_eq!(game.heading, Direction::Right);
        assert_eq!(game.body[0], initial_head.stepped(Direction::Right, 20));
        assert!(!game.is_over());
    }

    #[test]
    fn test_perpendicular_turn_applies() {
        let mut game = SnakeGame::new(GameConfig::small());
        let initial_head = game.body[0];

        game.tick(Some(Direction::Down));

        assert_eq!(game.heading, Direction::Down);
        assert_eq!(game.body[0], initial_head.stepped(Direction::Down, 20));
    }

    #[test]
    fn test_wall_collision_ends_game() {
        let mut game = SnakeGame::new(GameConfig::small());
        game.food = Point::new(0, 80); // keep the walk deterministic

        // Head starts at x=40 on a 100 px board; two steps reach the last
        // column, the third would leave it.
        game.tick(None);
        game.tick(None);
        assert!(!game.is_over());

        let body_before = game.body().to_vec();
        game.tick(None);

        assert!(game.is_over());
        assert_eq!(game.body(), body_before.as_slice());
    }

    #[test]
    fn test_self_collision_ends_game() {
        let mut game = SnakeGame::new(GameConfig::small());
        game.body = vec![
            Point::new(60, 40),
            Point::new(40, 40),
            Point::new(20, 40),
            Point::new(0, 40),
        ];
        game.food = Point::new(80, 0);

        // A tight clockwise loop walks the head back onto the body.
        game.tick(Some(Direction::Down));
        game.tick(Some(Direction::Left));
        assert!(!game.is_over());
        game.tick(Some(Direction::Up));

        assert!(game.is_over());
    }

    #[test]
    fn test_game_over_tick_is_inert() {
        let mut game = SnakeGame::new(GameConfig::small());
        game.game_over = true;
        let body_before = game.body().to_vec();
        let heading_before = game.heading;

        game.tick(Some(Direction::Down));

        assert!(game.is_over());
        assert_eq!(game.body(), body_before.as_slice());
        assert_eq!(game.heading, heading_before);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_reset_revives_after_game_over() {
        let mut game = SnakeGame::new(GameConfig::small());
        game.game_over = true;
        game.score = 7;

        game.reset();

        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.body().len(), 3);
        assert_eq!(game.body[0], Point::new(40, 40));
        assert_eq!(game.heading, Direction::Right);
    }

    #[test]
    fn test_food_is_grid_aligned_and_off_the_body() {
        let mut game = SnakeGame::new(GameConfig::default());
        for _ in 0..200 {
            let food = game.place_food();
            assert_eq!(food.x % 20, 0);
            assert_eq!(food.y % 20, 0);
            assert!(food.x >= 0 && food.x < 640);
            assert!(food.y >= 0 && food.y < 480);
            assert!(!game.body().contains(&food));
        }
    }

    #[test]
    fn test_food_on_nearly_full_board() {
        let mut game = SnakeGame::new(GameConfig::small());

        // Occupy every cell except one; only the free-list fallback can
        // terminate reliably here.
        let mut body = Vec::new();
        for cy in 0..5 {
            for cx in 0..5 {
                let pos = Point::new(cx * 20, cy * 20);
                if pos != Point::new(80, 80) {
                    body.push(pos);
                }
            }
        }
        game.body = body;

        assert_eq!(game.place_food(), Point::new(80, 80));
    }
}
