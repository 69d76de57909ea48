use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::grid::{Grid, Heading, Position};
use crate::snake::{MoveResult, Snake};

/// What a single simulation step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Stayed,
    Moved,
    Ate,
    /// The snake ran into itself (or filled the grid) and the game restarted.
    Reset,
}

pub struct Game {
    grid: Grid,
    snake: Snake,
    food: Position,
    rng: StdRng,
}

impl Game {
    /// Starts a game with a random one-cell snake. A `seed` makes every
    /// spawn position reproducible.
    pub fn new(grid: Grid, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Game::with_rng(grid, rng)
    }

    pub fn with_rng(grid: Grid, mut rng: StdRng) -> Self {
        assert!(grid.cell_count() >= 2, "the grid needs room for a snake and its food");

        let snake = Snake::new(grid.random_cell(&mut rng));
        let mut game = Game { grid, food: snake.head(), snake, rng };
        game.place_food();
        game
    }

    /// Resumes from an explicit snake and food position.
    pub fn from_parts(grid: Grid, snake: Snake, food: Position, seed: u64) -> Self {
        Game { grid, snake, food, rng: StdRng::seed_from_u64(seed) }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    /// Runs one simulation step. `turn` is the heading picked from the keys
    /// sampled for this step, `None` keeps the current one.
    pub fn step(&mut self, turn: Option<Heading>) -> StepOutcome {
        if let Some(heading) = turn {
            self.snake.set_heading(heading);
        }

        let moved = self.snake.advance(&self.grid, self.food);
        if moved.ate() && !self.place_food() {
            // Nowhere left to put food
            self.reset();
            return StepOutcome::Reset;
        }

        if self.snake.collided() {
            self.reset();
            return StepOutcome::Reset;
        }

        match moved {
            MoveResult::Stayed => StepOutcome::Stayed,
            m if m.ate() => StepOutcome::Ate,
            MoveResult::Moved { .. } => StepOutcome::Moved,
        }
    }

    /// Fresh one-cell idle snake at a random cell, then fresh food.
    pub fn reset(&mut self) {
        self.snake = Snake::new(self.grid.random_cell(&mut self.rng));
        // A one-cell snake always leaves a free cell on a grid of two or more
        self.place_food();
    }

    /// Picks a uniformly random cell not covered by the snake, or `None` if
    /// the snake covers the whole grid.
    pub fn spawn_food(&mut self) -> Option<Position> {
        let occupied = self.snake.len();
        let total = self.grid.cell_count();

        if occupied >= total {
            return None;
        }

        if occupied * 2 < total {
            // Sparse board, rejection sampling converges fast
            loop {
                let pos = self.grid.random_cell(&mut self.rng);
                if !self.snake.occupies(pos) {
                    return Some(pos);
                }
            }
        }

        let free: Vec<Position> = self.grid.cells().filter(|pos| !self.snake.occupies(*pos)).collect();
        free.choose(&mut self.rng).copied()
    }

    fn place_food(&mut self) -> bool {
        match self.spawn_food() {
            Some(pos) => {
                log::trace!("food spawned at ({}, {})", pos.x, pos.y);
                self.food = pos;
                true
            }
            None => false,
        }
    }
}
