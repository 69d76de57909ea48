use rand::Rng;

use Heading::*;

/// A cell on the grid. Coordinates are only meaningful modulo the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Heading {
    Idle,
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    /// Unit vector for this heading, `(0, 0)` when idle. `y` grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Idle => (0, 0),
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_idle(self) -> bool {
        matches!(self, Idle)
    }
}

impl Default for Heading {
    fn default() -> Self {
        Idle
    }
}

/// Dimensions of the torus playfield, in cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    /// Both dimensions must be positive; `AppConfig::validate` guarantees it
    /// for grids built from configuration.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "grid must have at least one cell");
        Grid { width: width as i32, height: height as i32 }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    /// Moves `pos` one cell along `heading`, wrapping around every edge.
    pub fn step(&self, pos: Position, heading: Heading) -> Position {
        let (dx, dy) = heading.delta();
        self.wrap(Position::new(pos.x + dx, pos.y + dy))
    }

    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.gen_range(0..self.width), rng.gen_range(0..self.height))
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(self.width as usize * pos.y as usize + pos.x as usize)
        } else {
            None
        }
    }
}
