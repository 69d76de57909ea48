use crate::game::Game;
use crate::grid::{Grid, Position};

/// One drawn picture of the grid: which cells are filled squares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    grid: Grid,
    cells: Vec<bool>,
}

impl Frame {
    pub fn new(grid: Grid) -> Self {
        Frame { grid, cells: vec![false; grid.cell_count()] }
    }

    /// Draw pass: every body cell and the food cell, all alike.
    pub fn draw(game: &Game) -> Self {
        let mut frame = Frame::new(*game.grid());
        for pos in game.snake().body() {
            frame.fill(*pos);
        }
        frame.fill(game.food());
        frame
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells outside the grid are ignored.
    pub fn fill(&mut self, pos: Position) {
        if let Some(i) = self.grid.index_of(pos) {
            self.cells[i] = true;
        }
    }

    pub fn is_filled(&self, pos: Position) -> bool {
        self.grid.index_of(pos).map_or(false, |i| self.cells[i])
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Cells whose state differs from `prev`, with their new state. A frame
    /// for another grid size counts as entirely different.
    pub fn changes_since<'a>(&'a self, prev: Option<&'a Frame>) -> impl Iterator<Item = (Position, bool)> + 'a {
        let prev = prev.filter(|p| p.grid == self.grid);
        self.grid.cells().zip(self.cells.iter().copied()).enumerate().filter_map(move |(i, (pos, filled))| {
            match prev {
                Some(p) if p.cells[i] == filled => None,
                // With nothing to diff against, only filled cells need drawing
                None if !filled => None,
                _ => Some((pos, filled)),
            }
        })
    }
}
