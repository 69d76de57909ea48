use crate::grid::{Grid, Heading, Position};
use MoveResult::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Heading was idle, nothing moved.
    Stayed,
    /// `old_tail` is `None` when the snake grew instead of sliding.
    Moved { new_head: Position, old_tail: Option<Position> },
}

impl MoveResult {
    pub fn ate(&self) -> bool {
        matches!(self, Moved { old_tail: None, .. })
    }
}

/// Body segments are stored tail first, the head is the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Position>,
    heading: Heading,
}

impl Snake {
    /// A one-segment snake sitting still at `pos`.
    pub fn new(pos: Position) -> Self {
        Snake { body: vec![pos], heading: Heading::Idle }
    }

    /// Builds a snake from explicit segments, tail first.
    pub fn from_body(body: Vec<Position>, heading: Heading) -> Self {
        assert!(!body.is_empty(), "a snake needs at least a head");
        Snake { body, heading }
    }

    pub fn body(&self) -> &[Position] {
        &self.body
    }

    pub fn head(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Moves the head one cell along the heading. Landing on `food` keeps the
    /// tail, so the snake grows by one segment.
    pub fn advance(&mut self, grid: &Grid, food: Position) -> MoveResult {
        if self.heading.is_idle() {
            return Stayed;
        }

        let new_head = grid.step(self.head(), self.heading);
        self.body.push(new_head);

        if new_head == food {
            Moved { new_head, old_tail: None }
        } else {
            let old_tail = self.body.remove(0);
            Moved { new_head, old_tail: Some(old_tail) }
        }
    }

    /// True when the head overlaps any other segment.
    pub fn collided(&self) -> bool {
        let (head, rest) = match self.body.split_last() {
            Some(parts) => parts,
            None => return false,
        };
        rest.contains(head)
    }
}
