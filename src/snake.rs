use std::collections::{vec_deque, VecDeque};

use crate::Cell;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    /// Movement applied to the head, as (dx, dy). y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Up | Down => Axis::Vertical,
            Left | Right => Axis::Horizontal,
        }
    }
}

/// True when turning from `d1` to `d2` would be an instant 180° reversal.
pub fn opposite(d1: Direction, d2: Direction) -> bool {
    d1 != d2 && d1.axis() == d2.axis()
}

/// The snake's body, stored tail first; the last cell is the head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    pub direction: Direction,
    pub extend: bool,
}

impl Snake {
    /// Builds a snake from cells ordered tail to head.
    ///
    /// Returns `None` for an empty body, since a snake always has a head.
    pub fn new<I>(cells: I, direction: Direction) -> Option<Self>
    where
        I: IntoIterator<Item = Cell>,
    {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        if body.is_empty() {
            return None;
        }

        Some(Snake { body, direction, extend: false })
    }

    pub fn head(&self) -> Cell {
        // The body is never empty, see `new`
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Cells from tail to head.
    pub fn cells(&self) -> vec_deque::Iter<'_, Cell> {
        self.body.iter()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Moves one step along `direction`.
    ///
    /// The tail is dropped unless `extend` is set, in which case the snake
    /// grows by one and the flag is consumed. Bounds are not checked here.
    pub fn advance(&mut self) {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        self.body.push_back((x + dx, y + dy));

        if self.extend {
            self.extend = false;
        } else {
            self.body.pop_front();
        }
    }

    /// Whether the head sits on any other body cell.
    pub fn bites_itself(&self) -> bool {
        let head = self.head();
        self.body.iter().rev().skip(1).any(|&cell| cell == head)
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}
