use super::direction::Direction;
use super::geometry::Cell;
use std::collections::VecDeque;

/// The cells making up the snake.
///
/// The cells are stored head first; no cell appears twice.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    cells: VecDeque<Cell>,
}

impl Snake {
    /// Create a snake of `len` cells with its head at `head`, laid out so
    /// that it has just been travelling in `direction`.
    pub(crate) fn new(head: Cell, direction: Direction, len: usize) -> Snake {
        let tailward = direction.reverse();
        let cells = std::iter::successors(Some(head), |&c| Some(c.step(tailward)))
            .take(len.max(1))
            .collect();
        Snake { cells }
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Cell {
        *self
            .cells
            .front()
            .expect("snake should always have at least one cell")
    }

    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    pub(crate) fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Iterate over the snake's cells, head first
    pub(crate) fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    /// Iterate over the snake's cells other than the head
    pub(crate) fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.iter().skip(1)
    }

    /// Make `cell` the new head.  The tail stays where it is until
    /// [`Snake::drop_tail()`] is called.
    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.cells.push_front(cell);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.cells.len() > 1 {
            self.cells.pop_back();
        }
    }
}

#[cfg(test)]
impl FromIterator<Cell> for Snake {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Snake {
        let snake = Snake {
            cells: iter.into_iter().collect(),
        };
        assert_ne!(snake.len(), 0, "snake must have a head");
        snake
    }
}
