use super::direction::Direction;
use std::fmt;

/// A position on the game grid.  Coordinates are signed so that a step off
/// the edge of the board is representable (and then rejected by
/// [`Grid::contains()`]).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Cell {
    pub(crate) const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }

    pub(crate) fn step(self, direction: Direction) -> Cell {
        direction.advance(self)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The dimensions of the game board.
///
/// The top `score_bar_rows` rows of the grid are reserved for the score bar,
/// so the playable cells are those with `0 <= x < width` and
/// `score_bar_rows <= y < height`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) score_bar_rows: u16,
}

impl Grid {
    pub(crate) const fn new(width: u16, height: u16, score_bar_rows: u16) -> Grid {
        Grid {
            width,
            height,
            score_bar_rows,
        }
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x)
            && (i32::from(self.score_bar_rows)..i32::from(self.height)).contains(&cell.y)
    }

    /// Number of rows below the score bar
    pub(crate) fn playable_rows(self) -> u16 {
        self.height.saturating_sub(self.score_bar_rows)
    }

    /// Total number of playable cells
    pub(crate) fn area(self) -> usize {
        usize::from(self.width) * usize::from(self.playable_rows())
    }

    /// The middle of the playable area
    pub(crate) fn center(self) -> Cell {
        Cell::new(
            i32::from(self.width / 2),
            i32::from(self.score_bar_rows + self.playable_rows() / 2),
        )
    }

    /// Iterate over all playable cells in row-major order
    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        let width = i32::from(self.width);
        (i32::from(self.score_bar_rows)..i32::from(self.height))
            .flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const GRID: Grid = Grid::new(10, 8, 2);

    #[rstest]
    #[case(Cell::new(0, 2), true)]
    #[case(Cell::new(9, 7), true)]
    #[case(Cell::new(4, 5), true)]
    #[case(Cell::new(-1, 5), false)]
    #[case(Cell::new(10, 5), false)]
    #[case(Cell::new(4, 1), false)]
    #[case(Cell::new(4, 0), false)]
    #[case(Cell::new(4, 8), false)]
    fn test_contains(#[case] cell: Cell, #[case] inside: bool) {
        assert_eq!(GRID.contains(cell), inside);
    }

    #[test]
    fn cells_are_exactly_the_playable_area() {
        let cells = GRID.cells().collect::<Vec<_>>();
        assert_eq!(cells.len(), GRID.area());
        assert_eq!(cells.len(), 60);
        assert!(cells.iter().all(|&c| GRID.contains(c)));
        assert_eq!(cells.first(), Some(&Cell::new(0, 2)));
        assert_eq!(cells.last(), Some(&Cell::new(9, 7)));
    }

    #[test]
    fn center() {
        assert_eq!(GRID.center(), Cell::new(5, 5));
        assert!(GRID.contains(GRID.center()));
    }
}
