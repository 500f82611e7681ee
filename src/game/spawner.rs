use super::geometry::{Cell, Grid};
use super::snake::Snake;
use rand::{seq::IteratorRandom, Rng};
use std::collections::HashSet;

/// Pick a uniformly random playable cell that is neither part of `snake` nor
/// a member of `excluded`.  Returns `None` if there is no such cell.
pub(crate) fn spawn<R: Rng + ?Sized>(
    grid: Grid,
    snake: &Snake,
    excluded: &HashSet<Cell>,
    rng: &mut R,
) -> Option<Cell> {
    let occupied = snake.iter().collect::<HashSet<_>>();
    grid.cells()
        .filter(|c| !occupied.contains(c) && !excluded.contains(c))
        .choose(rng)
}
