//! Breadth-first autopilot that steers the snake towards the food
use super::direction::Direction;
use super::geometry::{Cell, Grid};
use super::snake::Snake;
use std::collections::{HashSet, VecDeque};

/// Choose the direction the snake should move in next.
///
/// If `food` can be reached without leaving the grid or crossing the snake,
/// this is the first step of a shortest path to it, with ties broken in
/// [`Direction::ALL`] order.  Otherwise it is the first direction leading to
/// a free cell, or [`Direction::Up`] if the snake is boxed in.
pub(crate) fn next_move(grid: Grid, snake: &Snake, food: Option<Cell>) -> Direction {
    let blocked = snake.iter().collect::<HashSet<_>>();
    let head = snake.head();
    food.and_then(|food| first_step(grid, &blocked, head, food))
        .or_else(|| {
            Direction::ALL.into_iter().find(|&d| {
                let cell = head.step(d);
                grid.contains(cell) && !blocked.contains(&cell)
            })
        })
        .unwrap_or(Direction::Up)
}

fn first_step(grid: Grid, blocked: &HashSet<Cell>, head: Cell, food: Cell) -> Option<Direction> {
    // Each entry carries the first move of the path that reached it; the
    // head itself has none.
    let mut queue = VecDeque::from([(head, None)]);
    let mut visited = HashSet::from([head]);
    while let Some((cell, first)) = queue.pop_front() {
        for d in Direction::ALL {
            let next = cell.step(d);
            let first = first.unwrap_or(d);
            if next == food {
                return Some(first);
            }
            if grid.contains(next) && !blocked.contains(&next) && visited.insert(next) {
                queue.push_back((next, Some(first)));
            }
        }
    }
    None
}
