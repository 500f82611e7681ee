use super::autopilot;
use super::direction::Direction;
use super::geometry::{Cell, Grid};
use super::snake::Snake;
use super::spawner;
use crate::consts;
use enum_map::{Enum, EnumMap};
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;

/// The kinds of items that can appear on the board for the snake to eat
#[derive(Clone, Copy, Debug, Enum, Eq, Hash, PartialEq)]
pub(crate) enum ConsumableKind {
    /// Grows the snake and scores points
    Food,
    /// Halves the snake's speed for a while
    Slow,
    /// Doubles the points scored from food for a while
    Multiplier,
    /// Takes points away
    Penalty,
}

impl ConsumableKind {
    const POWER_UPS: [ConsumableKind; 3] = [
        ConsumableKind::Slow,
        ConsumableKind::Multiplier,
        ConsumableKind::Penalty,
    ];

    /// Chance of the item appearing when food is eaten
    fn spawn_probability(self) -> f64 {
        match self {
            ConsumableKind::Food => 1.0,
            ConsumableKind::Slow => consts::SLOW_PROBABILITY,
            ConsumableKind::Multiplier => consts::MULTIPLIER_PROBABILITY,
            ConsumableKind::Penalty => consts::PENALTY_PROBABILITY,
        }
    }

    /// How long the item stays on the board if not eaten
    fn ttl(self) -> Option<Duration> {
        match self {
            ConsumableKind::Slow => Some(consts::SLOW_TTL),
            ConsumableKind::Multiplier => Some(consts::MULTIPLIER_TTL),
            ConsumableKind::Food | ConsumableKind::Penalty => None,
        }
    }
}

/// An item on the board
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Consumable {
    pub(crate) cell: Cell,
    /// Game clock reading when the item appeared
    pub(crate) spawned_at: Duration,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    Running,
    Paused,
    /// The snake hit a wall or itself
    GameOver,
    /// The snake has filled the board and there are no more spaces to place
    /// food in.
    BoardFull,
}

/// What happened during a call to [`GameState::tick()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum TickEvent {
    /// The game is not running, so nothing happened
    Idle,
    Moved,
    Ate,
    Crashed,
    BoardFull,
}

/// The simulation: everything about a game in progress except how it's
/// drawn and where the input comes from
#[derive(Clone, Debug)]
pub(crate) struct GameState<R = rand::rngs::ThreadRng> {
    rng: R,
    grid: Grid,
    snake: Snake,
    /// The direction the snake moved in on the last tick
    heading: Direction,
    /// The direction requested by the player for the next tick
    pending: Option<Direction>,
    items: EnumMap<ConsumableKind, Option<Consumable>>,
    /// Remaining ticks of the slow effect
    slow_ticks: u32,
    /// Remaining ticks of the score multiplier
    multiplier_ticks: u32,
    penalty_notice_until: Option<Duration>,
    /// Total simulated time spent running
    clock: Duration,
    /// Cells per second, as computed on the last tick
    speed: u32,
    score: u32,
    autopilot: bool,
    phase: Phase,
}

impl<R: Rng> GameState<R> {
    pub(crate) fn new(grid: Grid, rng: R) -> GameState<R> {
        let snake = Snake::new(
            grid.center(),
            Direction::Right,
            consts::INITIAL_SNAKE_LENGTH,
        );
        let mut state = GameState {
            rng,
            grid,
            snake,
            heading: Direction::Right,
            pending: None,
            items: EnumMap::default(),
            slow_ticks: 0,
            multiplier_ticks: 0,
            penalty_notice_until: None,
            clock: Duration::ZERO,
            speed: consts::BASE_SPEED,
            score: 0,
            autopilot: false,
            phase: Phase::Running,
        };
        if !state.place(ConsumableKind::Food) {
            state.phase = Phase::BoardFull;
        }
        state
    }

    /// Advance the game by one step
    pub(crate) fn tick(&mut self) -> TickEvent {
        if self.phase != Phase::Running {
            return TickEvent::Idle;
        }
        self.speed = consts::BASE_SPEED + self.score / consts::POINTS_PER_SPEEDUP;
        if self.slow_ticks > 0 {
            self.speed = (self.speed / 2).max(consts::MIN_SLOWED_SPEED);
            self.slow_ticks -= 1;
        }
        let period = self.tick_period();
        self.clock += period;
        self.multiplier_ticks = self.multiplier_ticks.saturating_sub(1);

        if self.autopilot {
            self.pending = Some(autopilot::next_move(
                self.grid,
                &self.snake,
                self.food(),
            ));
        }
        let direction = self.pending.take().unwrap_or(self.heading);
        let head = self.snake.head().step(direction);
        if !self.grid.contains(head) || self.snake.contains(head) {
            self.phase = Phase::GameOver;
            return TickEvent::Crashed;
        }
        self.heading = direction;
        self.snake.push_head(head);

        let mut event = TickEvent::Moved;
        if self.take(ConsumableKind::Food, head) {
            self.score += if self.multiplier_ticks > 0 { 2 } else { 1 };
            if self.place(ConsumableKind::Food) {
                event = TickEvent::Ate;
            } else {
                self.phase = Phase::BoardFull;
                event = TickEvent::BoardFull;
            }
            for kind in ConsumableKind::POWER_UPS {
                if self.items[kind].is_none() && self.rng.random_bool(kind.spawn_probability()) {
                    self.place(kind);
                }
            }
        } else {
            self.snake.drop_tail();
        }

        if self.take(ConsumableKind::Slow, head) {
            self.slow_ticks = consts::SLOW_TICKS;
        }
        if self.take(ConsumableKind::Multiplier, head) {
            self.multiplier_ticks = consts::MULTIPLIER_TICKS;
        }
        if self.take(ConsumableKind::Penalty, head) {
            self.score = self.score.saturating_sub(consts::PENALTY_POINTS);
            self.penalty_notice_until = Some(self.clock + consts::PENALTY_NOTICE);
        }
        self.expire();
        event
    }

    /// Put an item of the given kind on a random free cell.  Returns `false`
    /// if there was no room.
    fn place(&mut self, kind: ConsumableKind) -> bool {
        let excluded = self
            .items
            .iter()
            .filter(|&(k, _)| k != kind)
            .filter_map(|(_, item)| item.as_ref().map(|c| c.cell))
            .collect::<HashSet<_>>();
        match spawner::spawn(self.grid, &self.snake, &excluded, &mut self.rng) {
            Some(cell) => {
                tracing::debug!(?kind, %cell, "Placed item on board");
                self.items[kind] = Some(Consumable {
                    cell,
                    spawned_at: self.clock,
                });
                true
            }
            None => {
                tracing::debug!(?kind, "No room on board for item");
                false
            }
        }
    }
}

impl<R> GameState<R> {
    /// Ask for the snake to move in `direction` on the next tick.  Requests
    /// to reverse straight back into the snake's neck are ignored.
    pub(crate) fn turn(&mut self, direction: Direction) {
        if direction != self.heading.reverse() {
            self.pending = Some(direction);
        }
    }

    /// The direction the snake will move in on the next tick, barring
    /// autopilot
    #[cfg(test)]
    pub(crate) fn direction(&self) -> Direction {
        self.pending.unwrap_or(self.heading)
    }

    /// The direction the snake moved in on the last tick
    pub(crate) fn heading(&self) -> Direction {
        self.heading
    }

    pub(crate) fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Turn autopilot on or off, returning the new setting
    pub(crate) fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        self.autopilot
    }

    pub(crate) fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    /// Time between this tick and the next at the current speed
    pub(crate) fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.speed.max(1)
    }

    pub(crate) fn grid(&self) -> Grid {
        self.grid
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn speed(&self) -> u32 {
        self.speed
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub(crate) fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Is the slow power-up in effect?
    pub(crate) fn slowed(&self) -> bool {
        self.slow_ticks > 0
    }

    /// Is the score multiplier in effect?
    pub(crate) fn multiplied(&self) -> bool {
        self.multiplier_ticks > 0
    }

    /// Should the penalty notice be shown?
    pub(crate) fn penalty_notice(&self) -> bool {
        self.penalty_notice_until
            .is_some_and(|until| self.clock < until)
    }

    pub(crate) fn food(&self) -> Option<Cell> {
        self.items[ConsumableKind::Food].map(|c| c.cell)
    }

    /// Iterate over the items currently on the board
    pub(crate) fn consumables(&self) -> impl Iterator<Item = (ConsumableKind, Cell)> + '_ {
        self.items
            .iter()
            .filter_map(|(kind, item)| item.as_ref().map(|c| (kind, c.cell)))
    }

    /// Put an item at a known location, replacing any other item of the same
    /// kind
    #[cfg(test)]
    pub(crate) fn put(&mut self, kind: ConsumableKind, cell: Cell) {
        self.items[kind] = Some(Consumable {
            cell,
            spawned_at: self.clock,
        });
    }

    /// If there is an item of the given kind at `cell`, remove it and return
    /// `true`.
    fn take(&mut self, kind: ConsumableKind, cell: Cell) -> bool {
        if self.items[kind].is_some_and(|c| c.cell == cell) {
            self.items[kind] = None;
            true
        } else {
            false
        }
    }

    /// Remove power-ups that have outstayed their time-to-live
    fn expire(&mut self) {
        let now = self.clock;
        for (kind, slot) in &mut self.items {
            if let (Some(ttl), Some(item)) = (kind.ttl(), *slot) {
                if now.saturating_sub(item.spawned_at) > ttl {
                    tracing::debug!(?kind, cell = %item.cell, "Item expired");
                    *slot = None;
                }
            }
        }
    }
}
