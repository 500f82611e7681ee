mod autopilot;
mod cheat;
mod direction;
mod geometry;
mod paused;
mod snake;
mod spawner;
mod state;
use self::cheat::{CheatBuffer, CheatProgress};
use self::direction::Direction;
use self::geometry::{Cell, Grid};
use self::paused::{PauseOpt, Paused};
use self::state::{ConsumableKind, GameState, Phase, TickEvent};
use crate::app::Transition;
use crate::command::Command;
use crate::config::GameConfig;
use crate::consts;
use crate::util::{center_rect, get_display_area};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
    Frame,
};
use std::time::Instant;

/// The game screen: a [`GameState`] plus everything needed to drive it from
/// the terminal and draw it
#[derive(Clone, Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    state: GameState<R>,
    /// The pause menu, shown while the game is paused
    menu: Paused,
    cheat: Option<CheatBuffer>,
    /// Best score in the score store when the game started
    high_score: u32,
    next_tick: Option<Instant>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(config: &GameConfig, high_score: u32) -> Self {
        Game::new_with_rng(config, high_score, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(config: &GameConfig, high_score: u32, rng: R) -> Game<R> {
        let grid = Grid::new(config.width, config.height, consts::SCORE_BAR_ROWS);
        let mut state = GameState::new(grid, rng);
        state.set_autopilot(config.autopilot);
        tracing::info!(
            width = grid.width,
            height = grid.height,
            autopilot = config.autopilot,
            high_score,
            "Starting new game"
        );
        Game {
            state,
            menu: Paused::new(),
            cheat: config.cheats.then(|| CheatBuffer::new(&config.cheat_code)),
            high_score,
            next_tick: None,
        }
    }

    pub(crate) fn process_input(&mut self) -> std::io::Result<Option<Transition>> {
        if self.state.running() {
            if self.next_tick.is_none() {
                self.next_tick = Some(Instant::now() + self.state.tick_period());
            }
            let when = self.next_tick.expect("next_tick should be Some");
            let wait = when.saturating_duration_since(Instant::now());
            if wait.is_zero() || !poll(wait)? {
                self.advance();
                self.next_tick = None;
                Ok(None)
            } else {
                Ok(self.handle_event(read()?))
            }
        } else {
            Ok(self.handle_event(read()?))
        }
    }

    fn advance(&mut self) {
        match self.state.tick() {
            TickEvent::Idle | TickEvent::Moved => (),
            TickEvent::Ate => tracing::debug!(
                score = self.state.score(),
                length = self.state.snake().len(),
                "Snake ate food"
            ),
            TickEvent::Crashed => tracing::info!(
                score = self.state.score(),
                length = self.state.snake().len(),
                speed = self.state.speed(),
                "Game over"
            ),
            TickEvent::BoardFull => tracing::info!(
                score = self.state.score(),
                length = self.state.snake().len(),
                "Snake filled the board"
            ),
        }
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }

    pub(crate) fn handle_event(&mut self, event: Event) -> Option<Transition> {
        match self.state.phase() {
            Phase::Running => {
                if event == Event::FocusLost {
                    self.pause();
                    return None;
                }
                let key = event.as_key_press_event()?;
                if self.feed_cheat(key) {
                    return None;
                }
                match Command::from_key_event(key)? {
                    Command::Quit => return Some(Transition::Quit),
                    Command::Up => self.state.turn(Direction::Up),
                    Command::Down => self.state.turn(Direction::Down),
                    Command::Left => self.state.turn(Direction::Left),
                    Command::Right => self.state.turn(Direction::Right),
                    Command::Esc | Command::P => self.pause(),
                    _ => (),
                }
            }
            Phase::Paused => match self.menu.handle_event(event)? {
                PauseOpt::Resume => {
                    self.state.resume();
                    self.next_tick = None;
                }
                PauseOpt::Restart => return Some(Transition::Restart),
                PauseOpt::Quit => return Some(Transition::Quit),
            },
            Phase::GameOver | Phase::BoardFull => {
                match Command::from_key_event(event.as_key_press_event()?)? {
                    Command::Enter => return Some(Transition::GameOver(self.state.score())),
                    Command::Quit | Command::Q => return Some(Transition::Quit),
                    _ => (),
                }
            }
        }
        None
    }

    fn pause(&mut self) {
        self.state.pause();
        self.menu = Paused::new();
    }

    /// Pass a typed character to the cheat buffer, if any.  Returns `true`
    /// if the key belongs to the cheat code and must not also act as a
    /// command.
    fn feed_cheat(&mut self, key: KeyEvent) -> bool {
        let Some(cheat) = self.cheat.as_mut() else {
            return false;
        };
        let KeyCode::Char(ch) = key.code else {
            return false;
        };
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return false;
        }
        let progress = cheat.push(ch);
        if progress == CheatProgress::Complete {
            let on = self.state.toggle_autopilot();
            tracing::info!(autopilot = on, "Cheat code entered");
        }
        progress.consumed()
    }

    fn banners(&self) -> Line<'static> {
        let mut banners = Vec::new();
        if self.state.slowed() {
            banners.push(Span::styled("SLOWED!", consts::SLOW_STYLE));
        }
        if self.state.multiplied() {
            banners.push(Span::styled("2x SCORE!", consts::MULTIPLIER_STYLE));
        }
        if self.state.penalty_notice() {
            banners.push(Span::styled("-2 SCORE!", consts::PENALTY_STYLE));
        }
        if self.state.autopilot() {
            banners.push(Span::styled("AUTOPILOT", consts::AUTOPILOT_STYLE));
        }
        let mut line = Line::default();
        for b in banners {
            line.push_span(if line.spans.is_empty() { " " } else { "  " });
            line.push_span(b);
        }
        line
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, banner_area, block_area, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        Line::styled(
            format!(" Score: {}", self.state.score()),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);
        Line::from(format!("High Score: {} ", self.high_score))
            .right_aligned()
            .render(score_area, buf);
        self.banners().render(banner_area, buf);

        let grid = self.state.grid();
        let block_size = Size {
            width: grid.width.saturating_add(2),
            height: grid.playable_rows().saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let mut board = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            top_row: grid.score_bar_rows,
            buf,
        };
        for cell in self.state.snake().body() {
            board.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        for (kind, cell) in self.state.consumables() {
            let (symbol, style) = match kind {
                ConsumableKind::Food => (consts::FOOD_SYMBOL, consts::FOOD_STYLE),
                ConsumableKind::Slow => (consts::SLOW_SYMBOL, consts::SLOW_STYLE),
                ConsumableKind::Multiplier => (consts::MULTIPLIER_SYMBOL, consts::MULTIPLIER_STYLE),
                ConsumableKind::Penalty => (consts::PENALTY_SYMBOL, consts::PENALTY_STYLE),
            };
            board.draw_cell(cell, symbol, style);
        }
        // Draw the head last so that a collision covers whatever the snake
        // ran into
        let head = self.state.snake().head();
        if self.state.phase() == Phase::GameOver {
            board.draw_cell(head, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
        } else {
            board.draw_cell(head, self.state.heading().head_symbol(), consts::SNAKE_STYLE);
        }

        match self.state.phase() {
            Phase::Running => (),
            Phase::Paused => {
                let pause_area = center_rect(
                    display,
                    Size {
                        width: Paused::WIDTH,
                        height: Paused::HEIGHT,
                    },
                );
                self.menu.render(pause_area, buf);
            }
            Phase::GameOver | Phase::BoardFull => {
                let title = if self.state.phase() == Phase::BoardFull {
                    " BOARD FULL!"
                } else {
                    " GAME OVER"
                };
                Span::from(title).render(msg1_area, buf);
                Line::from_iter([
                    Span::raw(" Continue ("),
                    Span::styled("Enter", consts::KEY_STYLE),
                    Span::raw(") — Quit ("),
                    Span::styled("q", consts::KEY_STYLE),
                    Span::raw(")"),
                ])
                .render(msg2_area, buf);
            }
        }
    }
}

/// Draws grid cells into the inside of the board's border
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    /// The grid row drawn on the first line of `area`
    top_row: u16,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let Ok(x) = u16::try_from(cell.x) else {
            return;
        };
        let Some(y) = u16::try_from(cell.y)
            .ok()
            .and_then(|y| y.checked_sub(self.top_row))
        else {
            return;
        };
        let Some(x) = self.area.x.checked_add(x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(y) else {
            return;
        };
        if let Some(bc) = self.buf.cell_mut((x, y)) {
            bc.set_char(symbol);
            bc.set_style(Style::reset().patch(style));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn new_game(config: &GameConfig, high_score: u32) -> Game<ChaCha12Rng> {
        let mut game =
            Game::new_with_rng(config, high_score, ChaCha12Rng::seed_from_u64(RNG_SEED));
        // Keep the food out of the way of the snake
        game.state.put(ConsumableKind::Food, Cell::new(0, 19));
        game
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(code.into())
    }

    fn render(game: &Game<ChaCha12Rng>) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        buffer
    }

    #[test]
    fn new_game_screen() {
        let game = new_game(&GameConfig::default(), 7);
        let mut expected = Buffer::with_lines([
            " Score: 0                                                         High Score: 7 ",
            "",
            "                   ┌────────────────────────────────────────┐                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                   ⚬>                   │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │●                                       │                   ",
            "                   └────────────────────────────────────────┘                   ",
            "",
            "",
        ]);
        expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(39, 12, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(40, 12, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(20, 20, 1, 1), consts::FOOD_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn banners() {
        let mut game = new_game(&GameConfig::default(), 0);
        game.state.put(ConsumableKind::Slow, Cell::new(21, 11));
        game.state.put(ConsumableKind::Multiplier, Cell::new(22, 11));
        game.state.put(ConsumableKind::Penalty, Cell::new(23, 11));
        for _ in 0..3 {
            game.advance();
        }
        game.state.set_autopilot(true);
        let mut expected = Buffer::with_lines([
            " Score: 0                                                         High Score: 0 ",
            " SLOWED!  2x SCORE!  -2 SCORE!  AUTOPILOT",
            "                   ┌────────────────────────────────────────┐                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                      ⚬>                │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │●                                       │                   ",
            "                   └────────────────────────────────────────┘                   ",
            "",
            "",
        ]);
        expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(1, 1, 7, 1), consts::SLOW_STYLE);
        expected.set_style(Rect::new(10, 1, 9, 1), consts::MULTIPLIER_STYLE);
        expected.set_style(Rect::new(21, 1, 9, 1), consts::PENALTY_STYLE);
        expected.set_style(Rect::new(32, 1, 9, 1), consts::AUTOPILOT_STYLE);
        expected.set_style(Rect::new(42, 12, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(43, 12, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(20, 20, 1, 1), consts::FOOD_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
    }

    #[test]
    fn crash_into_score_bar() {
        let mut game = new_game(&GameConfig::default(), 12);
        assert_eq!(game.handle_event(key(KeyCode::Up)), None);
        for _ in 0..10 {
            game.advance();
        }
        assert_eq!(game.state.phase(), Phase::GameOver);
        let mut expected = Buffer::with_lines([
            " Score: 0                                                        High Score: 12 ",
            "",
            "                   ┌────────────────────────────────────────┐                   ",
            "                   │                    ×                   │                   ",
            "                   │                    ⚬                   │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │                                        │                   ",
            "                   │●                                       │                   ",
            "                   └────────────────────────────────────────┘                   ",
            " GAME OVER",
            " Continue (Enter) — Quit (q)",
        ]);
        expected.set_style(Rect::new(0, 0, 80, 1), consts::SCORE_BAR_STYLE);
        expected.set_style(Rect::new(40, 3, 1, 1), consts::COLLISION_STYLE);
        expected.set_style(Rect::new(40, 4, 1, 1), consts::SNAKE_STYLE);
        expected.set_style(Rect::new(20, 20, 1, 1), consts::FOOD_STYLE);
        expected.set_style(Rect::new(11, 23, 5, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(26, 23, 1, 1), consts::KEY_STYLE);
        pretty_assertions::assert_eq!(render(&game), expected);
        assert_eq!(
            game.handle_event(key(KeyCode::Up)),
            None,
            "movement after game over should be ignored"
        );
        assert_eq!(
            game.handle_event(key(KeyCode::Enter)),
            Some(Transition::GameOver(0))
        );
    }

    #[test]
    fn turning() {
        let mut game = new_game(&GameConfig::default(), 0);
        assert_eq!(game.handle_event(key(KeyCode::Char('w'))), None);
        assert_eq!(game.state.direction(), Direction::Up);
        assert_eq!(game.handle_event(key(KeyCode::Left)), None);
        assert_eq!(game.state.direction(), Direction::Left, "latest request wins");
        assert_eq!(game.handle_event(key(KeyCode::Right)), None);
        assert_eq!(
            game.state.direction(),
            Direction::Left,
            "reversing the last move should be ignored"
        );
    }

    #[test]
    fn pause_and_resume() {
        let mut game = new_game(&GameConfig::default(), 0);
        assert_eq!(game.handle_event(key(KeyCode::Char('p'))), None);
        assert_eq!(game.state.phase(), Phase::Paused);
        let before = game.state.snake().head();
        game.advance();
        assert_eq!(game.state.snake().head(), before);
        assert_eq!(game.handle_event(key(KeyCode::Up)), None);
        assert_eq!(game.handle_event(key(KeyCode::Char('p'))), None);
        assert_eq!(game.state.phase(), Phase::Running);
        assert_eq!(
            game.state.direction(),
            Direction::Right,
            "keys in the pause menu should not steer"
        );
    }

    #[test]
    fn focus_lost_pauses() {
        let mut game = new_game(&GameConfig::default(), 0);
        assert_eq!(game.handle_event(Event::FocusLost), None);
        assert_eq!(game.state.phase(), Phase::Paused);
    }

    #[test]
    fn pause_menu_choices() {
        let mut game = new_game(&GameConfig::default(), 0);
        assert_eq!(game.handle_event(key(KeyCode::Esc)), None);
        assert_eq!(
            game.handle_event(key(KeyCode::Char('r'))),
            Some(Transition::Restart)
        );
        let mut game = new_game(&GameConfig::default(), 0);
        assert_eq!(game.handle_event(key(KeyCode::Esc)), None);
        assert_eq!(game.handle_event(key(KeyCode::End)), None);
        assert_eq!(
            game.handle_event(key(KeyCode::Enter)),
            Some(Transition::Quit)
        );
    }

    #[test]
    fn ctrl_c_quits() {
        let mut game = new_game(&GameConfig::default(), 0);
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(game.handle_event(ev), Some(Transition::Quit));
    }

    #[test]
    fn cheat_code_toggles_autopilot() {
        let config = GameConfig {
            cheats: true,
            ..GameConfig::default()
        };
        let mut game = new_game(&config, 0);
        for ch in "solly".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
        }
        assert!(game.state.autopilot());
        for ch in "solly".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
        }
        assert!(!game.state.autopilot());
    }

    #[test]
    fn cheat_code_does_not_steer() {
        let config = GameConfig {
            cheats: true,
            ..GameConfig::default()
        };
        let mut game = new_game(&config, 0);
        assert_eq!(game.handle_event(key(KeyCode::Up)), None);
        for ch in "solly".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
            assert_eq!(game.state.direction(), Direction::Up, "after {ch:?}");
        }
        assert!(game.state.autopilot());
        for ch in "solly".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
        }
        assert!(!game.state.autopilot());
        assert_eq!(game.state.direction(), Direction::Up);
        assert_eq!(game.handle_event(key(KeyCode::Char('j'))), None);
        assert_eq!(
            game.state.direction(),
            Direction::Down,
            "letters outside the code still steer"
        );
    }

    #[test]
    fn cheat_code_does_not_pause_or_quit() {
        let config = GameConfig {
            cheats: true,
            cheat_code: String::from("zapq"),
            ..GameConfig::default()
        };
        let mut game = new_game(&config, 0);
        for ch in "zapq".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
            assert_eq!(game.state.phase(), Phase::Running);
        }
        assert!(game.state.autopilot());
        assert_eq!(game.handle_event(key(KeyCode::Char('p'))), None);
        assert_eq!(game.state.phase(), Phase::Paused);
    }

    #[test]
    fn cheats_disabled() {
        let mut game = new_game(&GameConfig::default(), 0);
        for ch in "solly".chars() {
            assert_eq!(game.handle_event(key(KeyCode::Char(ch))), None);
        }
        assert!(!game.state.autopilot());
    }

    #[test]
    fn autopilot_from_config() {
        let config = GameConfig {
            autopilot: true,
            ..GameConfig::default()
        };
        let game = new_game(&config, 0);
        assert!(game.state.autopilot());
    }
}
