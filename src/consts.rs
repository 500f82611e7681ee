//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Number of grid rows at the top of the board taken up by the score bar
pub(crate) const SCORE_BAR_ROWS: u16 = 2;

/// Snake length at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 2;

/// Snake speed, in cells per second, at a score of zero
pub(crate) const BASE_SPEED: u32 = 10;

/// The snake's speed goes up by one cell per second for every this many
/// points
pub(crate) const POINTS_PER_SPEEDUP: u32 = 5;

/// Lowest speed that the slow power-up can reduce the snake to
pub(crate) const MIN_SLOWED_SPEED: u32 = 5;

/// Number of ticks for which a slow power-up halves the snake's speed
pub(crate) const SLOW_TICKS: u32 = 200;

/// Number of ticks for which a multiplier power-up doubles points from food
pub(crate) const MULTIPLIER_TICKS: u32 = 200;

/// Points lost on eating a penalty item
pub(crate) const PENALTY_POINTS: u32 = 2;

/// How long the "-2 SCORE!" notice stays up after eating a penalty item
pub(crate) const PENALTY_NOTICE: Duration = Duration::from_secs(1);

/// Chance of a slow power-up appearing each time food is eaten
pub(crate) const SLOW_PROBABILITY: f64 = 0.15;

/// Chance of a multiplier power-up appearing each time food is eaten
pub(crate) const MULTIPLIER_PROBABILITY: f64 = 0.1;

/// Chance of a penalty item appearing each time food is eaten
pub(crate) const PENALTY_PROBABILITY: f64 = 0.1;

/// How long an uneaten slow power-up stays on the board
pub(crate) const SLOW_TTL: Duration = Duration::from_secs(20);

/// How long an uneaten multiplier power-up stays on the board
pub(crate) const MULTIPLIER_TTL: Duration = Duration::from_secs(10);

/// Scores below this never make it onto the leaderboard
pub(crate) const MIN_HIGH_SCORE: u32 = 5;

/// Name recorded for a high score when the player doesn't enter one
pub(crate) const ANONYMOUS: &str = "Anonymous";

/// Maximum display width of a name entered for a high score
pub(crate) const NAME_WIDTH: u16 = 20;

/// How long SQLite may wait on a locked database before giving up
pub(crate) const DB_BUSY_TIMEOUT: Duration = Duration::from_millis(250);

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '>';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for food
pub(crate) const FOOD_SYMBOL: char = '●';

/// Glyph for the slow power-up
pub(crate) const SLOW_SYMBOL: char = 'S';

/// Glyph for the score multiplier power-up
pub(crate) const MULTIPLIER_SYMBOL: char = '2';

/// Glyph for the penalty item
pub(crate) const PENALTY_SYMBOL: char = '!';

/// Glyph for the snake's head when it's collided with a wall or itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for the slow power-up and its banner
pub(crate) const SLOW_STYLE: Style = Style::new().fg(Color::LightBlue).add_modifier(Modifier::BOLD);

/// Style for the score multiplier power-up and its banner
pub(crate) const MULTIPLIER_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);

/// Style for the penalty item and its notice
pub(crate) const PENALTY_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD);

/// Style for the autopilot banner
pub(crate) const AUTOPILOT_STYLE: Style = Style::new().fg(Color::Cyan);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for headings on the high score screens
pub(crate) const TITLE_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);
