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

/// Number of cells along each side of the board when not configured
pub(crate) const DEFAULT_GRID_SIZE: u16 = 20;

/// Smallest permitted board size
pub(crate) const MIN_GRID_SIZE: u16 = 5;

/// Largest permitted board size; anything bigger will not fit in
/// [`DISPLAY_SIZE`].
pub(crate) const MAX_GRID_SIZE: u16 = 20;

/// Number of terminal columns used to draw a single board cell, so that
/// cells look roughly square
pub(crate) const CELL_WIDTH: u16 = 2;

/// Length of the snake at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: u16 = 3;

/// Points awarded for eating food
pub(crate) const FOOD_POINTS: u32 = 1;

/// Points awarded for eating a power-up
pub(crate) const POWERUP_BONUS: u32 = 5;

/// Probability that eating food spawns a power-up (if none is live)
pub(crate) const POWERUP_CHANCE: f64 = 0.15;

/// Wall-clock lifetime of an uneaten power-up
pub(crate) const POWERUP_DURATION: Duration = Duration::from_millis(3000);

/// Number of random probes made when looking for a free cell before
/// falling back to scanning the whole board
pub(crate) const MAX_SPAWN_ATTEMPTS: usize = 64;

/// The value the resume countdown starts from
pub(crate) const COUNTDOWN_START: u8 = 3;

/// Time between countdown steps
pub(crate) const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Glyph pair for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyph pair for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyph pair for food
pub(crate) const FOOD_SYMBOL: &str = "●●";

/// Glyph pair for the power-up
pub(crate) const POWERUP_SYMBOL: &str = "()";

/// Glyph pair for the snake's head when it's collided with itself or a wall
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for the power-up
pub(crate) const POWERUP_STYLE: Style = Style::new().fg(Color::LightCyan).add_modifier(Modifier::BOLD);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the currently-selected difficulty in the control bar
pub(crate) const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the score bar at the top of the screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the text of overlays drawn on top of the board
pub(crate) const OVERLAY_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);
