// Game configuration constants
// The play area is a fixed logical canvas; the display scales it to fit.

/// Logical canvas width (pixels)
pub const CANVAS_WIDTH: f32 = 400.0;

/// Logical canvas height (pixels)
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Ball diameter (pixels)
pub const BALL_SIZE: f32 = 30.0;

/// Basket width (pixels)
pub const BASKET_WIDTH: f32 = 100.0;

/// Basket height (pixels)
pub const BASKET_HEIGHT: f32 = 60.0;

/// Basket distance from the bottom edge (pixels)
pub const BASKET_BOTTOM_MARGIN: f32 = 10.0;

/// Basket movement per key press (pixels)
pub const BASKET_MOVE_SPEED: f32 = 12.0;

/// Number of difficulty tiers; tiers cycle 1..=TIER_COUNT
pub const TIER_COUNT: u8 = 5;

/// Entries kept in the persisted leaderboard
pub const MAX_STORED_SCORES: usize = 50;

/// Entries returned to clients
pub const MAX_LISTED_SCORES: usize = 10;
