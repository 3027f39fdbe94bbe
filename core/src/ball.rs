use rand::Rng;

use crate::collision::Rect;
use crate::constants::{BALL_SIZE, TIER_COUNT};

/// Difficulty tier selecting a ball's fall speed and point value.
///
/// Valid tiers are 1..=5. Any other value is treated as an unknown tier and
/// falls back to tier-1 speed and points, so a corrupted or future tier never
/// breaks the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tier(u8);

impl Tier {
    pub const FIRST: Tier = Tier(1);

    pub fn new(level: u8) -> Self {
        Tier(level)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Next tier in the 1 → 5 → 1 cycle
    pub fn next(self) -> Self {
        Tier((self.0 % TIER_COUNT) + 1)
    }

    /// Fall speed in pixels per frame
    pub fn speed(self) -> f32 {
        match self.0 {
            1 => 3.0,
            2 => 4.0,
            3 => 5.0,
            4 => 6.0,
            5 => 7.0,
            _ => 3.0,
        }
    }

    /// Points awarded for catching a ball of this tier
    pub fn points(self) -> u32 {
        match self.0 {
            1 => 1,
            2 => 3,
            3 => 5,
            4 => 7,
            5 => 10,
            _ => 1,
        }
    }

    /// Solid colour used when the ball sprite is not available
    pub fn color(self) -> &'static str {
        match self.0 {
            1 => "#00b5ff",
            2 => "#4CAF50",
            3 => "#ff07b5",
            4 => "#ff0000",
            5 => "#000000",
            _ => "#4CAF50",
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::FIRST
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The falling object
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub tier: Tier,
    pub caught: bool,
    pub missed: bool,
}

impl Ball {
    /// Place a new ball at a random column just above the visible area.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, canvas_width: f32, tier: Tier) -> Self {
        let max_x = (canvas_width - BALL_SIZE).max(0.0);
        let x = if max_x > 0.0 { rng.gen_range(0.0..=max_x) } else { 0.0 };
        Self::at(x, tier)
    }

    /// Ball at a fixed column, starting above the visible area
    pub fn at(x: f32, tier: Tier) -> Self {
        Self {
            x,
            y: -BALL_SIZE,
            speed: tier.speed(),
            tier,
            caught: false,
            missed: false,
        }
    }

    /// Move down one frame. Returns true once the ball has left the play area
    /// without being caught; stays true on every later call.
    pub fn advance(&mut self, canvas_height: f32) -> bool {
        self.y += self.speed;
        if self.y > canvas_height && !self.caught {
            self.missed = true;
        }
        self.missed
    }

    pub fn point_value(&self) -> u32 {
        self.tier.points()
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, BALL_SIZE, BALL_SIZE)
    }
}
