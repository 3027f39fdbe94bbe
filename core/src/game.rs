//! Game session state machine
//!
//! Active ⇄ Paused on pause toggle, Active → GameOver on a missed ball,
//! GameOver (or Active) → Active on restart. Restart is refused while paused.
//! Nothing advances while paused or after game over.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ball::{Ball, Tier};
use crate::basket::Basket;
use crate::collision::overlaps;
use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::input::Input;
use crate::prefs::{KeyValueStorage, LocalPrefs};
use crate::scene::{Asset, AssetStatus, Drawable, Overlay, Scene};
use crate::SubmitScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Paused,
    GameOver,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused or game over; nothing simulated
    Idle,
    Spawned { tier: Tier },
    Caught { points: u32, new_high_score: bool },
    Falling,
    /// The ball left the play area; emitted once per round. `new_record` is
    /// set when the final score beats the best score held when the round began.
    Missed { final_score: u32, new_record: bool },
}

pub struct Game<S: KeyValueStorage> {
    width: f32,
    height: f32,
    scale: f32,
    basket: Basket,
    ball: Option<Ball>,
    score: u32,
    high_score: u32,
    // Best score when the current round began
    round_start_high: u32,
    next_tier: Tier,
    phase: Phase,
    last_drag_x: Option<f32>,
    prefs: LocalPrefs<S>,
    assets: AssetStatus,
    rng: StdRng,
}

impl<S: KeyValueStorage> Game<S> {
    pub fn new(prefs: LocalPrefs<S>) -> Self {
        Self::with_rng(prefs, StdRng::from_entropy())
    }

    /// Deterministic ball placement, for replays and tests
    pub fn with_seed(prefs: LocalPrefs<S>, seed: u64) -> Self {
        Self::with_rng(prefs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(prefs: LocalPrefs<S>, rng: StdRng) -> Self {
        let high_score = prefs.high_score();
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            scale: 1.0,
            basket: Basket::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            ball: None,
            score: 0,
            high_score,
            round_start_high: high_score,
            next_tier: Tier::FIRST,
            phase: Phase::Active,
            last_drag_x: None,
            prefs,
            assets: AssetStatus::default(),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Whether the finished round set a new device record
    pub fn new_record(&self) -> bool {
        self.phase == Phase::GameOver && self.score > self.round_start_high
    }

    /// Tier the next spawned ball will have
    pub fn next_tier(&self) -> Tier {
        self.next_tier
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    pub fn prefs(&self) -> &LocalPrefs<S> {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut LocalPrefs<S> {
        &mut self.prefs
    }

    pub fn assets_mut(&mut self) -> &mut AssetStatus {
        &mut self.assets
    }

    /// Display pixels per logical pixel
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The canvas keeps its logical size; only the display scale changes.
    pub fn resize(&mut self, scale: f32) {
        if scale > 0.0 {
            self.scale = scale;
        }
        self.basket.reanchor(self.width, self.height);
    }

    /// Advance the simulation by one frame.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Active {
            return TickOutcome::Idle;
        }

        let Some(ball) = self.ball.as_mut() else {
            let tier = self.spawn_next();
            return TickOutcome::Spawned { tier };
        };

        if overlaps(&ball.rect(), &self.basket.rect()) {
            ball.caught = true;
            let points = ball.point_value();
            self.ball = None;
            self.score += points;

            let new_high_score = self.score > self.high_score;
            if new_high_score {
                self.high_score = self.score;
                self.prefs.set_high_score(self.high_score);
            }
            return TickOutcome::Caught {
                points,
                new_high_score,
            };
        }

        if ball.advance(self.height) {
            self.phase = Phase::GameOver;
            let new_record = self.new_record();
            tracing::info!(
                "Game over with score {}{}",
                self.score,
                if new_record { " (new record)" } else { "" }
            );
            return TickOutcome::Missed {
                final_score: self.score,
                new_record,
            };
        }

        TickOutcome::Falling
    }

    /// Apply one input event. Returns false when the input was ignored in
    /// the current phase.
    pub fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::MoveLeft if self.phase == Phase::Active => {
                self.basket.step_left(self.width);
                true
            }
            Input::MoveRight if self.phase == Phase::Active => {
                self.basket.step_right(self.width);
                true
            }
            Input::MoveLeft | Input::MoveRight => false,
            Input::TogglePause => self.toggle_pause(),
            Input::Restart => {
                if self.phase == Phase::Paused {
                    return false;
                }
                self.restart();
                true
            }
            Input::DragStart { x } => {
                self.last_drag_x = Some(x);
                true
            }
            Input::DragMove { x } => {
                let last = self.last_drag_x.replace(x);
                match last {
                    Some(last) if self.phase == Phase::Active => {
                        self.basket.drag_by(x - last, self.width);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Active => {
                self.phase = Phase::Paused;
                true
            }
            Phase::Paused => {
                self.phase = Phase::Active;
                true
            }
            Phase::GameOver => false,
        }
    }

    /// Start a new round. The persisted high score is kept.
    pub fn restart(&mut self) {
        tracing::debug!("Restarting (previous score {})", self.score);
        self.score = 0;
        self.round_start_high = self.high_score;
        self.ball = None;
        self.next_tier = Tier::FIRST;
        self.phase = Phase::Active;
        self.spawn_next();
    }

    fn spawn_next(&mut self) -> Tier {
        let tier = self.next_tier;
        self.ball = Some(Ball::spawn(&mut self.rng, self.width, tier));
        self.next_tier = tier.next();
        tier
    }

    /// Request body offering the final score, once the round is over
    pub fn submission(&self, name: &str) -> Option<SubmitScore> {
        (self.phase == Phase::GameOver).then(|| SubmitScore {
            name: name.to_string(),
            score: u64::from(self.score),
        })
    }

    pub fn scene(&self) -> Scene {
        let ball = self.ball.as_ref().map(|b| Drawable {
            rect: b.rect(),
            appearance: self.assets.appearance(Asset::Ball(b.tier)),
        });
        let overlay = match self.phase {
            Phase::Paused => Overlay::Paused,
            Phase::GameOver => Overlay::GameOver {
                final_score: self.score,
            },
            Phase::Active if self.ball.is_none() => Overlay::Waiting,
            Phase::Active => Overlay::None,
        };
        Scene {
            width: self.width,
            height: self.height,
            ball,
            basket: Drawable {
                rect: self.basket.rect(),
                appearance: self.assets.appearance(Asset::Basket),
            },
            overlay,
            score: self.score,
            high_score: self.high_score,
        }
    }
}
