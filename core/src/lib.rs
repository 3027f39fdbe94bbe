//! Catch-the-ball game core
//!
//! Platform-independent simulation (ball, basket, collision, session state
//! machine, frame loop), client-side persistence and submission flow, and the
//! wire types shared with the high-score server.

use serde::{Deserialize, Serialize};

pub mod ball;
pub mod basket;
pub mod collision;
pub mod constants;
pub mod frame_loop;
pub mod game;
pub mod input;
pub mod prefs;
pub mod scene;
pub mod submit;

pub use ball::{Ball, Tier};
pub use basket::Basket;
pub use frame_loop::{Frame, FrameLoop};
pub use game::{Game, Phase, TickOutcome};
pub use input::Input;
pub use prefs::{KeyValueStorage, LocalPrefs, MemoryStorage};
pub use submit::Submission;

/// One leaderboard row, as persisted and as returned by `GET /api/high-scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
    /// ISO-8601 time the score was submitted. Older files may lack it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Body of `POST /api/high-scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScore {
    pub name: String,
    pub score: u64,
}

/// Success body of `POST /api/high-scores`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
}

/// Error body for any failed API request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
