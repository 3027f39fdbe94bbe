//! Score submission flow shown after game over
//!
//! The network request is made by the caller; this type only tracks what the
//! dialog shows and which controls are enabled. A failed request returns the
//! dialog to an editable state so the player can retry.

use crate::prefs::{KeyValueStorage, LocalPrefs};
use crate::SubmitScore;

pub const MSG_NAME_REQUIRED: &str = "Please enter your name";
pub const MSG_SAVING: &str = "Saving...";
pub const MSG_SAVED: &str = "Score saved successfully!";
pub const MSG_FAILED: &str = "Error saving score. Please try again.";

/// Where the browser goes after a successful save
pub const LEADERBOARD_PATH: &str = "/leaderboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Closed,
    Editing {
        score: u64,
        name: String,
        message: Option<&'static str>,
    },
    Saving {
        request: SubmitScore,
    },
    Saved {
        request: SubmitScore,
    },
    Failed {
        request: SubmitScore,
    },
}

impl Default for Submission {
    fn default() -> Self {
        Submission::Closed
    }
}

impl Submission {
    /// Open the dialog with the last used name pre-filled
    pub fn open<S: KeyValueStorage>(score: u64, prefs: &LocalPrefs<S>) -> Self {
        Submission::Editing {
            score,
            name: prefs.player_name(),
            message: None,
        }
    }

    /// Update the name field. Accepted while editing or after a failure.
    pub fn set_name(&mut self, value: &str) {
        match self {
            Submission::Editing { name, .. } => *name = value.to_string(),
            Submission::Failed { request } => {
                let score = request.score;
                *self = Submission::Editing {
                    score,
                    name: value.to_string(),
                    message: None,
                }
            }
            _ => {}
        }
    }

    /// Validate the name and start saving. Returns the request to send, or
    /// `None` if the name is empty or a save is not possible right now.
    pub fn save<S: KeyValueStorage>(&mut self, prefs: &mut LocalPrefs<S>) -> Option<SubmitScore> {
        let (score, name) = match self {
            Submission::Editing { score, name, .. } => (*score, name.trim().to_string()),
            Submission::Failed { request } => (request.score, request.name.clone()),
            _ => return None,
        };

        if name.is_empty() {
            *self = Submission::Editing {
                score,
                name,
                message: Some(MSG_NAME_REQUIRED),
            };
            return None;
        }

        prefs.set_player_name(&name);
        let request = SubmitScore { name, score };
        *self = Submission::Saving {
            request: request.clone(),
        };
        Some(request)
    }

    /// Record the outcome of the request started by [`Submission::save`]
    pub fn complete<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        let Submission::Saving { request } = self else {
            tracing::debug!("Ignoring submission result outside of a save");
            return;
        };
        let request = request.clone();
        match result {
            Ok(()) => {
                tracing::info!("Saved score {} for {}", request.score, request.name);
                *self = Submission::Saved { request };
            }
            Err(e) => {
                tracing::error!("Failed to save score: {}", e);
                *self = Submission::Failed { request };
            }
        }
    }

    pub fn cancel(&mut self) {
        if !matches!(self, Submission::Saving { .. }) {
            *self = Submission::Closed;
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            Submission::Closed => None,
            Submission::Editing { message, .. } => *message,
            Submission::Saving { .. } => Some(MSG_SAVING),
            Submission::Saved { .. } => Some(MSG_SAVED),
            Submission::Failed { .. } => Some(MSG_FAILED),
        }
    }

    /// Save and cancel buttons are disabled while a request is in flight
    pub fn controls_enabled(&self) -> bool {
        matches!(self, Submission::Editing { .. } | Submission::Failed { .. })
    }

    pub fn redirect(&self) -> Option<&'static str> {
        matches!(self, Submission::Saved { .. }).then_some(LEADERBOARD_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStorage;

    fn prefs() -> LocalPrefs<MemoryStorage> {
        LocalPrefs::new(MemoryStorage::new())
    }

    #[test]
    fn test_open_prefills_name() {
        let mut p = prefs();
        p.set_player_name("Alice");
        let sub = Submission::open(42, &p);
        assert_eq!(
            sub,
            Submission::Editing {
                score: 42,
                name: "Alice".into(),
                message: None
            }
        );
        assert!(sub.controls_enabled());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut p = prefs();
        let mut sub = Submission::open(5, &p);
        sub.set_name("   ");
        assert!(sub.save(&mut p).is_none());
        assert_eq!(sub.message(), Some(MSG_NAME_REQUIRED));
        assert!(sub.controls_enabled());
    }

    #[test]
    fn test_save_trims_and_remembers_name() {
        let mut p = prefs();
        let mut sub = Submission::open(5, &p);
        sub.set_name("  Bob ");
        let req = sub.save(&mut p).unwrap();
        assert_eq!(req.name, "Bob");
        assert_eq!(req.score, 5);
        assert_eq!(p.player_name(), "Bob");
        assert!(!sub.controls_enabled());
        assert_eq!(sub.message(), Some(MSG_SAVING));
        // no double submit while saving
        assert!(sub.save(&mut p).is_none());
    }

    #[test]
    fn test_success_redirects() {
        let mut p = prefs();
        let mut sub = Submission::open(5, &p);
        sub.set_name("Bob");
        sub.save(&mut p);
        sub.complete::<String>(Ok(()));
        assert_eq!(sub.message(), Some(MSG_SAVED));
        assert_eq!(sub.redirect(), Some("/leaderboard"));
    }

    #[test]
    fn test_failure_is_retryable() {
        let mut p = prefs();
        let mut sub = Submission::open(7, &p);
        sub.set_name("Carol");
        sub.save(&mut p);
        sub.complete(Err("connection refused"));
        assert_eq!(sub.message(), Some(MSG_FAILED));
        assert!(sub.controls_enabled());
        assert!(sub.redirect().is_none());

        let retry = sub.save(&mut p).unwrap();
        assert_eq!(retry.name, "Carol");
        assert_eq!(retry.score, 7);
        sub.complete::<String>(Ok(()));
        assert!(matches!(sub, Submission::Saved { .. }));
    }

    #[test]
    fn test_stray_completion_ignored() {
        let mut sub = Submission::Closed;
        sub.complete::<String>(Ok(()));
        assert_eq!(sub, Submission::Closed);
    }

    #[test]
    fn test_cancel() {
        let p = prefs();
        let mut sub = Submission::open(1, &p);
        sub.cancel();
        assert_eq!(sub, Submission::Closed);
        assert_eq!(sub.message(), None);
    }
}
