//! Frame-driven scheduling
//!
//! The platform calls [`FrameLoop::frame`] from its repaint callback and
//! schedules the next callback only while it returns `Some`. Stopping the loop
//! cancels the schedule instead of relying on recursion.

use crate::game::{Game, TickOutcome};
use crate::prefs::KeyValueStorage;
use crate::scene::Scene;

#[derive(Debug, Default)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
}

/// Result of one scheduled frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub outcome: TickOutcome,
    pub scene: Scene,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            tracing::debug!("Frame loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!("Frame loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one tick and produce the scene to draw. `None` means the loop was
    /// stopped and no further frame should be requested.
    pub fn frame<S: KeyValueStorage>(&mut self, game: &mut Game<S>) -> Option<Frame> {
        if !self.running {
            return None;
        }
        self.frames += 1;
        let outcome = game.tick();
        Some(Frame {
            outcome,
            scene: game.scene(),
        })
    }

    /// Drive up to `max_frames` frames in a tight loop, calling `on_frame`
    /// after each. Used by headless drivers.
    pub fn run<S, F>(&mut self, game: &mut Game<S>, max_frames: u64, mut on_frame: F) -> u64
    where
        S: KeyValueStorage,
        F: FnMut(&mut FrameLoop, &mut Game<S>, &Frame),
    {
        let start = self.frames;
        while self.frames - start < max_frames {
            let Some(frame) = self.frame(game) else {
                break;
            };
            on_frame(self, game, &frame);
        }
        self.frames - start
    }
}
