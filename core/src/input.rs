//! Player input
//!
//! Events arrive from the platform (key presses, touch / pointer drags) and are
//! applied synchronously to the game outside the tick. Pointer positions are
//! given in display pixels relative to the canvas element and converted to
//! logical canvas pixels with the current display scale.

/// Discrete player input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    MoveLeft,
    MoveRight,
    TogglePause,
    Restart,
    /// Pointer went down at a logical x position
    DragStart { x: f32 },
    /// Pointer moved to a logical x position
    DragMove { x: f32 },
}

impl Input {
    /// Map a DOM `KeyboardEvent.key` value to an input
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" => Some(Input::TogglePause),
            "r" | "R" => Some(Input::Restart),
            "ArrowLeft" => Some(Input::MoveLeft),
            "ArrowRight" => Some(Input::MoveRight),
            _ => None,
        }
    }

    pub fn drag_start(display_x: f32, scale: f32) -> Self {
        Input::DragStart {
            x: to_logical(display_x, scale),
        }
    }

    pub fn drag_move(display_x: f32, scale: f32) -> Self {
        Input::DragMove {
            x: to_logical(display_x, scale),
        }
    }
}

fn to_logical(display_x: f32, scale: f32) -> f32 {
    if scale > 0.0 {
        display_x / scale
    } else {
        display_x
    }
}
