use crate::collision::Rect;
use crate::constants::{BASKET_BOTTOM_MARGIN, BASKET_HEIGHT, BASKET_MOVE_SPEED, BASKET_WIDTH};

/// Player-controlled catcher. Position only, no physics.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub move_speed: f32,
}

impl Basket {
    /// Centred horizontally, anchored near the bottom edge
    pub fn new(canvas_width: f32, canvas_height: f32) -> Self {
        Self {
            x: (canvas_width - BASKET_WIDTH) / 2.0,
            y: canvas_height - BASKET_HEIGHT - BASKET_BOTTOM_MARGIN,
            width: BASKET_WIDTH,
            height: BASKET_HEIGHT,
            move_speed: BASKET_MOVE_SPEED,
        }
    }

    pub fn step_left(&mut self, canvas_width: f32) {
        self.set_x(self.x - self.move_speed, canvas_width);
    }

    pub fn step_right(&mut self, canvas_width: f32) {
        self.set_x(self.x + self.move_speed, canvas_width);
    }

    pub fn drag_by(&mut self, dx: f32, canvas_width: f32) {
        self.set_x(self.x + dx, canvas_width);
    }

    /// Keep the basket on the bottom edge and inside the canvas after a resize
    pub fn reanchor(&mut self, canvas_width: f32, canvas_height: f32) {
        self.y = canvas_height - self.height - BASKET_BOTTOM_MARGIN;
        self.set_x(self.x, canvas_width);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn set_x(&mut self, x: f32, canvas_width: f32) {
        let max_x = (canvas_width - self.width).max(0.0);
        self.x = x.clamp(0.0, max_x);
    }
}
