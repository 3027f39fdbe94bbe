/// Axis-aligned rectangle in canvas coordinates (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Strict AABB overlap. Rectangles that only share an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y + a.h > b.y && a.y < b.y + b.h
}
