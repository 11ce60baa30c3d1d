use super::Vec2;

/// 3D position. `z` orders sprites and tiles front to back.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn from_xy(p: Vec2, z: f32) -> Self {
        Self { x: p.x, y: p.y, z }
    }
}
