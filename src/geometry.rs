use glam::Vec3;

use crate::color::Color;
use crate::math::safe_normalize;

/// Triangle in either local or world space, depending on who owns it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle(pub [Vec3; 3]);

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Triangle([a, b, c])
    }

    pub fn centroid(&self) -> Vec3 {
        (self.0[0] + self.0[1] + self.0[2]) / 3.0
    }

    /// Unit normal by the right hand rule, or zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.0[1] - self.0[0];
        let edge2 = self.0[2] - self.0[0];
        safe_normalize(edge1.cross(edge2), Vec3::ZERO)
    }

    /// Same triangle with the winding reversed, flipping the normal.
    pub fn flipped(self) -> Self {
        Triangle([self.0[0], self.0[2], self.0[1]])
    }
}

/// A triangle paired with its base material color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polygon {
    pub triangle: Triangle,
    pub color: Color,
}

impl Polygon {
    pub fn new(triangle: Triangle, color: Color) -> Self {
        Polygon { triangle, color }
    }
}
