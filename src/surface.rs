//! Output boundary for rendered frames.
//!
//! The pipeline produces screen-space triangles; anything that can take a
//! batch of those per frame can act as a target.

use glam::Vec2;

/// One filled triangle in screen coordinates, ready to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub points: [Vec2; 3],
    pub color: [u8; 3],
}

/// A full frame, ordered back to front.
pub type DrawList = Vec<DrawCommand>;

pub trait PaintSurface {
    /// Target dimensions in pixels, used to center projected coordinates.
    fn viewport(&self) -> Vec2;

    /// Receives one complete frame. Commands arrive pre-sorted; painting
    /// them in order yields correct occlusion.
    fn present(&mut self, commands: &[DrawCommand]);
}

/// Surface that stores every presented frame, used by the headless binary
/// and by integration tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    viewport: Vec2,
    frames: Vec<DrawList>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Vec2::new(width, height),
            frames: Vec::new(),
        }
    }

    pub fn frames(&self) -> &[DrawList] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&DrawList> {
        self.frames.last()
    }
}

impl PaintSurface for RecordingSurface {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn present(&mut self, commands: &[DrawCommand]) {
        self.frames.push(commands.to_vec());
    }
}
