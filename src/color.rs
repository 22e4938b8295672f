use glam::Vec3;

/// RGB color with channels in 0..=255, kept as floats so lighting math can
/// scale channels without repeated conversions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Vec3);

impl Color {
    pub const BLACK: Color = Color(Vec3::ZERO);
    pub const WHITE: Color = Color(Vec3::new(255.0, 255.0, 255.0));

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(Vec3::new(r as f32, g as f32, b as f32))
    }

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color(Vec3::new(r, g, b))
    }

    /// Clamps all channels back into the displayable 0..=255 range.
    pub fn clamped(self) -> Self {
        Color(self.0.clamp(Vec3::ZERO, Vec3::splat(255.0)))
    }

    /// Converts to byte channels, clamping out-of-range values.
    pub fn to_rgb8(self) -> [u8; 3] {
        let clamped = self.clamped().0;
        [
            clamped.x.round() as u8,
            clamped.y.round() as u8,
            clamped.z.round() as u8,
        ]
    }
}

impl From<Vec3> for Color {
    fn from(channels: Vec3) -> Self {
        Color(channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_rgb8_rounds_channels() {
        assert_eq!(Color::new(0.4, 127.5, 254.6).to_rgb8(), [0, 128, 255]);
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_channels() {
        assert_eq!(Color::new(-20.0, 300.0, 128.0).to_rgb8(), [0, 255, 128]);
    }

    #[test]
    fn clamped_preserves_in_range_channels() {
        let color = Color::rgb(12, 200, 255);
        assert_eq!(color.clamped(), color);
    }
}
