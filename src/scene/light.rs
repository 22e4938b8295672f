// scene/light.rs - Point and spot lights with cone attenuated falloff

use glam::Vec3;

use crate::color::Color;
use crate::geometry::Triangle;
use crate::math::{cos_between, safe_normalize};
use crate::settings::RenderSettings;

/// Angular behavior of a light source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Radiates equally in all directions.
    Point,
    /// Radiates inside a cone around the light direction; intensity decays
    /// linearly with the cosine deficit outside it.
    Spot { cos_half_angle: f32 },
}

/// A colored light source.
///
/// Like [`Body`](super::Body), every observable mutation bumps `generation`
/// so lighting caches can compare integers instead of float snapshots. The
/// separate `moved` flag only reports whether the light changed since the
/// last finished frame.
#[derive(Debug, Clone, Copy)]
pub struct Light {
    position: Vec3,
    direction: Vec3,
    color: Color,
    power: f32,
    kind: LightKind,
    moved: bool,
    generation: u64,
    fallback_direction: Vec3,
    min_power: f32,
    falloff: f32,
    cone_falloff: f32,
}

/// Spot cone angles are clamped into this range, in degrees.
const SPOT_FOV_RANGE: (f32, f32) = (10.0, 90.0);

impl Light {
    /// Omnidirectional light. `power` is floored by the configured minimum.
    pub fn point(position: Vec3, color: Color, power: f32, settings: &RenderSettings) -> Self {
        Light {
            position,
            direction: settings.view_direction(),
            color,
            power: power.max(settings.min_light_power),
            kind: LightKind::Point,
            moved: true,
            generation: 0,
            fallback_direction: settings.view_direction(),
            min_power: settings.min_light_power,
            falloff: settings.light_falloff,
            cone_falloff: settings.cone_falloff,
        }
    }

    /// Cone light aimed along `direction` with a full opening angle of
    /// `fov_degrees`.
    pub fn spot(
        position: Vec3,
        direction: Vec3,
        fov_degrees: f32,
        color: Color,
        power: f32,
        settings: &RenderSettings,
    ) -> Self {
        let mut light = Light::point(position, color, power, settings);
        light.kind = LightKind::Spot {
            cos_half_angle: Self::cos_half_angle(fov_degrees),
        };
        light.set_direction(direction);
        light
    }

    fn cos_half_angle(fov_degrees: f32) -> f32 {
        let clamped = fov_degrees.clamp(SPOT_FOV_RANGE.0, SPOT_FOV_RANGE.1);
        (clamped / 2.0).to_radians().cos()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn kind(&self) -> LightKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the light changed since the last finished frame.
    pub fn moved(&self) -> bool {
        self.moved
    }

    /// Clears or raises the per-frame moved flag without invalidating caches.
    pub fn set_moved(&mut self, moved: bool) {
        self.moved = moved;
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.mark_moved();
        }
    }

    /// Aims the light. Zero-length directions fall back to the configured
    /// default axis instead of producing NaNs.
    pub fn set_direction(&mut self, direction: Vec3) {
        let normalized = safe_normalize(direction, self.fallback_direction);
        if self.direction != normalized {
            self.direction = normalized;
            self.mark_moved();
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.mark_moved();
        }
    }

    pub fn set_power(&mut self, power: f32) {
        let floored = power.max(self.min_power);
        if self.power != floored {
            self.power = floored;
            self.mark_moved();
        }
    }

    /// Changes the cone opening angle. Ignored for point lights.
    pub fn set_fov(&mut self, fov_degrees: f32) {
        if let LightKind::Spot { cos_half_angle } = self.kind {
            let updated = Self::cos_half_angle(fov_degrees);
            if cos_half_angle != updated {
                self.kind = LightKind::Spot {
                    cos_half_angle: updated,
                };
                self.mark_moved();
            }
        }
    }

    fn mark_moved(&mut self) {
        self.moved = true;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Contribution of this light to a single world-space triangle.
    ///
    /// Intensity starts as the cosine between the surface normal and the
    /// direction toward the light, loses cone attenuation for spots, and is
    /// scaled by distance falloff. Surfaces facing away receive black.
    pub fn illuminate(&self, triangle: &Triangle, base_color: Color) -> Color {
        let centroid = triangle.centroid();
        let to_polygon = safe_normalize(centroid - self.position, Vec3::ZERO);
        let normal = triangle.normal();

        let mut intensity = cos_between(normal, -to_polygon);

        if let LightKind::Spot { cos_half_angle } = self.kind {
            let cos_angle = cos_between(self.direction, to_polygon);
            if cos_angle < cos_half_angle {
                intensity -= self.cone_falloff * (cos_half_angle - cos_angle);
            }
        }

        let distance = (centroid - self.position).length().max(1e-6);
        let falloff = self.power / distance * self.falloff;

        let scale = (intensity * falloff).max(0.0);
        Color(self.color.0 * base_color.0 * scale / 255.0)
    }
}
