// scene/body.rs - Polygon mesh entity with lazy world-space caching

use std::sync::Arc;

use glam::{EulerRot, Mat3, Vec3};

use crate::color::Color;
use crate::geometry::{Polygon, Triangle};
use crate::settings::RenderSettings;

/// Returned when a lit color list does not pair one color per polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCountMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl std::fmt::Display for ColorCountMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lit color count mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for ColorCountMismatch {}

/// A rigid polygon mesh with position, orientation and scale.
///
/// World-space triangles are cached and only rebuilt after a setter actually
/// changes the pose. Every observable mutation also bumps `generation`, which
/// the lighting cache uses to detect stale entries without comparing floats.
#[derive(Debug, Clone)]
pub struct Body {
    polygons: Vec<Polygon>,
    position: Vec3,
    direction: Vec3,
    scale: Vec3,
    scale_epsilon: f32,
    rotation: Mat3,
    moved: bool,
    generation: u64,
    world_cache: Vec<Triangle>,
    lit_colors: Option<Arc<[Color]>>,
}

impl Body {
    pub fn new(polygons: Vec<Polygon>, settings: &RenderSettings) -> Self {
        let world_cache = Vec::with_capacity(polygons.len());
        let scale_epsilon = settings.scale_epsilon;
        Body {
            polygons,
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            scale: Vec3::ONE + Vec3::splat(scale_epsilon),
            scale_epsilon,
            rotation: Mat3::IDENTITY,
            moved: true,
            generation: 0,
            world_cache,
            lit_colors: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Euler angles in degrees, applied about X, then Y, then Z.
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.set_direction(direction);
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Reverses every polygon winding. Turns a closed shape inside out so it
    /// can be viewed from within, e.g. a sky box.
    pub fn with_inverted_winding(mut self) -> Self {
        for polygon in &mut self.polygons {
            polygon.triangle = polygon.triangle.flipped();
        }
        self.mark_moved();
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Monotonic counter incremented by every observable mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.mark_moved();
        }
    }

    /// Sets the orientation from Euler angles in degrees (rotations about
    /// X, then Y, then Z).
    pub fn set_direction(&mut self, direction: Vec3) {
        if self.direction != direction {
            self.direction = direction;
            self.rotation = Mat3::from_euler(
                EulerRot::ZYX,
                direction.z.to_radians(),
                direction.y.to_radians(),
                direction.x.to_radians(),
            );
            self.mark_moved();
        }
    }

    /// Sets per-axis scale. A small epsilon is added to every component so a
    /// zero scale never flattens the mesh completely.
    pub fn set_scale(&mut self, scale: Vec3) {
        let adjusted = scale + Vec3::splat(self.scale_epsilon);
        if self.scale != adjusted {
            self.scale = adjusted;
            self.mark_moved();
        }
    }

    fn mark_moved(&mut self) {
        self.moved = true;
        self.generation = self.generation.wrapping_add(1);
        self.lit_colors = None;
    }

    fn refresh_world(&mut self) {
        if !self.moved {
            return;
        }
        let rotation = self.rotation;
        let scale = self.scale;
        let position = self.position;
        self.world_cache.clear();
        self.world_cache.extend(self.polygons.iter().map(|polygon| {
            let [a, b, c] = polygon.triangle.0;
            Triangle::new(
                rotation * (a * scale) + position,
                rotation * (b * scale) + position,
                rotation * (c * scale) + position,
            )
        }));
        self.moved = false;
    }

    /// World-space triangles, rebuilt first if the pose changed.
    pub fn world_polygons(&mut self) -> &[Triangle] {
        self.refresh_world();
        &self.world_cache
    }

    /// World-space triangles paired with their current display colors:
    /// the lit colors when present, otherwise each polygon's base color.
    pub fn lit_polygons(&mut self) -> impl Iterator<Item = (Triangle, Color)> + '_ {
        self.refresh_world();
        let lit = self.lit_colors.as_deref();
        let polygons = &self.polygons;
        self.world_cache
            .iter()
            .enumerate()
            .map(move |(i, triangle)| {
                let color = lit
                    .and_then(|colors| colors.get(i).copied())
                    .unwrap_or(polygons[i].color);
                (*triangle, color)
            })
    }

    /// World-space triangles paired with their base colors, the inputs to
    /// lighting evaluation.
    pub fn shading_inputs(&mut self) -> impl Iterator<Item = (Triangle, Color)> + '_ {
        self.refresh_world();
        let polygons = &self.polygons;
        self.world_cache
            .iter()
            .zip(polygons)
            .map(|(triangle, polygon)| (*triangle, polygon.color))
    }

    /// Stores computed lighting, one color per polygon.
    pub fn set_lit_colors(
        &mut self,
        colors: impl Into<Arc<[Color]>>,
    ) -> Result<(), ColorCountMismatch> {
        let colors = colors.into();
        if colors.len() != self.polygons.len() {
            return Err(ColorCountMismatch {
                expected: self.polygons.len(),
                actual: colors.len(),
            });
        }
        self.lit_colors = Some(colors);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    const EPS: f32 = 1e-3;

    fn flat_triangle() -> Vec<Polygon> {
        vec![Polygon::new(
            Triangle::new(Vec3::X, Vec3::Y, Vec3::Z),
            Color::rgb(200, 10, 30),
        )]
    }

    #[test]
    fn translation_moves_every_vertex() {
        let offset = Vec3::new(3.0, -2.0, 7.5);
        let mut body =
            Body::new(flat_triangle(), &RenderSettings::default()).with_position(offset);

        let world = body.world_polygons()[0];
        assert!(world.0[0].abs_diff_eq(Vec3::X + offset, EPS));
        assert!(world.0[1].abs_diff_eq(Vec3::Y + offset, EPS));
        assert!(world.0[2].abs_diff_eq(Vec3::Z + offset, EPS));
    }

    #[test]
    fn scale_applies_before_rotation_and_translation() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default())
            .with_scale(Vec3::new(2.0, 3.0, 4.0));

        let world = body.world_polygons()[0];
        assert!(world.0[0].abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), EPS));
        assert!(world.0[1].abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), EPS));
        assert!(world.0[2].abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), EPS));
    }

    #[test]
    fn zero_scale_does_not_collapse_the_mesh() {
        let settings = RenderSettings::default();
        let body = Body::new(flat_triangle(), &settings);
        assert!(body.scale().x > 1.0);

        let mut flattened = Body::new(flat_triangle(), &settings);
        flattened.set_scale(Vec3::new(1.0, 1.0, 0.0));
        let world = flattened.world_polygons()[0];
        assert!(world.0[2].z > 0.0, "Zero scale must not collapse the mesh");
    }

    #[test]
    fn rotation_angles_compose_x_then_y_then_z() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default())
            .with_direction(Vec3::new(90.0, 0.0, 90.0));

        let world = body.world_polygons()[0];
        // X vertex: unaffected by the X rotation, then rotated to +Y.
        assert!(world.0[0].abs_diff_eq(Vec3::Y, EPS), "got {:?}", world.0[0]);
        // Y vertex: X rotation lifts it to +Z, which the Z rotation keeps.
        assert!(world.0[1].abs_diff_eq(Vec3::Z, EPS), "got {:?}", world.0[1]);
    }

    #[test]
    fn world_cache_is_reused_until_the_pose_changes() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default());

        let first = body.world_polygons().to_vec();
        assert!(!body.moved());
        let second = body.world_polygons().to_vec();
        assert_eq!(first, second);

        body.set_position(Vec3::new(0.0, 0.0, 1.0));
        assert!(body.moved());
        let third = body.world_polygons().to_vec();
        assert!(third[0].0[0].abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), EPS));
    }

    #[test]
    fn setters_with_identical_values_do_not_invalidate() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default())
            .with_position(Vec3::new(1.0, 2.0, 3.0));
        body.world_polygons();

        let generation = body.generation();
        body.set_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(body.generation(), generation);
        assert!(!body.moved());

        body.set_position(Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(body.generation(), generation + 1);
        assert!(body.moved());
    }

    #[test]
    fn mutation_discards_stored_lighting() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default());
        body.set_lit_colors(vec![Color::WHITE]).unwrap();

        let (_, lit) = body.lit_polygons().next().unwrap();
        assert_eq!(lit, Color::WHITE);

        body.set_position(Vec3::Z);
        let (_, base) = body.lit_polygons().next().unwrap();
        assert_eq!(base, Color::rgb(200, 10, 30));
    }

    #[test]
    fn mismatched_color_count_is_rejected() {
        let mut body = Body::new(flat_triangle(), &RenderSettings::default());
        assert_eq!(body.polygons().len(), 1);

        let err = body
            .set_lit_colors(vec![Color::WHITE, Color::BLACK])
            .unwrap_err();
        assert_eq!(err, ColorCountMismatch { expected: 1, actual: 2 });
    }

    #[test]
    fn inverted_winding_flips_normals() {
        let settings = RenderSettings::default();
        let mut shell = Body::new(shapes::cube(2.0, 1, Color::WHITE), &settings)
            .with_inverted_winding();

        for triangle in shell.world_polygons() {
            assert!(
                triangle.normal().dot(triangle.centroid()) < 0.0,
                "Expected inward normal at {:?}",
                triangle.centroid()
            );
        }
    }
}
