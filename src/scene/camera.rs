// scene/camera.rs - View cone visibility tests and perspective projection

use glam::{Mat3, Vec2, Vec3};

use crate::geometry::Triangle;
use crate::math::{cos_between, regularized_inverse, safe_normalize, solve_linear3};
use crate::settings::RenderSettings;

/// Perspective camera.
///
/// Visibility is a pure cone test against the cosine of the half FOV, so no
/// inverse trigonometry runs per polygon. Projection intersects the ray from
/// the focal anchor through a world point with the focal plane, then expresses
/// the intersection in the camera basis. The inverse basis matrix is cached
/// and rebuilt only after the camera moves.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    direction: Vec3,
    fov_degrees: f32,
    cos_half_fov: f32,
    focus: f32,
    view_dot: Vec3,
    inverse_basis: Option<Mat3>,
    world_up: Vec3,
    fallback_direction: Vec3,
    projection_scale: f32,
    near_plane: f32,
    matrix_epsilon: f32,
}

impl Camera {
    pub fn new(position: Vec3, direction: Vec3, settings: &RenderSettings) -> Self {
        let mut camera = Camera {
            position,
            direction: safe_normalize(direction, settings.view_direction()),
            fov_degrees: settings.fov_degrees,
            cos_half_fov: (settings.fov_degrees / 2.0).to_radians().cos(),
            focus: settings.focus,
            view_dot: Vec3::ZERO,
            inverse_basis: None,
            world_up: settings.world_up(),
            fallback_direction: settings.view_direction(),
            projection_scale: settings.projection_scale,
            near_plane: settings.near_plane,
            matrix_epsilon: settings.matrix_epsilon,
        };
        camera.refresh_view_dot();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_degrees
    }

    pub fn focus(&self) -> f32 {
        self.focus
    }

    /// Anchor of the projection plane. Eye rays are intersected with the
    /// plane through this point perpendicular to the view direction; its
    /// distance scales with both focus and FOV.
    pub fn view_dot(&self) -> Vec3 {
        self.view_dot
    }

    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.invalidate();
        }
    }

    /// Aims the camera. Zero-length directions fall back to the configured
    /// default axis.
    pub fn set_direction(&mut self, direction: Vec3) {
        let normalized = safe_normalize(direction, self.fallback_direction);
        if self.direction != normalized {
            self.direction = normalized;
            self.invalidate();
        }
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        let clamped = fov_degrees.clamp(1.0, 179.0);
        if self.fov_degrees != clamped {
            self.fov_degrees = clamped;
            self.cos_half_fov = (clamped / 2.0).to_radians().cos();
            self.invalidate();
        }
    }

    pub fn set_focus(&mut self, focus: f32) {
        if focus > 0.0 && self.focus != focus {
            self.focus = focus;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.inverse_basis = None;
        self.refresh_view_dot();
    }

    fn refresh_view_dot(&mut self) {
        let half_fov = (self.fov_degrees / 2.0).to_radians();
        self.view_dot = self.position + self.direction * (self.focus / 2.0 * half_fov.tan());
    }

    /// Whether a world point lies inside the view cone.
    pub fn is_point_visible(&self, point: Vec3) -> bool {
        let to_point = safe_normalize(point - self.position, Vec3::ZERO);
        cos_between(to_point, self.direction) >= self.cos_half_fov
    }

    /// Combined backface and frustum test.
    ///
    /// A triangle is visible iff its front side faces the camera and at
    /// least one vertex lies inside the view cone. Degenerate triangles with
    /// a zero normal pass the facing test and are left to the frustum check.
    pub fn is_triangle_visible(&self, triangle: &Triangle) -> bool {
        let to_centroid = triangle.centroid() - self.position;
        if triangle.normal().dot(to_centroid) > 0.0 {
            return false;
        }
        triangle.0.iter().any(|&vertex| self.is_point_visible(vertex))
    }

    /// Right and up axes of the camera, derived from the world up axis.
    fn basis_axes(&self) -> (Vec3, Vec3) {
        let right = self.direction.cross(self.world_up);
        let up = right.cross(self.direction);
        (right, up)
    }

    /// Matrix taking world offsets from the focal anchor into camera
    /// coordinates, cached until the camera moves. Regularized when the view
    /// direction is parallel to the world up axis.
    fn inverse_basis(&mut self) -> Mat3 {
        if let Some(inverse) = self.inverse_basis {
            return inverse;
        }
        let (right, up) = self.basis_axes();
        let basis = Mat3::from_cols(right, up, self.direction);
        let inverse = regularized_inverse(basis, self.matrix_epsilon);
        self.inverse_basis = Some(inverse);
        inverse
    }

    /// Projects a world point onto the focal plane and returns screen
    /// coordinates relative to the screen center, or `None` when the point
    /// is behind the near plane.
    ///
    /// The intersection of the ray from the camera through the point with
    /// the focal plane is found by solving a 3x3 linear system: one row
    /// fixes the plane through `view_dot`, the other two constrain the
    /// intersection to the ray.
    pub fn project_point(&mut self, point: Vec3) -> Option<Vec2> {
        let ray = point - self.position;
        let depth = ray.dot(self.direction);
        if depth < self.near_plane {
            return None;
        }

        // Rows of the system; glam stores columns, so transpose.
        let rows = Mat3::from_cols(
            self.direction,
            Vec3::new(ray.y, -ray.x, 0.0),
            Vec3::new(ray.z, 0.0, -ray.x),
        )
        .transpose();
        let rhs = Vec3::new(
            self.view_dot.dot(self.direction),
            ray.y * self.position.x - ray.x * self.position.y,
            ray.z * self.position.x - ray.x * self.position.z,
        );

        let intersection = solve_linear3(rows, rhs, self.matrix_epsilon);
        let camera_space = self.inverse_basis() * (intersection - self.view_dot);

        let scale = self.projection_scale / self.focus;
        Some(Vec2::new(camera_space.x * scale, -camera_space.y * scale))
    }

    /// Projects all three vertices into viewport coordinates, with the
    /// origin at the top left. Returns `None` if any vertex fails.
    pub fn project_triangle(&mut self, triangle: &Triangle, viewport: Vec2) -> Option<[Vec2; 3]> {
        let half = viewport / 2.0;
        let a = self.project_point(triangle.0[0])? + half;
        let b = self.project_point(triangle.0[1])? + half;
        let c = self.project_point(triangle.0[2])? + half;
        Some([a, b, c])
    }
}
