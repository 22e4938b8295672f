//! Built-in polygon mesh generators. All shapes are centered on the origin
//! and wound so triangle normals point outward.

use glam::Vec3;

use crate::color::Color;
use crate::geometry::{Polygon, Triangle};

/// Axis-aligned cube with `details` subdivisions per edge.
///
/// Produces `6 * details^2 * 2` triangles.
pub fn cube(side: f32, details: usize, color: Color) -> Vec<Polygon> {
    let details = details.max(1);
    let half = side / 2.0;

    // One entry per face: corner plus the two full-length edge vectors,
    // ordered so that u cross v points out of the cube.
    let faces = [
        // +X
        (
            Vec3::new(half, -half, -half),
            Vec3::new(0.0, side, 0.0),
            Vec3::new(0.0, 0.0, side),
        ),
        // -X
        (
            Vec3::new(-half, -half, -half),
            Vec3::new(0.0, 0.0, side),
            Vec3::new(0.0, side, 0.0),
        ),
        // +Y
        (
            Vec3::new(-half, half, -half),
            Vec3::new(0.0, 0.0, side),
            Vec3::new(side, 0.0, 0.0),
        ),
        // -Y
        (
            Vec3::new(-half, -half, -half),
            Vec3::new(side, 0.0, 0.0),
            Vec3::new(0.0, 0.0, side),
        ),
        // +Z
        (
            Vec3::new(-half, -half, half),
            Vec3::new(side, 0.0, 0.0),
            Vec3::new(0.0, side, 0.0),
        ),
        // -Z
        (
            Vec3::new(-half, -half, -half),
            Vec3::new(0.0, side, 0.0),
            Vec3::new(side, 0.0, 0.0),
        ),
    ];

    let step = 1.0 / details as f32;
    let mut polygons = Vec::with_capacity(6 * details * details * 2);

    for (corner, u, v) in faces {
        for i in 0..details {
            for j in 0..details {
                let p00 = corner + u * (i as f32 * step) + v * (j as f32 * step);
                let p10 = corner + u * ((i + 1) as f32 * step) + v * (j as f32 * step);
                let p01 = corner + u * (i as f32 * step) + v * ((j + 1) as f32 * step);
                let p11 = corner + u * ((i + 1) as f32 * step) + v * ((j + 1) as f32 * step);

                polygons.push(Polygon::new(Triangle::new(p00, p10, p11), color));
                polygons.push(Polygon::new(Triangle::new(p00, p11, p01), color));
            }
        }
    }

    polygons
}

/// UV sphere with `details` latitude rings and `2 * details` longitude
/// segments, poles along +Z and -Z.
///
/// Produces `4 * details * (details - 1)` triangles.
pub fn uv_sphere(radius: f32, details: usize, color: Color) -> Vec<Polygon> {
    let theta_steps = details.max(3);
    let phi_steps = theta_steps * 2;

    let mut vertices = Vec::with_capacity((theta_steps + 1) * phi_steps);
    for i in 0..=theta_steps {
        let theta = std::f32::consts::PI * i as f32 / theta_steps as f32;
        for j in 0..phi_steps {
            let phi = std::f32::consts::TAU * j as f32 / phi_steps as f32;
            vertices.push(
                Vec3::new(
                    theta.sin() * phi.cos(),
                    theta.sin() * phi.sin(),
                    theta.cos(),
                ) * radius,
            );
        }
    }

    let index = |ring: usize, segment: usize| ring * phi_steps + segment % phi_steps;
    let mut polygons = Vec::with_capacity(4 * theta_steps * (theta_steps - 1));

    for i in 0..theta_steps {
        for j in 0..phi_steps {
            let v00 = vertices[index(i, j)];
            let v01 = vertices[index(i, j + 1)];
            let v10 = vertices[index(i + 1, j)];
            let v11 = vertices[index(i + 1, j + 1)];

            // Ring 0 collapses to the north pole, the last ring to the south
            // pole; the collapsed triangle of each cap is skipped.
            if i > 0 {
                polygons.push(Polygon::new(Triangle::new(v00, v10, v01), color));
            }
            if i < theta_steps - 1 {
                polygons.push(Polygon::new(Triangle::new(v01, v10, v11), color));
            }
        }
    }

    polygons
}
