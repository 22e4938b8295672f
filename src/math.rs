use glam::{Mat3, Vec3};

/// Determinants smaller than this are treated as singular.
const SINGULAR_DET: f32 = 1e-6;

/// Normalizes `vec`, substituting `fallback` for vectors too short to
/// normalize safely.
pub fn safe_normalize(vec: Vec3, fallback: Vec3) -> Vec3 {
    if vec.length_squared() > 1e-6 {
        vec.normalize()
    } else {
        fallback
    }
}

/// Cosine of the angle between two directions, clamped into [-1, 1] so
/// accumulated float error never escapes the valid cosine range.
pub fn cos_between(a: Vec3, b: Vec3) -> f32 {
    a.dot(b).clamp(-1.0, 1.0)
}

/// Solves `a * x = b` for `x`.
///
/// Singular systems get `epsilon` added along the diagonal and are solved
/// again instead of failing, which keeps degenerate view geometry on screen
/// in roughly the right place. The right hand side is left untouched; a
/// nudge there shifts the solution by a full unit along degenerate axes.
pub fn solve_linear3(a: Mat3, b: Vec3, epsilon: f32) -> Vec3 {
    if a.determinant().abs() > SINGULAR_DET {
        return a.inverse() * b;
    }

    (a + Mat3::from_diagonal(Vec3::splat(epsilon))).inverse() * b
}

/// Inverts `a`, regularizing singular matrices with `epsilon` along the
/// diagonal rather than returning garbage from a zero determinant.
pub fn regularized_inverse(a: Mat3, epsilon: f32) -> Mat3 {
    if a.determinant().abs() > SINGULAR_DET {
        return a.inverse();
    }

    (a + Mat3::from_diagonal(Vec3::splat(epsilon))).inverse()
}
