// scene/mod.rs

pub mod body;
pub mod camera;
pub mod light;
pub mod lighting;
pub mod scene;

// Re-export commonly used types
pub use body::{Body, ColorCountMismatch};
pub use camera::Camera;
pub use light::{Light, LightKind};
pub use lighting::{LightingStats, LightingSystem};
pub use scene::Scene;
