use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Tuning values shared by the camera, lights and bodies.
///
/// Loaded once at startup and handed to constructors by value; nothing in
/// the pipeline mutates it afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Horizontal field of view of the camera, in degrees.
    #[serde(default = "RenderSettings::default_fov_degrees")]
    pub fov_degrees: f32,
    /// Distance from the camera to the focal plane anchor.
    #[serde(default = "RenderSettings::default_focus")]
    pub focus: f32,
    /// Multiplier from focal-plane units to screen pixels.
    #[serde(default = "RenderSettings::default_projection_scale")]
    pub projection_scale: f32,
    /// Points closer to the camera than this along the view axis are dropped.
    #[serde(default = "RenderSettings::default_near_plane")]
    pub near_plane: f32,
    /// Added to singular matrices before retrying an inversion or solve.
    #[serde(default = "RenderSettings::default_matrix_epsilon")]
    pub matrix_epsilon: f32,
    /// Added to every scale component so a zero scale never collapses geometry.
    #[serde(default = "RenderSettings::default_scale_epsilon")]
    pub scale_epsilon: f32,
    /// Floor applied to light power so falloff math stays well behaved.
    #[serde(default = "RenderSettings::default_min_light_power")]
    pub min_light_power: f32,
    /// Distance-falloff multiplier shared by all lights.
    #[serde(default = "RenderSettings::default_light_falloff")]
    pub light_falloff: f32,
    /// How fast spot light intensity decays outside the cone, per unit of
    /// cosine deficit.
    #[serde(default = "RenderSettings::default_cone_falloff")]
    pub cone_falloff: f32,
    /// World up axis used to build the camera basis.
    #[serde(default = "RenderSettings::default_world_up")]
    pub world_up: [f32; 3],
    /// Substitute for zero-length direction vectors.
    #[serde(default = "RenderSettings::default_view_direction")]
    pub view_direction: [f32; 3],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fov_degrees: Self::default_fov_degrees(),
            focus: Self::default_focus(),
            projection_scale: Self::default_projection_scale(),
            near_plane: Self::default_near_plane(),
            matrix_epsilon: Self::default_matrix_epsilon(),
            scale_epsilon: Self::default_scale_epsilon(),
            min_light_power: Self::default_min_light_power(),
            light_falloff: Self::default_light_falloff(),
            cone_falloff: Self::default_cone_falloff(),
            world_up: Self::default_world_up(),
            view_direction: Self::default_view_direction(),
        }
    }
}

impl RenderSettings {
    pub fn load() -> Self {
        Self::load_from_path("settings.json")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Self {
        use std::fs;

        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<RenderSettings>(&contents) {
                Ok(settings) => {
                    info!("Loaded render settings from {:?}", path);
                    settings.validate()
                }
                Err(err) => {
                    warn!(
                        "Failed to parse {:?} ({}). Falling back to default render settings.",
                        path, err
                    );
                    RenderSettings::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Render settings file {:?} not found. Using default settings.",
                    path
                );
                RenderSettings::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default render settings.",
                    path, err
                );
                RenderSettings::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            warn!(
                "Field of view must lie in (0, 180) degrees, got {}. Using default.",
                self.fov_degrees
            );
            self.fov_degrees = Self::default_fov_degrees();
        }

        if !(self.focus > 0.0) {
            warn!("Focus distance must be positive. Using default value.");
            self.focus = Self::default_focus();
        }

        if !(self.projection_scale > 0.0) {
            warn!("Projection scale must be positive. Using default value.");
            self.projection_scale = Self::default_projection_scale();
        }

        if !(self.near_plane > 0.0) {
            warn!("Near plane must be positive. Using default value.");
            self.near_plane = Self::default_near_plane();
        }

        if !(self.matrix_epsilon > 0.0) {
            warn!("Matrix regularization epsilon must be positive. Using default value.");
            self.matrix_epsilon = Self::default_matrix_epsilon();
        }

        if !(self.scale_epsilon > 0.0) {
            warn!("Scale epsilon must be positive. Using default value.");
            self.scale_epsilon = Self::default_scale_epsilon();
        }

        if !(self.min_light_power > 0.0) {
            warn!("Minimum light power must be positive. Using default value.");
            self.min_light_power = Self::default_min_light_power();
        }

        if !(self.light_falloff > 0.0) {
            warn!("Light falloff multiplier must be positive. Using default value.");
            self.light_falloff = Self::default_light_falloff();
        }

        if !(self.cone_falloff >= 0.0) {
            warn!("Cone falloff must not be negative. Using default value.");
            self.cone_falloff = Self::default_cone_falloff();
        }

        let up_len_sq: f32 = self.world_up.iter().map(|c| c * c).sum();
        if up_len_sq < 1e-6 {
            warn!("World up axis must not be a zero vector. Using default axis.");
            self.world_up = Self::default_world_up();
        }

        let dir_len_sq: f32 = self.view_direction.iter().map(|c| c * c).sum();
        if dir_len_sq < 1e-6 {
            warn!("Default view direction must not be a zero vector. Using default axis.");
            self.view_direction = Self::default_view_direction();
        }

        self
    }

    pub fn world_up(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.world_up)
    }

    pub fn view_direction(&self) -> glam::Vec3 {
        glam::Vec3::from_array(self.view_direction)
    }

    const fn default_fov_degrees() -> f32 {
        90.0
    }

    const fn default_focus() -> f32 {
        10.0
    }

    const fn default_projection_scale() -> f32 {
        1000.0
    }

    const fn default_near_plane() -> f32 {
        0.1
    }

    const fn default_matrix_epsilon() -> f32 {
        1e-5
    }

    const fn default_scale_epsilon() -> f32 {
        1e-4
    }

    const fn default_min_light_power() -> f32 {
        0.8
    }

    const fn default_light_falloff() -> f32 {
        15.0
    }

    const fn default_cone_falloff() -> f32 {
        20.0
    }

    const fn default_world_up() -> [f32; 3] {
        [0.0, 0.0, 1.0]
    }

    const fn default_view_direction() -> [f32; 3] {
        [0.0, 1.0, 0.0]
    }
}
