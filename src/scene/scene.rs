// scene/scene.rs - Entity storage and the frame pipeline

use glam::Vec2;
use hecs::World;
use rayon::prelude::*;

use crate::color::Color;
use crate::geometry::Triangle;
use crate::scene::{Body, Camera, Light, LightingSystem};
use crate::settings::RenderSettings;
use crate::surface::{DrawCommand, DrawList, PaintSurface};

/// Holds every entity plus the camera and lighting cache, and turns the
/// whole lot into an ordered draw list once per frame.
pub struct Scene {
    pub world: World,
    camera: Camera,
    lighting: LightingSystem,
    settings: RenderSettings,
}

impl Scene {
    pub fn new(settings: RenderSettings) -> Self {
        let camera = Camera::new(glam::Vec3::ZERO, settings.view_direction(), &settings);
        Self {
            world: World::new(),
            camera,
            lighting: LightingSystem::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn lighting(&self) -> &LightingSystem {
        &self.lighting
    }

    pub fn lighting_mut(&mut self) -> &mut LightingSystem {
        &mut self.lighting
    }

    pub fn spawn_body(&mut self, body: Body) -> hecs::Entity {
        self.world.spawn((body,))
    }

    pub fn spawn_light(&mut self, light: Light) -> hecs::Entity {
        self.world.spawn((light,))
    }

    /// Removes an entity and drops its lighting cache entry. Returns false
    /// if the entity was already gone.
    pub fn despawn(&mut self, entity: hecs::Entity) -> bool {
        match self.world.despawn(entity) {
            Ok(()) => {
                self.lighting.invalidate(entity);
                true
            }
            Err(_) => false,
        }
    }

    pub fn body_mut(&mut self, entity: hecs::Entity) -> Option<hecs::RefMut<'_, Body>> {
        self.world.get::<&mut Body>(entity).ok()
    }

    pub fn light_mut(&mut self, entity: hecs::Entity) -> Option<hecs::RefMut<'_, Light>> {
        self.world.get::<&mut Light>(entity).ok()
    }

    pub fn body_count(&self) -> usize {
        self.world.query::<&Body>().iter().count()
    }

    pub fn light_count(&self) -> usize {
        self.world.query::<&Light>().iter().count()
    }

    /// Runs the full frame pipeline and returns the polygons to draw,
    /// farthest first.
    pub fn render(&mut self, viewport: Vec2) -> DrawList {
        // Snapshot lights once; both illumination and cache keys use it.
        let mut lights: Vec<Light> = Vec::new();
        let mut light_state: Vec<(hecs::Entity, u64)> = Vec::new();
        for (entity, light) in self.world.query::<&Light>().iter() {
            lights.push(*light);
            light_state.push((entity, light.generation()));
        }

        let bodies: Vec<hecs::Entity> = self
            .world
            .query::<&Body>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();

        // Lighting: serve cache hits and collect miss inputs first to keep
        // the ECS borrows out of the parallel section.
        let mut jobs: Vec<(hecs::Entity, u64, Vec<(Triangle, Color)>)> = Vec::new();
        for &entity in &bodies {
            let Ok(mut body) = self.world.get::<&mut Body>(entity) else {
                continue;
            };
            let generation = body.generation();
            if let Some(colors) = self.lighting.lookup(entity, generation, &light_state) {
                if let Err(err) = body.set_lit_colors(colors) {
                    log::error!("Cached lighting rejected: {}", err);
                }
            } else {
                jobs.push((entity, generation, body.shading_inputs().collect()));
            }
        }

        // Evaluate misses in parallel; entities are independent of each other.
        let results: Vec<(hecs::Entity, u64, Vec<Color>)> = jobs
            .par_iter()
            .map(|(entity, generation, polygons)| {
                (
                    *entity,
                    *generation,
                    LightingSystem::evaluate(polygons, &lights),
                )
            })
            .collect();

        // Apply sequentially (ECS and cache writes).
        for (entity, generation, colors) in results {
            let shared = self
                .lighting
                .insert(entity, generation, light_state.clone(), colors);
            if let Ok(mut body) = self.world.get::<&mut Body>(entity) {
                if let Err(err) = body.set_lit_colors(shared) {
                    log::error!("Computed lighting rejected: {}", err);
                }
            }
        }

        // Backface and view cone culling, fanned out per entity.
        let mut groups: Vec<Vec<(Triangle, Color)>> = Vec::with_capacity(bodies.len());
        for &entity in &bodies {
            let Ok(mut body) = self.world.get::<&mut Body>(entity) else {
                continue;
            };
            groups.push(body.lit_polygons().collect());
        }

        let camera = &self.camera;
        let culled: Vec<Vec<(f32, Triangle, Color)>> = groups
            .par_iter()
            .map(|polygons| {
                polygons
                    .iter()
                    .filter(|(triangle, _)| camera.is_triangle_visible(triangle))
                    .map(|(triangle, color)| {
                        let distance = (triangle.centroid() - camera.position()).length();
                        (distance, *triangle, *color)
                    })
                    .collect()
            })
            .collect();
        let mut visible: Vec<(f32, Triangle, Color)> = culled.into_iter().flatten().collect();

        // This frame's illumination is consumed; light motion flags restart.
        for (_, light) in self.world.query::<&mut Light>().iter() {
            light.set_moved(false);
        }

        // Painter's algorithm: draw far polygons first. Stays sequential and
        // completes before anything is emitted.
        visible.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut draw_list = DrawList::with_capacity(visible.len());
        for (_, triangle, color) in &visible {
            if let Some(points) = self.camera.project_triangle(triangle, viewport) {
                draw_list.push(DrawCommand {
                    points,
                    color: color.to_rgb8(),
                });
            }
        }

        log::debug!(
            "frame: {} bodies, {} lights, {} visible polygons, {} drawn",
            bodies.len(),
            lights.len(),
            visible.len(),
            draw_list.len()
        );

        draw_list
    }

    /// Renders one frame and hands the draw list to the surface in a single
    /// batch.
    pub fn render_to(&mut self, surface: &mut impl PaintSurface) {
        let viewport = surface.viewport();
        let draw_list = self.render(viewport);
        surface.present(&draw_list);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;
    use crate::shapes;
    use glam::Vec3;

    fn test_scene() -> Scene {
        Scene::new(RenderSettings::default())
    }

    #[test]
    fn spawned_entities_are_counted() {
        let mut scene = test_scene();
        let settings = *scene.settings();

        scene.spawn_body(Body::new(
            shapes::cube(1.0, 1, Color::WHITE),
            &settings,
        ));
        scene.spawn_light(Light::point(Vec3::Z, Color::WHITE, 1.0, &settings));

        assert_eq!(scene.body_count(), 1);
        assert_eq!(scene.light_count(), 1);
    }

    #[test]
    fn despawn_removes_entity_and_cache_entry() {
        let mut scene = test_scene();
        let settings = *scene.settings();

        let body = Body::new(
            vec![Polygon::new(
                Triangle::new(Vec3::X, Vec3::Y, Vec3::Z),
                Color::WHITE,
            )],
            &settings,
        );
        let entity = scene.spawn_body(body);
        scene.render(Vec2::new(100.0, 100.0));

        let generation = scene.body_mut(entity).map(|body| body.generation());
        assert!(
            scene
                .lighting_mut()
                .lookup(entity, generation.expect("body exists"), &[])
                .is_some(),
            "Rendering should have populated the cache"
        );

        assert!(scene.despawn(entity));
        assert_eq!(scene.body_count(), 0);
        assert!(scene.lighting_mut().lookup(entity, 0, &[]).is_none());
        assert!(!scene.despawn(entity), "Second despawn reports failure");
    }

    #[test]
    fn empty_scene_renders_an_empty_draw_list() {
        let mut scene = test_scene();
        let draw_list = scene.render(Vec2::new(640.0, 480.0));
        assert!(draw_list.is_empty());
    }
}
