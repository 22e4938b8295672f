mod demo_scenes;

use demo_scenes::DemoScene;
use glam::Vec3;
use log::info;

use polypaint::scene::Light;
use polypaint::settings::RenderSettings;
use polypaint::surface::RecordingSurface;

//const ACTIVE_SCENE: DemoScene = DemoScene::SphereShowcase;
const ACTIVE_SCENE: DemoScene = DemoScene::CubeField;

const FRAMES: usize = 240;

fn main() {
    polypaint::init_logging();

    info!("Starting painter demo");

    let settings = RenderSettings::load();
    let mut scene = ACTIVE_SCENE.build(settings);
    let mut surface = RecordingSurface::new(1280.0, 720.0);

    let moving_light = scene
        .world
        .query::<&Light>()
        .iter()
        .next()
        .map(|(entity, _)| entity);

    let (radius, height) = ACTIVE_SCENE.orbit();
    for frame in 0..FRAMES {
        let angle = frame as f32 / FRAMES as f32 * std::f32::consts::TAU;
        let eye = Vec3::new(angle.cos() * radius, angle.sin() * radius, height);
        let camera = scene.camera_mut();
        camera.set_position(eye);
        camera.set_direction(-eye);

        // Nudge one light halfway through to exercise cache invalidation.
        if frame == FRAMES / 2 {
            if let Some(entity) = moving_light {
                if let Some(mut light) = scene.light_mut(entity) {
                    let shifted = light.position() + Vec3::new(0.0, 0.0, 3.0);
                    light.set_position(shifted);
                }
            }
        }

        scene.render_to(&mut surface);
    }

    let drawn: usize = surface.frames().iter().map(Vec::len).sum();
    let stats = scene.lighting().stats();
    info!(
        "Rendered {} frames, {} triangles drawn, lighting cache: {} hits / {} misses / {} evaluations",
        surface.frames().len(),
        drawn,
        stats.hits,
        stats.misses,
        stats.evaluations
    );
}
