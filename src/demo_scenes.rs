use std::f32::consts::TAU;

use glam::Vec3;
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use polypaint::color::Color;
use polypaint::scene::{Body, Light, Scene};
use polypaint::settings::RenderSettings;
use polypaint::shapes;

const PALETTE: [Color; 5] = [
    Color::new(220.0, 80.0, 70.0),
    Color::new(90.0, 200.0, 120.0),
    Color::new(80.0, 120.0, 230.0),
    Color::new(235.0, 200.0, 90.0),
    Color::new(200.0, 110.0, 220.0),
];

#[allow(dead_code)]
#[derive(Clone, Copy, Debug)]
pub enum DemoScene {
    CubeField,
    SphereShowcase,
}

impl DemoScene {
    pub fn build(self, settings: RenderSettings) -> Scene {
        match self {
            DemoScene::CubeField => cube_field(settings),
            DemoScene::SphereShowcase => sphere_showcase(settings),
        }
    }

    /// Orbit radius and height for the default camera path.
    pub fn orbit(self) -> (f32, f32) {
        match self {
            DemoScene::CubeField => (18.0, 9.0),
            DemoScene::SphereShowcase => (14.0, 6.0),
        }
    }
}

fn cube_field(settings: RenderSettings) -> Scene {
    info!("Creating cube field scene...");

    let mut scene = Scene::new(settings);

    // Sky shell; winding inverted so the inside faces the camera.
    scene.spawn_body(
        Body::new(shapes::cube(80.0, 2, Color::rgb(16, 20, 38)), &settings)
            .with_inverted_winding(),
    );

    // Ground slab, a cube flattened along z.
    scene.spawn_body(
        Body::new(shapes::cube(50.0, 4, Color::rgb(70, 80, 70)), &settings)
            .with_scale(Vec3::new(1.0, 1.0, 0.02))
            .with_position(Vec3::new(0.0, 0.0, -1.0)),
    );

    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..14 {
        let side = rng.gen_range(0.8..2.2);
        let position = Vec3::new(
            rng.gen_range(-12.0..12.0),
            rng.gen_range(-12.0..12.0),
            side / 2.0 - 0.5,
        );
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        scene.spawn_body(
            Body::new(shapes::cube(side, 2, color), &settings)
                .with_position(position)
                .with_direction(Vec3::new(0.0, 0.0, rng.gen_range(0.0..90.0))),
        );
    }

    for _ in 0..3 {
        let radius = rng.gen_range(1.0..1.8);
        let position = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            radius - 0.5,
        );
        let color = PALETTE[rng.gen_range(0..PALETTE.len())];
        scene.spawn_body(
            Body::new(shapes::uv_sphere(radius, 8, color), &settings).with_position(position),
        );
    }

    scene.spawn_light(Light::spot(
        Vec3::new(6.0, -4.0, 14.0),
        Vec3::new(-0.4, 0.3, -1.0),
        55.0,
        Color::rgb(255, 230, 180),
        16.0,
        &settings,
    ));
    scene.spawn_light(Light::point(
        Vec3::new(-10.0, 8.0, 6.0),
        Color::rgb(150, 180, 255),
        8.0,
        &settings,
    ));

    info!(
        "Cube field scene: {} bodies, {} lights",
        scene.body_count(),
        scene.light_count()
    );

    scene
}

fn sphere_showcase(settings: RenderSettings) -> Scene {
    info!("Creating sphere showcase scene...");

    let mut scene = Scene::new(settings);

    scene.spawn_body(
        Body::new(shapes::uv_sphere(60.0, 6, Color::rgb(12, 12, 18)), &settings)
            .with_inverted_winding(),
    );

    scene.spawn_body(Body::new(
        shapes::uv_sphere(3.0, 12, Color::rgb(235, 235, 235)),
        &settings,
    ));

    let ring = 8;
    for step in 0..ring {
        let angle = step as f32 / ring as f32 * TAU;
        let position = Vec3::new(angle.cos() * 6.0, angle.sin() * 6.0, 0.0);
        scene.spawn_body(
            Body::new(
                shapes::uv_sphere(0.8, 6, Color::rgb(200, 200, 210)),
                &settings,
            )
            .with_position(position),
        );
    }

    // One spot per primary, aimed back at the center.
    let beams = [
        Color::rgb(255, 60, 60),
        Color::rgb(60, 255, 60),
        Color::rgb(60, 60, 255),
    ];
    for (step, color) in beams.into_iter().enumerate() {
        let angle = step as f32 / beams.len() as f32 * TAU;
        let position = Vec3::new(angle.cos() * 10.0, angle.sin() * 10.0, 6.0);
        scene.spawn_light(Light::spot(position, -position, 40.0, color, 12.0, &settings));
    }

    info!(
        "Sphere showcase scene: {} bodies, {} lights",
        scene.body_count(),
        scene.light_count()
    );

    scene
}
