//! End-to-end checks of the frame pipeline: lighting cache, culling,
//! depth order, and surface delivery.

use glam::{Vec2, Vec3};
use polypaint::color::Color;
use polypaint::geometry::{Polygon, Triangle};
use polypaint::scene::{Body, Camera, Light, Scene};
use polypaint::settings::RenderSettings;
use polypaint::shapes;
use polypaint::surface::RecordingSurface;

const VIEWPORT: Vec2 = Vec2::new(640.0, 480.0);

/// Triangle at the given depth along +Y, wound so its normal faces the
/// origin.
fn front_triangle(depth: f32) -> Triangle {
    Triangle::new(
        Vec3::new(-0.5, depth, -0.5),
        Vec3::new(0.5, depth, -0.5),
        Vec3::new(0.0, depth, 0.5),
    )
}

fn single_polygon_body(depth: f32, color: Color, settings: &RenderSettings) -> Body {
    Body::new(vec![Polygon::new(front_triangle(depth), color)], settings)
}

#[test]
fn draw_order_is_farthest_first() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    scene.spawn_body(single_polygon_body(1.0, Color::rgb(255, 0, 0), &settings));
    scene.spawn_body(single_polygon_body(5.0, Color::rgb(0, 255, 0), &settings));
    scene.spawn_body(single_polygon_body(10.0, Color::rgb(0, 0, 255), &settings));

    let frame = scene.render(VIEWPORT);
    assert_eq!(frame.len(), 3, "all three polygons face the camera");

    let colors: Vec<[u8; 3]> = frame.iter().map(|command| command.color).collect();
    assert_eq!(
        colors,
        vec![[0, 0, 255], [0, 255, 0], [255, 0, 0]],
        "commands should run far to near"
    );
}

#[test]
fn second_render_hits_the_lighting_cache() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    scene.spawn_body(single_polygon_body(5.0, Color::WHITE, &settings));
    scene.spawn_light(Light::point(
        Vec3::new(0.0, 5.0, 4.0),
        Color::WHITE,
        5.0,
        &settings,
    ));

    scene.render(VIEWPORT);
    let first = scene.lighting().stats();
    assert_eq!(first.misses, 1);
    assert_eq!(first.hits, 0);
    assert_eq!(first.evaluations, 1, "one polygon times one light");

    scene.render(VIEWPORT);
    let second = scene.lighting().stats();
    assert_eq!(second.hits, 1, "static frame should reuse stored lighting");
    assert_eq!(second.misses, 1);
    assert_eq!(second.evaluations, first.evaluations);
}

#[test]
fn body_motion_invalidates_the_cache() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    let entity = scene.spawn_body(single_polygon_body(5.0, Color::WHITE, &settings));
    scene.spawn_light(Light::point(Vec3::Z, Color::WHITE, 2.0, &settings));
    scene.render(VIEWPORT);

    scene
        .body_mut(entity)
        .expect("body exists")
        .set_position(Vec3::new(0.0, 1.0, 0.0));
    scene.render(VIEWPORT);

    let stats = scene.lighting().stats();
    assert_eq!(stats.misses, 2, "moved body should be reshaded");
    assert_eq!(stats.hits, 0);
}

#[test]
fn light_motion_invalidates_the_cache() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    scene.spawn_body(single_polygon_body(5.0, Color::WHITE, &settings));
    let light = scene.spawn_light(Light::point(Vec3::Z, Color::WHITE, 2.0, &settings));
    scene.render(VIEWPORT);

    scene
        .light_mut(light)
        .expect("light exists")
        .set_position(Vec3::new(0.0, 0.0, 3.0));
    scene.render(VIEWPORT);

    let stats = scene.lighting().stats();
    assert_eq!(stats.misses, 2, "moved light should reshade every body");
    assert_eq!(stats.hits, 0);
}

#[test]
fn light_moved_flags_clear_after_a_frame() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    let light = scene.spawn_light(Light::point(Vec3::Z, Color::WHITE, 2.0, &settings));
    assert!(scene.light_mut(light).expect("light exists").moved());

    scene.render(VIEWPORT);
    assert!(
        !scene.light_mut(light).expect("light exists").moved(),
        "rendering should consume the moved flag"
    );

    scene
        .light_mut(light)
        .expect("light exists")
        .set_position(Vec3::new(1.0, 0.0, 0.0));
    assert!(scene.light_mut(light).expect("light exists").moved());
    scene.render(VIEWPORT);
    assert!(!scene.light_mut(light).expect("light exists").moved());
}

#[test]
fn removing_a_light_reshades_affected_bodies() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    scene.spawn_body(single_polygon_body(5.0, Color::WHITE, &settings));
    let light = scene.spawn_light(Light::point(Vec3::Z, Color::WHITE, 2.0, &settings));
    scene.render(VIEWPORT);
    assert_eq!(scene.lighting().stats().misses, 1);

    assert!(scene.despawn(light));
    scene.render(VIEWPORT);
    assert_eq!(
        scene.lighting().stats().misses,
        2,
        "cache keyed on the old light set should not be served"
    );
}

#[test]
fn despawned_body_leaves_the_draw_list() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();

    let near = scene.spawn_body(single_polygon_body(2.0, Color::rgb(200, 0, 0), &settings));
    scene.spawn_body(single_polygon_body(6.0, Color::rgb(0, 0, 200), &settings));

    assert_eq!(scene.render(VIEWPORT).len(), 2);

    assert!(scene.despawn(near));
    let frame = scene.render(VIEWPORT);
    assert_eq!(frame.len(), 1);
    assert_eq!(frame[0].color, [0, 0, 200]);
}

#[test]
fn recording_surface_collects_identical_static_frames() {
    let mut scene = Scene::new(RenderSettings::default());
    let settings = *scene.settings();
    scene.spawn_body(single_polygon_body(5.0, Color::rgb(10, 200, 90), &settings));

    let mut surface = RecordingSurface::new(320.0, 240.0);
    scene.render_to(&mut surface);
    scene.render_to(&mut surface);

    assert_eq!(surface.frames().len(), 2);
    assert_eq!(surface.frames()[0].len(), 1);
    assert_eq!(
        surface.frames()[0], surface.frames()[1],
        "nothing moved between the frames"
    );
}

#[test]
fn replacing_the_camera_changes_the_view() {
    let settings = RenderSettings::default();
    let mut scene = Scene::new(settings);
    scene.spawn_body(single_polygon_body(5.0, Color::WHITE, &settings));

    assert!(!scene.render(VIEWPORT).is_empty());

    // Aim the replacement away from the geometry.
    scene.set_camera(Camera::new(Vec3::ZERO, -Vec3::Y, &settings));
    assert!(
        scene.render(VIEWPORT).is_empty(),
        "nothing sits in front of the reversed camera"
    );

    scene.set_camera(Camera::new(Vec3::ZERO, Vec3::Y, &settings));
    assert!(!scene.render(VIEWPORT).is_empty());
}

#[test]
fn inverted_shells_are_visible_from_inside() {
    let settings = RenderSettings::default();

    let mut outward = Scene::new(settings);
    outward.spawn_body(Body::new(shapes::cube(10.0, 2, Color::WHITE), &settings));
    assert!(
        outward.render(VIEWPORT).is_empty(),
        "outward faces seen from inside should all be culled"
    );

    let mut inverted = Scene::new(settings);
    inverted.spawn_body(
        Body::new(shapes::cube(10.0, 2, Color::WHITE), &settings).with_inverted_winding(),
    );
    assert!(
        !inverted.render(VIEWPORT).is_empty(),
        "an inside-out shell should be drawn from within"
    );
}
