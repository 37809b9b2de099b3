//! `GameScene` integration tests: loading, player input and movement
//! against walls, firing, and a full headless arena run.

use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use glam::Vec3;

use arenacore::autopilot::Autopilot;
use arenacore::components::collider::Aabb;
use arenacore::components::mesh::{Geometry, Mesh, Texture};
use arenacore::entities::bullet::{heading_vector, Bullet};
use arenacore::entities::playertank::PlayerTank;
use arenacore::entities::shooteffect::ShootEffect;
use arenacore::entities::wall::Wall;
use arenacore::entities::{EntityKind, GameEntity};
use arenacore::error::LoadError;
use arenacore::events::input::{InputAction, InputEvent};
use arenacore::game::GameScene;
use arenacore::resources::assetstore::{AssetStore, Model};
use arenacore::resources::gameconfig::GameConfig;
use arenacore::resources::presenter::LogPresenter;

const EPSILON: f32 = 1e-5;

fn texture(name: &str) -> Texture {
    Texture {
        name: name.to_string(),
        path: PathBuf::from(format!("textures/{name}.png")),
    }
}

fn part(name: &str, min: Vec3, max: Vec3) -> Mesh {
    Mesh {
        name: name.to_string(),
        geometry: Some(Geometry::Imported {
            bounds: Aabb::new(min, max),
        }),
        ..Mesh::group()
    }
}

fn memory_assets(with_model: bool) -> AssetStore {
    let mut assets = AssetStore::in_memory();
    for name in ["tank-body", "tank-turret", "wall"] {
        assets.insert_texture(texture(name));
    }
    assets.insert_ground_texture(texture("g1"));
    if with_model {
        assets.insert_model(Model {
            name: "tank".to_string(),
            parts: vec![
                part("Body", Vec3::new(-0.3, -0.4, 0.0), Vec3::new(0.3, 0.4, 0.2)),
                part("Turret", Vec3::new(-0.15, -0.15, 0.2), Vec3::new(0.15, 0.15, 0.3)),
            ],
        });
    }
    assets
}

fn scene_with(entities: Vec<Box<dyn GameEntity>>) -> GameScene {
    let mut scene = GameScene::new(
        GameConfig::new(),
        Box::new(memory_assets(true)),
        LogPresenter::new(0),
    );
    for entity in entities {
        scene.stage(entity);
    }
    pollster::block_on(scene.load()).unwrap();
    scene
}

fn press(scene: &mut GameScene, action: InputAction) {
    pollster::block_on(scene.handle_input(InputEvent::press(action))).unwrap();
}

#[test]
fn load_failure_is_surfaced() {
    let mut scene = GameScene::new(
        GameConfig::new(),
        Box::new(memory_assets(false)),
        LogPresenter::new(0),
    );
    scene.stage(Box::new(Wall::new(Vec3::ZERO)));
    scene.stage(Box::new(PlayerTank::new(Vec3::new(3.0, 3.0, 0.0))));
    scene.stage(Box::new(Wall::new(Vec3::new(6.0, 0.0, 0.0))));

    let err = pollster::block_on(scene.load()).unwrap_err();
    assert!(matches!(err, LoadError::MissingModel(name) if name == "tank"));
    assert_eq!(scene.registry().pending_len(), 1);
    assert_eq!(scene.staged_len(), 0);
}

#[test]
fn input_before_the_first_frame_reaches_the_pending_player() {
    let mut scene = scene_with(vec![
        Box::new(Wall::new(Vec3::new(6.0, 6.0, 0.0))),
        Box::new(PlayerTank::new(Vec3::new(3.0, 3.0, 0.0)).with_rotation(FRAC_PI_2)),
    ]);
    assert!(scene.registry().is_empty());

    press(&mut scene, InputAction::MoveUp);
    assert!(scene.player().unwrap().keyboard().up);
    let fired = pollster::block_on(scene.handle_input(InputEvent::release(InputAction::Fire)))
        .unwrap()
        .unwrap();
    assert_eq!(scene.registry().pending_len(), 4);

    scene.step(0.1);
    let order: Vec<_> = scene.registry().live().map(|e| e.entity.kind()).collect();
    assert_eq!(order[..2], [EntityKind::General, EntityKind::Player]);
    assert_eq!(scene.registry().count_kind(EntityKind::Bullet), 1);
    assert!(scene.registry().get(fired).is_some());

    let position = scene.player().unwrap().position();
    assert!((position - Vec3::new(3.2, 3.0, 0.0)).length() < EPSILON);
}

#[test]
fn input_without_a_loaded_player_is_dropped() {
    let mut scene = scene_with(vec![Box::new(Wall::new(Vec3::ZERO))]);
    let fired = pollster::block_on(scene.handle_input(InputEvent::release(InputAction::Fire)));
    assert!(fired.unwrap().is_none());
    assert_eq!(scene.registry().pending_len(), 1);
}

#[test]
fn player_stops_exactly_where_the_wall_predicate_says() {
    let mut scene = scene_with(vec![
        Box::new(Wall::new(Vec3::ZERO)),
        Box::new(PlayerTank::new(Vec3::new(-2.0, 0.0, 0.0)).with_rotation(FRAC_PI_2)),
    ]);
    scene.step(0.0);
    press(&mut scene, InputAction::MoveUp);

    let wall_sphere = scene
        .registry()
        .live()
        .find(|e| e.entity.as_any().is::<Wall>())
        .and_then(|e| e.entity.collider().copied())
        .unwrap()
        .bounding_sphere();

    let dt = 0.005;
    let mut accepted = 0;
    let mut blocked_once = false;
    for _ in 0..400 {
        let player = scene.player().unwrap();
        let before = player.position();
        let sphere = player.collider().unwrap().bounding_sphere();
        let translation = heading_vector(player.rotation()) * player.tuning().move_speed * dt;
        let expect_blocked = sphere.translated(translation).intersects(&wall_sphere);

        scene.step(dt);

        let after = scene.player().unwrap().position();
        if expect_blocked {
            assert_eq!(after, before);
            blocked_once = true;
        } else {
            assert!(!blocked_once, "a blocked player must stay blocked");
            assert!((after - (before + translation)).length() < EPSILON);
            assert!((after.x - before.x - 0.01).abs() < EPSILON);
            accepted += 1;
        }
    }
    assert!(blocked_once);
    assert!(accepted > 0);
    let stop = scene.player().unwrap().position();
    assert!(stop.x < 0.0);
    assert!((scene.camera().position.x - stop.x).abs() < EPSILON);
}

#[test]
fn releasing_fire_spawns_one_bullet_with_current_heading() {
    let mut scene = scene_with(vec![Box::new(
        PlayerTank::new(Vec3::new(5.0, 5.0, 0.0)).with_rotation(FRAC_PI_2),
    )]);
    scene.step(0.0);

    let pressed = pollster::block_on(scene.handle_input(InputEvent::press(InputAction::Fire)));
    assert!(pressed.unwrap().is_none());
    assert_eq!(scene.registry().pending_len(), 0);

    let id = pollster::block_on(scene.handle_input(InputEvent::release(InputAction::Fire)))
        .unwrap()
        .unwrap();
    assert_eq!(scene.registry().pending_len(), 2);

    scene.step(0.1);
    assert_eq!(scene.registry().count_kind(EntityKind::Bullet), 1);
    let bullet = scene
        .registry()
        .get(id)
        .and_then(|e| e.as_any().downcast_ref::<Bullet>())
        .unwrap();
    assert!((bullet.angle() - FRAC_PI_2).abs() < EPSILON);
    let expected = Vec3::new(5.3 + 0.9, 5.0, 0.0);
    assert!((bullet.position() - expected).length() < EPSILON);
    assert!(scene
        .registry()
        .live()
        .any(|e| e.entity.as_any().is::<ShootEffect>()));
}

#[test]
fn shutdown_disposes_everything() {
    let mut scene = scene_with(vec![
        Box::new(Wall::new(Vec3::ZERO)),
        Box::new(PlayerTank::new(Vec3::new(4.0, 4.0, 0.0))),
    ]);
    scene.step(0.0);
    pollster::block_on(scene.handle_input(InputEvent::release(InputAction::Fire))).unwrap();
    assert_eq!(scene.registry().pending_len(), 2);

    scene.shutdown();
    assert!(scene.registry().is_empty());
    assert_eq!(scene.registry().pending_len(), 0);
}

#[test]
fn headless_arena_run_keeps_the_player_inside() {
    let mut config = GameConfig::new();
    config.fixed_delta = Some(1.0 / 60.0);
    fastrand::seed(5);
    let assets = AssetStore::from_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"));

    let mut scene = GameScene::new(config, Box::new(assets), LogPresenter::new(0));
    scene.populate();
    let loaded = pollster::block_on(scene.load()).unwrap();
    assert_eq!(loaded, 15 * 15 + 4 * 14 + 1);

    let mut autopilot = Autopilot::new(5).with_fire_interval(30);
    for _ in 0..600 {
        for event in autopilot.next_events() {
            pollster::block_on(scene.handle_input(event)).unwrap();
        }
        scene.frame();
    }

    let player = scene.player().unwrap();
    let position = player.position();
    assert!(position.x > 0.0 && position.x < 14.0);
    assert!(position.y > 0.0 && position.y < 14.0);
    assert_eq!(scene.world_time().frame_count, 600);
    assert!((scene.world_time().elapsed - 10.0).abs() < 1e-2);
    assert_eq!(scene.registry().count_kind(EntityKind::Player), 1);
}
