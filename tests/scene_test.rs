use glitter_ngin::{
    config::SpawnConfig,
    culling::Aabb,
    data_structures::spawn::Spawner,
    error::SceneError,
    flow::Scene,
};

mod common;

fn settings() -> SpawnConfig {
    SpawnConfig {
        extent: 5.0,
        scale: [0.5, 2.0],
        initial: 0,
    }
}

#[test]
fn spawned_nodes_stay_in_range() {
    let mut spawner = Spawner::seeded(7, &settings(), 3, 2);
    for _ in 0..200 {
        let node = spawner.next_node();
        for axis in [node.position.x, node.position.y, node.position.z] {
            assert!((-5.0..=5.0).contains(&axis));
        }
        for axis in [node.scale.x, node.scale.y, node.scale.z] {
            assert!((0.5..2.0).contains(&axis));
        }
        assert!(node.mesh < 3);
        assert!(node.texture < 2);
        assert!(node.animate || (node.opacity > 0.0 && node.opacity <= 1.0));
    }
}

#[test]
fn unusable_ranges_are_clamped_instead_of_panicking() {
    let settings = SpawnConfig {
        extent: f32::INFINITY,
        scale: [f32::NAN, -3.0],
        initial: 0,
    };
    let mut spawner = Spawner::seeded(3, &settings, 1, 1);
    for _ in 0..50 {
        let node = spawner.next_node();
        assert_eq!(node.position.x, 0.0);
        assert_eq!(node.position.z, 0.0);
        for axis in [node.scale.x, node.scale.y, node.scale.z] {
            assert!((1.0..3.0).contains(&axis));
        }
    }
}

#[test]
fn seeded_spawners_repeat() {
    let mut a = Spawner::seeded(42, &settings(), 4, 4);
    let mut b = Spawner::seeded(42, &settings(), 4, 4);
    for _ in 0..20 {
        assert_eq!(a.next_node(), b.next_node());
    }
}

fn scene(max_nodes: usize) -> Scene<Aabb, ()> {
    let spawner = Spawner::seeded(1, &settings(), 1, 1);
    Scene::new(max_nodes, vec![common::unit_box()], vec![()], spawner)
}

#[test]
fn spawn_checks_assets() {
    let mut scene = scene(4);

    let mut node = common::node_ahead(-1.0);
    node.mesh = 5;
    assert_eq!(scene.spawn(node), Err(SceneError::UnknownMesh(5)));

    let mut node = common::node_ahead(-1.0);
    node.texture = 2;
    assert_eq!(scene.spawn(node), Err(SceneError::UnknownTexture(2)));

    assert!(scene.spawn(common::node_ahead(-1.0)).is_ok());
    assert_eq!(scene.nodes.len(), 1);
}

#[test]
fn random_spawns_respect_capacity() {
    let mut scene = scene(10);
    assert_eq!(scene.spawn_random(4), 4);
    assert_eq!(scene.spawn_random(16), 6);
    assert_eq!(scene.spawn_random(1), 0);
    assert_eq!(scene.nodes.len(), 10);
}
