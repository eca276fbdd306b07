use glitter_ngin::{
    allocator::ByteAllocator,
    camera::{Camera, Projection},
    cgmath::{Deg, EuclideanSpace, Vector3},
    culling::{Aabb, CullMode},
    data_structures::{
        node::NodeSet,
        uniform::{PerDrawRecord, SharedFrameRecord},
    },
    draw_order::Bucket,
    frame::{FramePacker, FramePlan, FrameSettings},
    render::{DrawCall, submit_draws},
};

mod common;

use common::{Recorded, RecordingSink};

fn packer(settings: FrameSettings) -> FramePacker {
    FramePacker::new(ByteAllocator::new(common::ALIGNMENT), settings)
}

fn pack(packer: &mut FramePacker, nodes: &mut NodeSet) -> FramePlan {
    packer.pack(nodes, &[common::unit_box()], &common::origin_frame(), &common::light())
}

#[test]
fn opaque_transparent_and_invisible_nodes() {
    let mut nodes = NodeSet::new(8);
    let opaque = nodes.spawn(common::node_ahead(-10.0)).unwrap();
    let transparent = nodes.spawn(common::node_ahead(-12.0).with_opacity(0.5)).unwrap();
    let invisible = nodes.spawn(common::node_ahead(-14.0).with_opacity(0.0)).unwrap();

    let mut packer = packer(FrameSettings::default());
    let plan = pack(&mut packer, &mut nodes);

    assert_eq!(plan.records(), 2);
    assert_eq!(plan.offset_of(invisible), None);
    assert_eq!(packer.allocator().size(), 3 * 256);
    assert_eq!(plan.stats.skipped, 1);

    let mut sink = RecordingSink::default();
    assert_eq!(submit_draws(&plan, &nodes, &mut sink), 2);
    assert_eq!(
        sink.events,
        vec![
            Recorded::Begin(Bucket::Opaque),
            Recorded::Draw(DrawCall {
                node: opaque,
                mesh: 0,
                texture: 0,
                offset: 256,
            }),
            Recorded::Begin(Bucket::Transparent),
            Recorded::Draw(DrawCall {
                node: transparent,
                mesh: 0,
                texture: 0,
                offset: 512,
            }),
        ]
    );
}

#[test]
fn packed_bytes_hold_the_records() {
    let mut nodes = NodeSet::new(2);
    let id = nodes.spawn(common::node_ahead(-10.0).with_opacity(0.25)).unwrap();

    let mut packer = packer(FrameSettings::default());
    let plan = pack(&mut packer, &mut nodes);
    let bytes = packer.bytes();

    let shared: SharedFrameRecord =
        bytemuck::pod_read_unaligned(&bytes[..SharedFrameRecord::SIZE as usize]);
    assert_eq!(shared.eye, [0.0, 0.0, 0.0]);
    assert_eq!(shared.light_position, [0.0, 10.0, 0.0]);

    let offset = plan.offset_of(id).unwrap() as usize;
    assert_eq!(offset % 256, 0);
    let record: PerDrawRecord =
        bytemuck::pod_read_unaligned(&bytes[offset..offset + PerDrawRecord::SIZE as usize]);
    assert_eq!(record.opacity, 0.25);
    assert_eq!(record.model[3], [0.0, 0.0, -10.0, 1.0]);
}

#[test]
fn draws_are_sorted_by_distance() {
    let mut nodes = NodeSet::new(8);
    let far = nodes.spawn(common::node_ahead(-30.0)).unwrap();
    let near = nodes.spawn(common::node_ahead(-10.0)).unwrap();
    let mid = nodes.spawn(common::node_ahead(-20.0)).unwrap();
    let t_near = nodes.spawn(common::node_ahead(-10.0).with_opacity(0.5)).unwrap();
    let t_far = nodes.spawn(common::node_ahead(-30.0).with_opacity(0.5)).unwrap();

    let mut packer = packer(FrameSettings::default());
    let plan = pack(&mut packer, &mut nodes);
    let mut sink = RecordingSink::default();
    submit_draws(&plan, &nodes, &mut sink);

    let order: Vec<_> = sink.draws().iter().map(|call| call.node).collect();
    assert_eq!(order, vec![near, mid, far, t_far, t_near]);
}

#[test]
fn culled_nodes_get_no_record() {
    let mut nodes = NodeSet::new(4);
    let ahead = nodes.spawn(common::node_ahead(-10.0)).unwrap();
    let behind = nodes.spawn(common::node_ahead(10.0)).unwrap();

    let mut packer = packer(FrameSettings::default());
    let plan = pack(&mut packer, &mut nodes);
    assert_eq!(plan.records(), 1);
    assert_eq!(plan.stats.culled, 1);
    assert!(nodes.get(behind).unwrap().culled);
    assert!(!nodes.get(ahead).unwrap().culled);
    assert_eq!(plan.offset_of(behind), None);

    packer.settings.frustum_culling = false;
    let plan = pack(&mut packer, &mut nodes);
    assert_eq!(plan.records(), 2);
    assert!(!nodes.get(behind).unwrap().culled);
}

#[test]
fn large_nodes_depend_on_the_cull_mode() {
    let mut nodes = NodeSet::new(1);
    let mut wall = common::node_ahead(-4.5);
    wall.scale = Vector3::new(200.0, 200.0, 1.0);
    let id = nodes.spawn(wall).unwrap();

    let mut packer = packer(FrameSettings::default());
    let plan = pack(&mut packer, &mut nodes);
    assert_eq!(plan.offset_of(id), None);

    packer.settings.cull_mode = CullMode::PlaneDistance;
    let plan = pack(&mut packer, &mut nodes);
    assert!(plan.offset_of(id).is_some());
}

#[test]
fn debug_boxes_cover_every_tested_node() {
    let mut nodes = NodeSet::new(4);
    nodes.spawn(common::node_ahead(-10.0)).unwrap();
    nodes.spawn(common::node_ahead(10.0)).unwrap();
    nodes.spawn(common::node_ahead(-5.0).with_opacity(0.0)).unwrap();

    let mut packer = packer(FrameSettings {
        debug_aabbs: true,
        ..Default::default()
    });
    let plan = pack(&mut packer, &mut nodes);
    assert_eq!(plan.debug_lines.len(), 2 * 24);

    packer.settings.debug_aabbs = false;
    let plan = pack(&mut packer, &mut nodes);
    assert!(plan.debug_lines.is_empty());
}

#[test]
fn unknown_meshes_are_skipped() {
    let mut nodes = NodeSet::new(2);
    let mut node = common::node_ahead(-10.0);
    node.mesh = 3;
    nodes.spawn(node).unwrap();

    let mut packer = packer(FrameSettings::default());
    let meshes: [Aabb; 1] = [common::unit_box()];
    let plan = packer.pack(&mut nodes, &meshes, &common::origin_frame(), &common::light());
    assert_eq!(plan.records(), 0);
    assert!(plan.draws().is_empty());
}

#[test]
fn unknown_meshes_clear_a_stale_culled_flag() {
    let mut nodes = NodeSet::new(1);
    let id = nodes.spawn(common::node_ahead(10.0)).unwrap();

    let mut packer = packer(FrameSettings::default());
    pack(&mut packer, &mut nodes);
    assert!(nodes.get(id).unwrap().culled);

    let no_meshes: &[Aabb] = &[];
    let plan = packer.pack(&mut nodes, no_meshes, &common::origin_frame(), &common::light());
    assert_eq!(plan.records(), 0);
    assert!(!nodes.get(id).unwrap().culled);
}

#[test]
fn nodes_beyond_the_far_plane_are_culled_in_every_direction() {
    let projection = Projection::new(800, 600, Deg(60.0), 0.1, 100.0);
    for yaw in [-90.0, 0.0, 45.0, 135.0, 200.0] {
        for pitch in [-60.0, -20.0, 0.0, 30.0, 60.0] {
            let camera = Camera::new((3.0, 1.0, -2.0), Deg(yaw), Deg(pitch));
            let frame = camera.frame(&projection);
            let mut nodes = NodeSet::new(1);
            let mut node = common::node_ahead(0.0);
            node.position = camera.target(500.0).to_vec();
            let id = nodes.spawn(node).unwrap();

            for mode in [CullMode::CornerExistence, CullMode::PlaneDistance] {
                let mut packer = packer(FrameSettings {
                    cull_mode: mode,
                    ..Default::default()
                });
                let plan =
                    packer.pack(&mut nodes, &[common::unit_box()], &frame, &common::light());
                assert_eq!(plan.offset_of(id), None, "yaw {yaw} pitch {pitch} {mode:?}");
                assert_eq!(plan.stats.culled, 1);
                assert!(nodes.get(id).unwrap().culled);
            }
        }
    }
}

#[test]
fn each_frame_starts_from_offset_zero() {
    let mut nodes = NodeSet::new(4);
    nodes.spawn(common::node_ahead(-10.0)).unwrap();
    let mut packer = packer(FrameSettings::default());

    pack(&mut packer, &mut nodes);
    let first = packer.allocator().size();
    let plan = pack(&mut packer, &mut nodes);
    assert_eq!(packer.allocator().size(), first);
    assert_eq!(FramePlan::SHARED_OFFSET, 0);
    assert_eq!(plan.records(), 1);
}
