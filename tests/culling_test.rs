use glitter_ngin::{
    camera::{Camera, Projection},
    cgmath::{Deg, Matrix4, Point3, SquareMatrix, Vector3},
    culling::{Aabb, CullMode, Frustum, Plane, is_visible},
};

mod common;

fn origin_frustum() -> Frustum {
    Frustum::from_view_projection(&common::origin_frame().view_projection())
}

#[test]
fn identity_matrix_yields_the_clip_cube() {
    let frustum = Frustum::from_view_projection(&Matrix4::identity());
    assert_eq!(
        frustum.planes,
        [
            Plane::new(1.0, 0.0, 0.0, 1.0),
            Plane::new(-1.0, 0.0, 0.0, 1.0),
            Plane::new(0.0, 1.0, 0.0, 1.0),
            Plane::new(0.0, -1.0, 0.0, 1.0),
            Plane::new(0.0, 0.0, 1.0, 1.0),
            Plane::new(0.0, 0.0, -1.0, 1.0),
        ]
    );
}

#[test]
fn extraction_is_deterministic() {
    let view_proj = common::origin_frame().view_projection();
    let a = Frustum::from_view_projection(&view_proj);
    let b = Frustum::from_view_projection(&view_proj);
    for (pa, pb) in a.planes.iter().zip(b.planes.iter()) {
        assert_eq!(pa.a.to_bits(), pb.a.to_bits());
        assert_eq!(pa.b.to_bits(), pb.b.to_bits());
        assert_eq!(pa.c.to_bits(), pb.c.to_bits());
        assert_eq!(pa.d.to_bits(), pb.d.to_bits());
    }
}

#[test]
fn points_inside_and_outside() {
    let frustum = origin_frustum();
    assert!(frustum.contains_point(Point3::new(0.0, 0.0, -10.0)));
    // behind the camera
    assert!(!frustum.contains_point(Point3::new(0.0, 0.0, 10.0)));
    // closer than the near plane
    assert!(!frustum.contains_point(Point3::new(0.0, 0.0, -0.05)));
    // beyond the far plane
    assert!(!frustum.contains_point(Point3::new(0.0, 0.0, -150.0)));
    // far off to the side
    assert!(!frustum.contains_point(Point3::new(50.0, 0.0, -10.0)));
    assert!(!frustum.planes[Frustum::RIGHT].contains(Point3::new(50.0, 0.0, -10.0)));
    assert!(frustum.planes[Frustum::LEFT].contains(Point3::new(50.0, 0.0, -10.0)));
}

#[test]
fn box_straight_ahead_is_visible_in_every_direction() {
    let projection = Projection::new(800, 600, Deg(60.0), 0.1, 100.0);
    let unit = common::unit_box();
    for yaw in (-180..180).step_by(30) {
        for pitch in (-80..=80).step_by(20) {
            let camera = Camera::new((1.0, 2.0, 3.0), Deg(yaw as f32), Deg(pitch as f32));
            let frustum = Frustum::from_view_projection(&camera.frame(&projection).view_projection());
            let target = camera.target(10.0);
            let corners = unit.world_corners(
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(target.x, target.y, target.z),
            );
            for mode in [CullMode::CornerExistence, CullMode::PlaneDistance] {
                assert!(
                    is_visible(&frustum, &corners, mode),
                    "yaw {} pitch {} {:?}",
                    yaw,
                    pitch,
                    mode
                );
            }
        }
    }
}

#[test]
fn box_behind_camera_is_culled_in_both_modes() {
    let frustum = origin_frustum();
    let corners = common::unit_box().world_corners(Vector3::new(1.0, 1.0, 1.0), Vector3::new(0.0, 0.0, 10.0));
    assert!(!is_visible(&frustum, &corners, CullMode::CornerExistence));
    assert!(!is_visible(&frustum, &corners, CullMode::PlaneDistance));
}

#[test]
fn corner_existence_culls_large_straddling_boxes() {
    // Spans the whole view but every corner lies outside a side plane.
    let frustum = origin_frustum();
    let wall = Aabb::new(Point3::new(-100.0, -100.0, -5.0), Point3::new(100.0, 100.0, -4.0));
    let corners = wall.corners();

    assert!(!is_visible(&frustum, &corners, CullMode::CornerExistence));
    assert!(is_visible(&frustum, &corners, CullMode::PlaneDistance));
}

#[test]
fn world_corners_scale_then_translate() {
    let corners = common::unit_box().world_corners(Vector3::new(2.0, 4.0, 6.0), Vector3::new(10.0, 0.0, -1.0));
    assert_eq!(corners[0], Point3::new(9.0, -2.0, -4.0));
    assert_eq!(corners[7], Point3::new(11.0, 2.0, 2.0));
}

#[test]
fn bounds_fold_from_positions() {
    assert_eq!(Aabb::from_positions(Vec::<[f32; 3]>::new()), None);
    let aabb = Aabb::from_positions([[1.0, -2.0, 3.0], [-1.0, 5.0, 0.0], [0.0, 0.0, 0.0]]).unwrap();
    assert_eq!(aabb.min, Point3::new(-1.0, -2.0, 0.0));
    assert_eq!(aabb.max, Point3::new(1.0, 5.0, 3.0));
    assert_eq!(aabb.center(), Point3::new(0.0, 1.5, 1.5));
}

#[test]
fn cull_mode_cycles() {
    assert_eq!(CullMode::default(), CullMode::CornerExistence);
    assert_eq!(CullMode::CornerExistence.next(), CullMode::PlaneDistance);
    assert_eq!(CullMode::PlaneDistance.next(), CullMode::CornerExistence);
}
