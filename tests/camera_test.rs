use std::time::Duration;

use glitter_ngin::{
    camera::{Camera, CameraController, OPENGL_TO_WGPU_MATRIX},
    cgmath::{Deg, InnerSpace, Point3, Rad, Vector3, Vector4},
    data_structures::uniform::SharedFrameRecord,
};
use winit::{event::ElementState, keyboard::KeyCode};

mod common;

#[test]
fn yaw_minus_ninety_looks_down_negative_z() {
    let (camera, _) = common::origin_camera();
    let forward = camera.forward();
    assert!((forward - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-6);
    assert!((camera.target(10.0) - Point3::new(0.0, 0.0, -10.0)).magnitude() < 1e-5);
}

#[test]
fn pitch_is_clamped() {
    let mut camera = Camera::new((0.0, 0.0, 0.0), Deg(0.0), Deg(120.0));
    assert!(camera.pitch().0 < std::f32::consts::FRAC_PI_2);
    camera.set_pitch(Rad(-10.0));
    assert!(camera.pitch().0 > -std::f32::consts::FRAC_PI_2);
}

#[test]
fn controller_moves_forward() {
    let (mut camera, _) = common::origin_camera();
    let mut controller = CameraController::new(10.0, 0.4);
    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    assert!(!controller.process_keyboard(KeyCode::KeyF, ElementState::Pressed));

    controller.update(&mut camera, Duration::from_millis(500));
    assert!((camera.position - Point3::new(0.0, 0.0, -5.0)).magnitude() < 1e-4);

    controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
    controller.update(&mut camera, Duration::from_millis(500));
    assert!((camera.position - Point3::new(0.0, 0.0, -5.0)).magnitude() < 1e-4);
}

#[test]
fn shared_record_uses_wgpu_depth_range() {
    let frame = common::origin_frame();
    let record = SharedFrameRecord::new(&frame, &common::light());
    let projection = glitter_ngin::cgmath::Matrix4::from(record.projection);
    assert_eq!(projection, OPENGL_TO_WGPU_MATRIX * frame.projection);

    // A point on the near plane lands at depth 0, one on the far plane at depth 1.
    for (z, depth) in [(-0.1, 0.0), (-100.0, 1.0)] {
        let clip = projection * frame.view * Vector4::new(0.0, 0.0, z, 1.0);
        assert!((clip.z / clip.w - depth).abs() < 1e-4, "z {} -> {}", z, clip.z / clip.w);
    }
}
