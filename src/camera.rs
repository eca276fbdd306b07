//! Fly camera, perspective projection and keyboard/mouse controller.
//!
//! The camera produces a [`CameraFrame`] once per frame: the eye position,
//! the view matrix and an OpenGL style projection. Frustum planes are
//! extracted from that projection, the GPU gets it with
//! [`OPENGL_TO_WGPU_MATRIX`] applied.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Remaps OpenGL clip depth `[-1, 1]` to wgpu's `[0, 1]`.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// Everything the frame packer needs to know about the camera for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub eye: Point3<f32>,
    pub view: Matrix4<f32>,
    /// OpenGL convention (`-w <= z <= w`).
    pub projection: Matrix4<f32>,
}

impl CameraFrame {
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: Rad(0.0),
        };
        camera.set_pitch(pitch.into());
        camera
    }

    pub fn yaw(&self) -> Rad<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Rad<f32> {
        self.pitch
    }

    /// Pitch is clamped just short of straight up/down to keep `look_to` stable.
    pub fn set_pitch(&mut self, pitch: Rad<f32>) {
        self.pitch = Rad(pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2));
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    /// The point `distance` units straight ahead.
    pub fn target(&self, distance: f32) -> Point3<f32> {
        self.position + self.forward() * distance
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }

    pub fn frame(&self, projection: &Projection) -> CameraFrame {
        CameraFrame {
            eye: self.position,
            view: self.calc_matrix(),
            projection: projection.calc_matrix(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn znear(&self) -> f32 {
        self.znear
    }

    pub fn zfar(&self) -> f32 {
        self.zfar
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Moves the camera with WASD or the arrow keys, rises and sinks with E/Q
/// and turns it by the mouse deltas it is fed.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    scroll: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            scroll: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Returns `true` if the key moves the camera.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state == ElementState::Pressed { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => self.amount_forward = amount,
            KeyCode::KeyS | KeyCode::ArrowDown => self.amount_backward = amount,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.amount_left = amount,
            KeyCode::KeyD | KeyCode::ArrowRight => self.amount_right = amount,
            KeyCode::KeyE => self.amount_up = amount,
            KeyCode::KeyQ => self.amount_down = amount,
            _ => return false,
        }
        true
    }

    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.rotate_horizontal = dx as f32;
        self.rotate_vertical = dy as f32;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.process_keyboard(*key, *state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll = match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => -scroll * 0.5,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
            }
            _ => (),
        }
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = camera.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        camera.position += forward * (self.amount_forward - self.amount_backward) * self.speed * dt;
        camera.position += right * (self.amount_right - self.amount_left) * self.speed * dt;

        // zoom along the view direction
        camera.position -= camera.forward() * self.scroll * self.speed * self.sensitivity * dt;
        self.scroll = 0.0;

        camera.position.y += (self.amount_up - self.amount_down) * self.speed * dt;

        camera.yaw += Rad(self.rotate_horizontal) * self.sensitivity * dt;
        let pitch = camera.pitch + Rad(-self.rotate_vertical) * self.sensitivity * dt;
        camera.set_pitch(pitch);

        self.rotate_horizontal = 0.0;
        self.rotate_vertical = 0.0;
    }
}
