//! Fly camera for looking around the cloud layer.
//!
//! Hold the right mouse button to look, WASD to move, Space/Ctrl to rise and
//! sink, Shift to go faster and scroll to change the field of view.

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::camera::{
    BOOST, FAR, FOV_DEGREES, FOV_SCROLL_SPEED, MAX_FOV_DEGREES, MIN_FOV_DEGREES, NEAR, PITCH_LIMIT,
};
use crate::ui::Settings;

pub struct FlyCameraPlugin;

impl Plugin for FlyCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_fly_camera)
            .add_systems(Update, (camera_look, camera_movement, camera_zoom));
    }
}

/// Fly camera state
#[derive(Component, Debug, Clone)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    /// Current FOV in degrees
    pub fov_degrees: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            fov_degrees: FOV_DEGREES,
        }
    }
}

impl FlyCamera {
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Apply a mouse delta. Pitch is clamped short of straight up/down.
    pub fn look(&mut self, delta: Vec2, sensitivity: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Apply a scroll amount. Scrolling up narrows the view.
    pub fn zoom(&mut self, scroll: f32) {
        self.fov_degrees =
            (self.fov_degrees - scroll * FOV_SCROLL_SPEED).clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
    }

    pub fn projection(&self) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            fov: self.fov_degrees.to_radians(),
            near: NEAR,
            far: FAR,
            ..default()
        })
    }
}

/// Keys held this frame, reduced to the axes they move along.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// +1 forward, -1 back
    pub forward: f32,
    /// +1 right, -1 left
    pub right: f32,
    /// +1 up, -1 down
    pub up: f32,
    pub boost: bool,
}

impl MoveInput {
    pub fn from_keys(keyboard: &ButtonInput<KeyCode>) -> Self {
        let axis = |pos: bool, neg: bool| (pos as i8 - neg as i8) as f32;
        Self {
            forward: axis(
                keyboard.pressed(KeyCode::KeyW),
                keyboard.pressed(KeyCode::KeyS),
            ),
            right: axis(
                keyboard.pressed(KeyCode::KeyD),
                keyboard.pressed(KeyCode::KeyA),
            ),
            up: axis(
                keyboard.pressed(KeyCode::Space),
                keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]),
            ),
            boost: keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]),
        }
    }

    /// Displacement for one frame, relative to the camera's orientation.
    pub fn displacement(&self, transform: &Transform, speed: f32, delta_secs: f32) -> Vec3 {
        let direction = transform.forward().as_vec3() * self.forward
            + transform.right().as_vec3() * self.right
            + transform.up().as_vec3() * self.up;
        if direction == Vec3::ZERO {
            return Vec3::ZERO;
        }
        let boost = if self.boost { BOOST } else { 1.0 };
        direction.normalize() * speed * boost * delta_secs
    }
}

pub(crate) fn spawn_fly_camera(mut commands: Commands) {
    let fly_cam = FlyCamera::default();
    commands.spawn((
        Name::new("Fly Camera"),
        Camera3d::default(),
        fly_cam.projection(),
        Transform::from_translation(Vec3::ZERO).with_rotation(fly_cam.rotation()),
        fly_cam,
    ));
}

/// True while egui is using the pointer, so camera input should be ignored.
fn ui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
}

fn ui_wants_keyboard(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .is_ok_and(|ctx| ctx.wants_keyboard_input())
}

/// Look around with right mouse button drag
fn camera_look(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    settings: Res<Settings>,
    mut query: Query<(&mut FlyCamera, &mut Transform)>,
    mut contexts: EguiContexts,
) {
    if !mouse_button.pressed(MouseButton::Right) || mouse_motion.delta == Vec2::ZERO {
        return;
    }
    if ui_wants_pointer(&mut contexts) {
        return;
    }

    for (mut fly_cam, mut transform) in &mut query {
        fly_cam.look(mouse_motion.delta, settings.camera_sensitivity);
        transform.rotation = fly_cam.rotation();
    }
}

/// WASD movement for fly camera
fn camera_movement(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    settings: Res<Settings>,
    mut query: Query<&mut Transform, With<FlyCamera>>,
    mut contexts: EguiContexts,
) {
    if ui_wants_keyboard(&mut contexts) {
        return;
    }

    let input = MoveInput::from_keys(&keyboard);
    if input == MoveInput::default() {
        return;
    }

    for mut transform in &mut query {
        let step = input.displacement(&transform, settings.camera_speed, time.delta_secs());
        transform.translation += step;
    }
}

/// Scroll wheel adjusts FOV
fn camera_zoom(
    scroll: Res<AccumulatedMouseScroll>,
    mut query: Query<(&mut FlyCamera, &mut Projection)>,
    mut contexts: EguiContexts,
) {
    if scroll.delta.y == 0.0 || ui_wants_pointer(&mut contexts) {
        return;
    }

    for (mut fly_cam, mut projection) in &mut query {
        fly_cam.zoom(scroll.delta.y);
        *projection = fly_cam.projection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_stops_short_of_the_poles() {
        let mut cam = FlyCamera::default();
        cam.look(Vec2::new(0.0, -10_000.0), 0.003);
        assert_eq!(cam.pitch, PITCH_LIMIT);
        cam.look(Vec2::new(0.0, 10_000.0), 0.003);
        assert_eq!(cam.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn dragging_right_turns_right() {
        let mut cam = FlyCamera::default();
        cam.look(Vec2::new(100.0, 0.0), 0.003);
        assert!(cam.yaw < 0.0);
        let forward = cam.rotation() * Vec3::NEG_Z;
        assert!(forward.x > 0.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = FlyCamera::default();
        cam.zoom(1.0);
        assert_eq!(cam.fov_degrees, FOV_DEGREES - FOV_SCROLL_SPEED);
        cam.zoom(100.0);
        assert_eq!(cam.fov_degrees, MIN_FOV_DEGREES);
        cam.zoom(-100.0);
        assert_eq!(cam.fov_degrees, MAX_FOV_DEGREES);
    }

    #[test]
    fn projection_follows_fov() {
        let cam = FlyCamera {
            fov_degrees: 60.0,
            ..default()
        };
        let Projection::Perspective(perspective) = cam.projection() else {
            panic!("expected a perspective projection");
        };
        assert!((perspective.fov - 60f32.to_radians()).abs() < 1e-6);
        assert_eq!(perspective.near, NEAR);
        assert_eq!(perspective.far, FAR);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyW);
        keyboard.press(KeyCode::KeyS);
        keyboard.press(KeyCode::KeyD);
        let input = MoveInput::from_keys(&keyboard);
        assert_eq!(input.forward, 0.0);
        assert_eq!(input.right, 1.0);
        assert!(!input.boost);
    }

    #[test]
    fn displacement_has_frame_length() {
        let input = MoveInput {
            forward: 1.0,
            right: 1.0,
            ..default()
        };
        let step = input.displacement(&Transform::IDENTITY, 10.0, 0.5);
        assert!((step.length() - 5.0).abs() < 1e-5);

        let boosted = MoveInput {
            boost: true,
            ..input
        };
        let step = boosted.displacement(&Transform::IDENTITY, 10.0, 0.5);
        assert!((step.length() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn no_keys_no_motion() {
        let step = MoveInput::default().displacement(&Transform::IDENTITY, 10.0, 1.0);
        assert_eq!(step, Vec3::ZERO);
    }
}
