//! # Viewer Input
//!
//! What the host tells the engine about the viewer each frame: where it is,
//! where it looks, and which edit buttons are held.
//!
//! The engine never reads input devices. A windowed host fills a
//! [`ViewerInput`] from its camera and mouse state; the headless loop
//! synthesizes one.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Point3, Rad, Vector3};

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// One frame of viewer state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewerInput {
    /// The viewer's position in world space
    pub position: Point3<f32>,
    /// Normalized look direction
    pub direction: Vector3<f32>,
    /// Place button held
    pub place: bool,
    /// Break button held
    pub break_block: bool,
    /// Scroll steps since the last frame; positive cycles forward
    pub scroll: i32,
}

impl ViewerInput {
    /// Input with no buttons held.
    pub fn looking(position: Point3<f32>, direction: Vector3<f32>) -> Self {
        ViewerInput {
            position,
            direction,
            place: false,
            break_block: false,
            scroll: 0,
        }
    }

    /// Input looking along a yaw and pitch, with no buttons held.
    pub fn from_angles<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: Point3<f32>,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self::looking(position, look_direction(yaw.into(), pitch.into()))
    }
}

/// Unit look vector for a yaw around Y and a pitch above the horizon.
///
/// Pitch is clamped just short of straight up or down.
pub fn look_direction(yaw: Rad<f32>, pitch: Rad<f32>) -> Vector3<f32> {
    let pitch = pitch.0.clamp(-SAFE_FRAC_PI_2, SAFE_FRAC_PI_2);
    let (yaw_sin, yaw_cos) = yaw.0.sin_cos();
    let (pitch_sin, pitch_cos) = pitch.sin_cos();
    Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
}
