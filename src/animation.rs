//! Scroll progress → camera framing and figure yaw
//!
//! The mapping has two phases split at progress 0.4. Phase one dollies the
//! camera from 3.0 in to 1.2 with a small sideways hump; phase two pulls
//! back out to 8.0 while orbiting and spinning the figure a full turn.
//!
//! Two irregularities are part of the mapping:
//! - yaw jumps from 0.2 to 0.5 at the phase boundary, because phase one
//!   scales the global progress while phase two starts from a fixed 0.5;
//! - phase one's lateral hump uses the phase-local parameter, phase two's
//!   vertical hump uses its own local parameter.

use glam::Vec3;
use serde::Serialize;
use std::f32::consts::{PI, TAU};

/// Progress at which the dolly-in ends and the orbit begins
pub const PHASE_BOUNDARY: f32 = 0.4;

pub const START_DISTANCE: f32 = 3.0;
pub const CLOSEST_DISTANCE: f32 = 1.2;
pub const END_DISTANCE: f32 = 8.0;

/// Height of the camera's orbit centre and of the look-at point
pub const EYE_HEIGHT: f32 = 1.0;
pub const LOOK_AT: Vec3 = Vec3::new(0.0, EYE_HEIGHT, 0.0);

const HUMP_WIDTH: f32 = 0.3;
const ORBIT_RADIUS: f32 = 3.0;
const ORBIT_LIFT: f32 = 1.0;
const PHASE_ONE_YAW_RATE: f32 = 0.5;
const PHASE_TWO_YAW_START: f32 = 0.5;

/// Which half of the scroll range a progress value falls in, with its local parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// `p = progress / 0.4`, in [0, 1) for in-range input
    Approach { p: f32 },
    /// `q = (progress - 0.4) / 0.6`, in [0, 1] for in-range input
    Orbit { q: f32 },
}

impl Phase {
    /// Out-of-range progress is not clamped; the local parameter extrapolates
    pub fn of(progress: f32) -> Self {
        if progress < PHASE_BOUNDARY {
            Phase::Approach {
                p: progress / PHASE_BOUNDARY,
            }
        } else {
            Phase::Orbit {
                q: (progress - PHASE_BOUNDARY) / (1.0 - PHASE_BOUNDARY),
            }
        }
    }
}

/// Per-frame camera framing and figure yaw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub distance: f32,
    pub camera_x: f32,
    pub camera_y: f32,
    pub yaw: f32,
}

impl Pose {
    /// Camera eye position; the camera always aims at [`LOOK_AT`]
    pub fn camera_position(&self) -> Vec3 {
        Vec3::new(self.camera_x, EYE_HEIGHT + self.camera_y, self.distance)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn approach(progress: f32, p: f32) -> Pose {
    Pose {
        distance: lerp(START_DISTANCE, CLOSEST_DISTANCE, p),
        camera_x: (p * PI).sin() * HUMP_WIDTH,
        camera_y: 0.0,
        yaw: progress * PHASE_ONE_YAW_RATE,
    }
}

fn orbit(q: f32) -> Pose {
    let angle = q * TAU;
    Pose {
        distance: lerp(CLOSEST_DISTANCE, END_DISTANCE, q),
        camera_x: angle.cos() * ORBIT_RADIUS,
        camera_y: (q * PI).sin() * ORBIT_LIFT,
        yaw: PHASE_TWO_YAW_START + angle,
    }
}

/// Maps smoothed scroll progress to a pose
pub fn map_pose(progress: f32) -> Pose {
    match Phase::of(progress) {
        Phase::Approach { p } => approach(progress, p),
        Phase::Orbit { q } => orbit(q),
    }
}
