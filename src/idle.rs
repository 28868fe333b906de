//! Idle micro-motion layered on top of the scroll-driven pose
//!
//! Everything here is a pure function of wall-clock seconds. Callers pass
//! seconds as `f64` because epoch time does not fit an `f32` mantissa; the
//! resulting offsets are small and are narrowed after the trig.

use glam::Vec3;

use crate::figure::{Figure, Side};

const BOB_RATE: f64 = 0.5;
const BOB_AMPLITUDE: f64 = 0.05;
const SWAY_RATE: f64 = 0.3;
const SWAY_AMPLITUDE: f64 = 0.02;
const ARM_RATE: f64 = 0.4;
const ARM_AMPLITUDE: f64 = 0.15;

/// Lateral reach beyond which a part counts as an arm
const ARM_REACH: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleMotion {
    /// Added to the figure body's rest position
    pub offset: Vec3,
    /// Roll about the depth axis for left-side arm segments; right side is mirrored
    pub arm_roll: f32,
}

impl IdleMotion {
    /// Roll for a given side
    pub fn roll_for(&self, side: Side) -> f32 {
        self.arm_roll * side.sign()
    }
}

/// Breathing bob, lateral sway and arm swing at time `t` seconds
pub fn idle_motion(t: f64) -> IdleMotion {
    let y = (t * BOB_RATE).sin() * BOB_AMPLITUDE;
    let x = (t * SWAY_RATE).cos() * SWAY_AMPLITUDE;
    let arm = (t * ARM_RATE).sin() * ARM_AMPLITUDE;

    IdleMotion {
        offset: Vec3::new(x as f32, y as f32, 0.0),
        arm_roll: arm as f32,
    }
}

/// Side of an arm segment judged purely by where it rests.
///
/// A part sways when it sits further than 0.7 from the centre line and
/// above the waist. Segments carry this as a tag resolved at build time;
/// this predicate is the rule those tags must agree with.
pub fn sway_side_at(position: Vec3) -> Option<Side> {
    if position.x.abs() > ARM_REACH && position.y > 0.0 {
        Some(if position.x < 0.0 { Side::Left } else { Side::Right })
    } else {
        None
    }
}

/// Writes `motion` into the figure: body offset plus roll on every tagged arm segment
pub fn apply(figure: &mut Figure, motion: &IdleMotion) {
    figure.set_offset(motion.offset);
    figure.for_each_swaying_mut(|side, segment| segment.set_roll(motion.roll_for(side)));
}
