//! Headless pose trace: drives a [`Stage`] without a window and writes one
//! JSON object per step

use anyhow::{Context, Result};
use std::io::Write;

use crate::core::{SteppedClock, TimeSource};
use crate::driver::{FrameSnapshot, Stage};

/// Simulated display refresh rate
pub const TRACE_HZ: f64 = 60.0;

/// Frames the smoother runs between two scroll steps
pub const FRAMES_PER_STEP: u32 = 30;

/// Scrolls from top to bottom in `steps` equal jumps, emitting the frame
/// that ends each step (plus the initial frame)
pub fn run(stage: &mut Stage, steps: u32, out: &mut impl Write) -> Result<Vec<FrameSnapshot>> {
    let mut clock = SteppedClock::new(TRACE_HZ);
    let steps = steps.max(1);
    let mut emitted = Vec::with_capacity(steps as usize + 1);

    for step in 0..=steps {
        stage.scroll_to_fraction(step as f32 / steps as f32);

        let mut snapshot = stage.tick(clock.now_secs());
        for _ in 1..FRAMES_PER_STEP {
            snapshot = stage.tick(clock.now_secs());
        }

        let line = serde_json::to_string(&snapshot).context("Failed to serialize frame")?;
        writeln!(out, "{}", line).context("Failed to write trace")?;
        emitted.push(snapshot);
    }

    log::debug!("Trace finished after {} frames", stage.frames());
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_json_line_per_step() {
        let mut stage = Stage::new(800, 600, 5.0, 100.0);
        let mut out = Vec::new();
        let frames = run(&mut stage, 4, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert_eq!(frames.len(), 5);
        assert_eq!(stage.frames(), 5 * FRAMES_PER_STEP as u64);

        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["frame"], 30);
        assert_eq!(first["target"], 0.0);
        assert_eq!(first["pose"]["distance"], 3.0);
    }

    #[test]
    fn test_progress_trails_target() {
        let mut stage = Stage::new(800, 600, 5.0, 100.0);
        let frames = run(&mut stage, 2, &mut std::io::sink()).unwrap();

        let last = frames[2];
        assert_eq!(last.target, 1.0);
        assert!(last.progress < last.target);
        assert!(last.progress > frames[1].progress);
    }

    #[test]
    fn test_clock_is_deterministic() {
        let a = run(&mut Stage::new(800, 600, 5.0, 100.0), 3, &mut std::io::sink()).unwrap();
        let b = run(&mut Stage::new(800, 600, 5.0, 100.0), 3, &mut std::io::sink()).unwrap();
        assert_eq!(a, b);
        assert!((a[0].time - 29.0 / 60.0).abs() < 1e-12);
    }
}
