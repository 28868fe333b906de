//! Per-frame orchestration of scroll smoothing, pose mapping and idle motion
//!
//! [`Stage`] is the single owner of every piece of live state. The window
//! host lends it to input handling ([`Stage::apply_scroll`],
//! [`Stage::resize`]) and to the frame callback ([`Stage::frame`]) in turn,
//! all on the event-loop thread, so nothing here needs a lock.

use serde::Serialize;

use crate::animation::{map_pose, Pose};
use crate::camera::Camera;
use crate::config::Config;
use crate::core::{ScrollCommand, TimeSource};
use crate::figure::{self, Figure};
use crate::idle;
use crate::lighting::Lighting;
use crate::scroll::{ScrollPage, ScrollState};
use crate::traits::RenderBackend;

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub figure: &'a Figure,
    pub camera: &'a Camera,
    pub lighting: &'a Lighting,
    pub hint_visible: bool,
    pub progress: f32,
}

/// What one tick produced, for tracing and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub time: f64,
    pub target: f32,
    pub progress: f32,
    pub pose: Pose,
    pub camera: [f32; 3],
    pub offset: [f32; 3],
    pub arm_roll: f32,
}

pub struct Stage {
    figure: Figure,
    camera: Camera,
    lighting: Lighting,
    scroll: ScrollState,
    page: ScrollPage,
    wheel_line_px: f32,
    frames: u64,
}

impl Stage {
    /// Viewport size is in physical pixels
    pub fn new(width: u32, height: u32, page_viewports: f32, wheel_line_px: f32) -> Self {
        let mut camera = Camera::default();
        camera.set_viewport(width, height);

        Self {
            figure: figure::build(),
            camera,
            lighting: Lighting::studio(),
            scroll: ScrollState::new(),
            page: ScrollPage::new(height as f32, page_viewports),
            wheel_line_px,
            frames: 0,
        }
    }

    pub fn from_config(config: &Config, width: u32, height: u32) -> Self {
        Self::new(width, height, config.page_viewports, config.wheel_line_px)
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn page(&self) -> &ScrollPage {
        &self.page
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Moves the page and publishes its new fraction as the smoothing target
    pub fn apply_scroll(&mut self, command: ScrollCommand) {
        match command {
            ScrollCommand::Lines(lines) => self.page.scroll_by(lines * self.wheel_line_px),
            ScrollCommand::Pixels(dy) => self.page.scroll_by(dy),
            ScrollCommand::PageUp => self.page.page_up(),
            ScrollCommand::PageDown => self.page.page_down(),
            ScrollCommand::Home => self.page.home(),
            ScrollCommand::End => self.page.end(),
        }
        self.publish_target();
    }

    /// Jumps the page straight to `fraction` of its range
    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        self.page.scroll_to_fraction(fraction);
        self.publish_target();
    }

    /// New viewport size in physical pixels; zero sizes (minimised) are ignored.
    ///
    /// The page keeps its pixel offset, so the scroll target is re-published
    /// from the re-clamped fraction.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        self.page.resize(height as f32);
        self.publish_target();
    }

    fn publish_target(&mut self) {
        self.scroll.set_target(self.page.fraction());
    }

    /// Smooth, map, place the camera, yaw the figure, then layer idle motion at `now` seconds
    pub fn tick(&mut self, now: f64) -> FrameSnapshot {
        self.scroll.advance();

        let pose = map_pose(self.scroll.current);
        self.camera.apply_pose(&pose);
        self.figure.set_yaw(pose.yaw);

        let motion = idle::idle_motion(now);
        idle::apply(&mut self.figure, &motion);

        self.frames += 1;
        FrameSnapshot {
            frame: self.frames,
            time: now,
            target: self.scroll.target,
            progress: self.scroll.current,
            pose,
            camera: self.camera.position.to_array(),
            offset: motion.offset.to_array(),
            arm_roll: motion.arm_roll,
        }
    }

    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            figure: &self.figure,
            camera: &self.camera,
            lighting: &self.lighting,
            hint_visible: self.page.hint_visible(),
            progress: self.scroll.current,
        }
    }

    /// One full frame: tick at the clock's current time, then hand the scene to `backend`
    pub fn frame<B: RenderBackend>(
        &mut self,
        backend: &mut B,
        clock: &mut impl TimeSource,
    ) -> Result<FrameSnapshot, B::Error> {
        let snapshot = self.tick(clock.now_secs());
        backend.render(&self.view())?;
        Ok(snapshot)
    }
}
