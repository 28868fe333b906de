pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod driver;
pub mod figure;
pub mod idle;
pub mod lighting;
pub mod math;
pub mod mesh;
pub mod overlay;
pub mod renderer;
pub mod scroll;
pub mod trace;
pub mod traits;
pub mod types;

pub use animation::{map_pose, Phase, Pose};
pub use driver::{FrameSnapshot, SceneView, Stage};
pub use figure::{build, Figure};
pub use scroll::{ScrollPage, ScrollState};
