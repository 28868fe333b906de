//! Runtime configuration: defaults, then an optional JSON file, then CLI flags

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::Cli;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial window size in logical pixels
    pub width: u32,
    pub height: u32,
    /// Virtual page height as a multiple of the viewport
    pub page_viewports: f32,
    /// Pixels scrolled per wheel notch or arrow key
    pub wheel_line_px: f32,
    pub show_ui: bool,
    pub vsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            page_viewports: 5.0,
            wheel_line_px: 100.0,
            show_ui: true,
            vsync: true,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid configuration JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_json(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Layer the file named by `--config` (if any) and the flags over the defaults
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Rejects page geometry the scroll model cannot represent
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.page_viewports.is_finite() && self.page_viewports >= 1.0,
            "page_viewports must be a finite number of at least 1, got {}",
            self.page_viewports
        );
        ensure!(
            self.wheel_line_px.is_finite() && self.wheel_line_px > 0.0,
            "wheel_line_px must be a finite positive number, got {}",
            self.wheel_line_px
        );
        Ok(())
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(pages) = cli.page_viewports {
            self.page_viewports = pages;
        }
        if cli.no_ui {
            self.show_ui = false;
        }
        if cli.no_vsync {
            self.vsync = false;
        }
    }
}
