// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "robot-parallax")]
#[command(about = "Scroll-driven robot figure viewer", long_about = None)]
pub struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Virtual page height, in viewports
    #[arg(long = "pages")]
    pub page_viewports: Option<f32>,

    /// Disable UI elements (scroll hint and FPS readout)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Present as fast as possible instead of waiting for vblank
    #[arg(long = "no-vsync", default_value = "false")]
    pub no_vsync: bool,

    /// Print a headless pose trace of this many scroll steps and exit
    #[arg(long, value_name = "STEPS")]
    pub trace: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["robot-parallax"]);
        assert!(cli.config.is_none());
        assert!(!cli.no_ui);
        assert!(!cli.no_vsync);
        assert_eq!(cli.trace, None);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "robot-parallax",
            "--width",
            "640",
            "--pages",
            "3.5",
            "--no-ui",
            "--trace",
            "20",
        ]);
        assert_eq!(cli.width, Some(640));
        assert_eq!(cli.height, None);
        assert_eq!(cli.page_viewports, Some(3.5));
        assert!(cli.no_ui);
        assert_eq!(cli.trace, Some(20));
    }
}
