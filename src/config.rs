// ⚙️ Configuration - defaults, environment and CLI flags
//
// Precedence: command-line flag, then environment variable, then default.
// Both binaries flatten `ConfigArgs` into their clap parsers.

use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_HEIGHT: u32 = 3000;
pub const MIN_HEIGHT: u32 = 2000;
pub const MAX_HEIGHT: u32 = 5000;
pub const HEIGHT_STEP: u32 = 100;
pub const DEFAULT_EXPORT_DIR: &str = "exports";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Web server bind address
    pub addr: String,

    /// Viewer height in pixels
    pub height: u32,

    /// Start with the debug panel enabled
    pub debug: bool,

    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: DEFAULT_ADDR.to_string(),
            height: DEFAULT_HEIGHT,
            debug: false,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Snap to the nearest step and clamp into the allowed range
pub fn clamp_height(height: u32) -> u32 {
    let snapped = height.saturating_add(HEIGHT_STEP / 2) / HEIGHT_STEP * HEIGHT_STEP;
    snapped.clamp(MIN_HEIGHT, MAX_HEIGHT)
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Address the web server binds to
    #[arg(long, global = true, env = "CASEBOOK_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,

    /// Viewer height in pixels (2000-5000, debug mode only)
    #[arg(long, global = true, env = "CASEBOOK_HEIGHT", default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Show the debug panel
    #[arg(long, global = true, env = "CASEBOOK_DEBUG")]
    pub debug: bool,

    /// Directory for exported documents
    #[arg(long, global = true, env = "CASEBOOK_EXPORT_DIR", default_value = DEFAULT_EXPORT_DIR)]
    pub export_dir: PathBuf,
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Config {
            addr: args.addr,
            height: args.height,
            debug: args.debug,
            export_dir: args.export_dir,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ConfigArgs,
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.addr, "127.0.0.1:3000");
        assert_eq!(config.height, 3000);
        assert!(!config.debug);
        assert_eq!(config.export_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_clamp_height() {
        assert_eq!(clamp_height(3000), 3000);
        assert_eq!(clamp_height(3449), 3400);
        assert_eq!(clamp_height(3450), 3500);
        assert_eq!(clamp_height(100), 2000);
        assert_eq!(clamp_height(9000), 5000);
        assert_eq!(clamp_height(u32::MAX), 5000);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = ["test", "--height", "4200", "--debug", "--export-dir", "out"];
        let cli = TestCli::try_parse_from(args).unwrap();
        let config = Config::from(cli.config);

        assert_eq!(config.height, 4200);
        assert!(config.debug);
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }
}
