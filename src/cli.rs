//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stitch static site build pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to root (default: stitch.toml)
    #[arg(short = 'C', long, default_value = "stitch.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Deletes the output directory and rebuilds every page and asset
    Build {
        /// Watch the sources and rebuild on change; disables minification
        #[arg(long)]
        dev: bool,

        /// Output directory (relative paths resolve against the current directory)
        #[arg(long, require_equals = false)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub const fn is_dev(&self) -> bool {
        matches!(self.command, Commands::Build { dev: true, .. })
    }

    pub fn out(&self) -> Option<&PathBuf> {
        match &self.command {
            Commands::Build { out, .. } => out.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_defaults() {
        let cli = Cli::parse_from(["stitch", "build"]);
        assert!(!cli.is_dev());
        assert!(cli.out().is_none());
        assert_eq!(cli.config, PathBuf::from("stitch.toml"));
    }

    #[test]
    fn test_parse_dev_and_out_with_equals() {
        let cli = Cli::parse_from(["stitch", "build", "--dev", "--out=site"]);
        assert!(cli.is_dev());
        assert_eq!(cli.out(), Some(&PathBuf::from("site")));
    }

    #[test]
    fn test_parse_root_and_config() {
        let cli = Cli::parse_from(["stitch", "-r", "proj", "-C", "alt.toml", "build", "--out", "x"]);
        assert_eq!(cli.root, Some(PathBuf::from("proj")));
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert_eq!(cli.out(), Some(&PathBuf::from("x")));
    }
}
