//! stitch - a static site build pipeline with nested layouts and bundled assets.

mod build;
mod cli;
mod compiler;
mod config;
mod logger;
mod utils;
mod watch;

use anyhow::Result;
use build::build_all;
use clap::Parser;
use cli::Cli;
use config::SiteConfig;
use utils::bundle::CommandBundler;
use watch::watch_for_changes_blocking;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;
    let bundler = CommandBundler::from_config(&config.build.bundler);

    if config.dev {
        watch_for_changes_blocking(&config, &bundler)
    } else {
        build_all(&config, &bundler).map(|_| ())
    }
}
