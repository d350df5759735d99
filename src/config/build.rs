//! `[build]` section configuration.
//!
//! Contains source/output paths, page conventions, minification and the
//! external bundler command.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in stitch.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// src = "src"              # Source root
/// app = "app"              # Page tree, relative to src
/// output = "dist"          # Output directory
/// minify = true            # Minify HTML and CSS
///
/// [build.bundler]
/// command = ["npx", "esbuild"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Source root: global style/script, root index and the app tree.
    #[serde(default = "defaults::build::src")]
    #[educe(Default = defaults::build::src())]
    pub src: PathBuf,

    /// Page tree, relative to `src`.
    #[serde(default = "defaults::build::app")]
    #[educe(Default = defaults::build::app())]
    pub app: PathBuf,

    /// Static files mirrored verbatim to `<output>/public`.
    #[serde(default = "defaults::build::public")]
    #[educe(Default = defaults::build::public())]
    pub public: PathBuf,

    /// Build output directory. Deleted and recreated on every pass.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Asset subdirectory of the output (a single directory name).
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Layout file name looked up in each ancestor directory of a page.
    #[serde(default = "defaults::build::layout")]
    #[educe(Default = defaults::build::layout())]
    pub layout: String,

    /// Extension of single-file pages (`<template>`/`<style>`/`<script>`).
    #[serde(default = "defaults::build::extension")]
    #[educe(Default = defaults::build::extension())]
    pub extension: String,

    /// Global stylesheet, relative to `src`.
    #[serde(default = "defaults::build::style")]
    #[educe(Default = defaults::build::style())]
    pub style: PathBuf,

    /// Global script entry, relative to `src`.
    #[serde(default = "defaults::build::script")]
    #[educe(Default = defaults::build::script())]
    pub script: PathBuf,

    /// Optional root page, relative to `src`, compiled to `index.html`.
    #[serde(default = "defaults::build::root_index")]
    #[educe(Default = defaults::build::root_index())]
    pub root_index: PathBuf,

    /// Minify HTML and CSS, and ask the bundler to minify JS.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Inline page style/script into the page instead of writing asset files.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub inline: bool,

    /// External JS bundler.
    #[serde(default)]
    pub bundler: BundlerConfig,
}

/// `[build.bundler]` section - external JS bundler invocation.
///
/// The command receives the entry file, `--bundle`, the format/platform
/// flags and `--minify` when minification is on; bundled code is read
/// from its stdout.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BundlerConfig {
    /// Command and leading arguments, e.g. `["npx", "esbuild"]`.
    #[serde(default = "defaults::build::bundler::command")]
    #[educe(Default = defaults::build::bundler::command())]
    pub command: Vec<String>,

    /// Output format passed as `--format=<format>`.
    #[serde(default = "defaults::build::bundler::format")]
    #[educe(Default = defaults::build::bundler::format())]
    pub format: String,

    /// Target platform passed as `--platform=<platform>`.
    #[serde(default = "defaults::build::bundler::platform")]
    #[educe(Default = defaults::build::bundler::platform())]
    pub platform: String,
}
