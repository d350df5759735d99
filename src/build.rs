//! Site building orchestration.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── prepare_output()        ──► wipe <out>, recreate <out>/assets
//!     ├── build_global_assets()   ──► assets/style.css, assets/main.js
//!     ├── build_page(root index)  ──► index.html
//!     ├── build_page(...)         ──► <stem>.html per app page
//!     └── copy_tree(public)       ──► <out>/public/
//! ```
//!
//! A pass is sequential: pages compile in traversal order, so the result
//! (including flattened name collisions) is the same on every run.

use crate::{
    compiler::{assets::build_global_assets, collect_pages, pages::build_page},
    config::SiteConfig,
    log,
    utils::{
        bundle::Bundler,
        fs::{copy_tree, prepare_output},
    },
};
use anyhow::Result;
use std::{
    path::{Path, PathBuf},
    time::Instant,
};

/// Per-pass view of the configuration.
///
/// Optional inputs (global style/script, root index) are checked for
/// existence when the context is created, so each watch pass sees files
/// that appeared or disappeared since the previous one.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub src: PathBuf,
    pub app: PathBuf,
    pub output: PathBuf,
    pub assets: PathBuf,
    /// URL prefix of the asset directory, relative to a page.
    pub assets_url: String,
    pub public: PathBuf,
    pub minify: bool,
    pub inline: bool,
    pub layout_name: String,
    /// Single-file page extension, without the leading dot.
    pub extension: String,
    pub global_css: Option<PathBuf>,
    pub global_js: Option<PathBuf>,
    pub root_index: Option<PathBuf>,
}

impl BuildContext {
    pub fn from_config(config: &SiteConfig) -> Self {
        let build = &config.build;
        Self {
            src: build.src.clone(),
            app: config.app_dir(),
            output: build.output.clone(),
            assets: build.output.join(&build.assets),
            assets_url: build.assets.to_string_lossy().into_owned(),
            public: build.public.clone(),
            minify: build.minify,
            inline: build.inline,
            layout_name: build.layout.clone(),
            extension: build.extension.trim_start_matches('.').to_owned(),
            global_css: existing_file(&build.style),
            global_js: existing_file(&build.script),
            root_index: existing_file(&build.root_index),
        }
    }

    /// `<out>/assets/<name>`
    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.assets.join(name)
    }

    /// `assets/<name>`, as referenced from a page.
    pub fn asset_url(&self, name: &str) -> String {
        format!("{}/{name}", self.assets_url)
    }
}

fn existing_file(path: &Path) -> Option<PathBuf> {
    path.is_file().then(|| path.to_path_buf())
}

/// What a pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub pages: usize,
    pub public_files: usize,
}

/// Run one full build pass.
pub fn build_site(ctx: &BuildContext, bundler: &dyn Bundler) -> Result<BuildReport> {
    prepare_output(&ctx.output, &ctx.assets)?;

    let state = build_global_assets(ctx, bundler)?;
    let mut report = BuildReport::default();

    if let Some(index) = &ctx.root_index {
        build_page(index, ctx, &state, bundler)?;
        report.pages += 1;
    }

    for path in collect_pages(ctx) {
        build_page(&path, ctx, &state, bundler)?;
        report.pages += 1;
    }

    report.public_files = copy_tree(&ctx.public, &ctx.output.join("public"))?;

    Ok(report)
}

/// Build the site described by `config`, logging a summary.
pub fn build_all(config: &SiteConfig, bundler: &dyn Bundler) -> Result<BuildReport> {
    let start = Instant::now();
    let ctx = BuildContext::from_config(config);

    let report = build_site(&ctx, bundler)?;

    log!(
        "build";
        "{} pages, {} public files in {:.2?}",
        report.pages,
        report.public_files,
        start.elapsed()
    );
    Ok(report)
}
