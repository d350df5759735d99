//! Site configuration management for `stitch.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                         |
//! |-------------|-------------------------------------------------|
//! | `[build]`   | Source/output paths, page conventions, bundler  |
//! | `[watch]`   | Dev-mode rebuild settings                       |
//!
//! The file is optional: without it every field takes its default and
//! paths resolve against the project root.
//!
//! # Example
//!
//! ```toml
//! [build]
//! src = "src"
//! output = "dist"
//! minify = true
//!
//! [build.bundler]
//! command = ["esbuild"]
//!
//! [watch]
//! settle_ms = 50
//! ```

mod build;
pub mod defaults;
mod error;
mod watch;

// Re-export public types used by other modules
pub use build::BundlerConfig;

use build::BuildConfig;
use error::ConfigError;
use watch::WatchConfig;

use crate::{cli::Cli, log};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing stitch.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Whether `--dev` was given (watch mode)
    #[serde(skip)]
    pub dev: bool,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load `<root>/<config>` if it exists, otherwise start from defaults,
    /// then apply CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Absolute app tree root (`src/app`).
    pub fn app_dir(&self) -> PathBuf {
        self.build.src.join(&self.build.app)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());

        self.dev = cli.is_dev();
        if self.dev {
            self.build.minify = false;
        }

        self.update_path_with_root(&root, cli);
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, cli: &Cli) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(&cli.config));

        self.build.src = Self::normalize_path(&root.join(&self.build.src));
        self.build.public = Self::normalize_path(&root.join(&self.build.public));
        self.build.style = self.build.src.join(&self.build.style);
        self.build.script = self.build.src.join(&self.build.script);
        self.build.root_index = self.build.src.join(&self.build.root_index);

        // `--out` is relative to the invocation directory, config output to root
        self.build.output = match cli.out() {
            Some(out) => Self::normalize_path(out),
            None => Self::normalize_path(&root.join(&self.build.output)),
        };
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration after paths are normalized
    pub fn validate(&self) -> Result<()> {
        let build = &self.build;

        if !build.src.is_dir() {
            bail!(ConfigError::Validation(format!(
                "[build.src] `{}` is not a directory",
                build.src.display()
            )));
        }

        // The output is wiped at the start of every pass
        if build.src.starts_with(&build.output) {
            bail!(ConfigError::Validation(format!(
                "[build.output] `{}` must not contain the source root",
                build.output.display()
            )));
        }

        // `public/` is mirrored into the output, so neither may contain the other
        if build.public.starts_with(&build.output) || build.output.starts_with(&build.public) {
            bail!(ConfigError::Validation(format!(
                "[build.output] `{}` must not overlap the public directory `{}`",
                build.output.display(),
                build.public.display()
            )));
        }

        if !is_single_dir_name(&build.assets) {
            bail!(ConfigError::Validation(
                "[build.assets] must be a single directory name".into()
            ));
        }

        if build.layout.is_empty() || build.layout.contains(['/', '\\']) {
            bail!(ConfigError::Validation(
                "[build.layout] must be a plain file name".into()
            ));
        }

        let ext = build.extension.trim_start_matches('.');
        if ext.is_empty() || ext.eq_ignore_ascii_case("html") {
            bail!(ConfigError::Validation(
                "[build.extension] must be set and differ from `html`".into()
            ));
        }

        if build.bundler.command.is_empty() {
            bail!(ConfigError::Validation(
                "[build.bundler.command] must have at least one element".into()
            ));
        }

        // Pages without scripts build fine without a bundler, so only warn
        let cmd = &build.bundler.command[0];
        if which::which(cmd).is_err() {
            log!("warn"; "`{cmd}` not found, pages with scripts will fail to build");
        }

        Ok(())
    }
}

/// True if `path` is exactly one normal component (`assets`, not `a/b` or `..`).
fn is_single_dir_name(path: &Path) -> bool {
    let mut components = path.components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

// ============================================================================
// Tests
// ============================================================================
