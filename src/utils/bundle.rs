//! JS bundling through an external bundler process.
//!
//! The bundler resolves module imports, so it needs a real entry file on
//! disk. Scripts extracted from single-file pages only exist in memory and
//! are materialized as [`TempEntry`] files next to their page, which keeps
//! relative imports resolving exactly as they would from the page itself.
//!
//! ```text
//! page.vue ──extract──► "<script>" text
//!                           │
//!                           ▼
//!              .page.vue.stitch.tmp.js   (TempEntry, removed on drop)
//!                           │
//!                           ▼
//!     esbuild <entry> --bundle ... (cwd = src root) ──stdout──► bundled code
//! ```

use crate::{config::BundlerConfig, exec, log};
use anyhow::{Context, Result};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Suffix shared by every temporary entry file.
pub const TEMP_SUFFIX: &str = ".stitch.tmp.js";

/// Turns an entry file into a single self-contained script.
pub trait Bundler {
    /// Bundle `entry`, resolving bare imports against `working_dir`.
    fn bundle(&self, entry: &Path, working_dir: &Path, minify: bool) -> Result<String>;
}

// ============================================================================
// Command Bundler
// ============================================================================

/// Runs the configured bundler command (esbuild by default).
#[derive(Debug, Clone)]
pub struct CommandBundler {
    command: Vec<String>,
    format: String,
    platform: String,
}

impl CommandBundler {
    pub fn from_config(config: &BundlerConfig) -> Self {
        Self {
            command: config.command.clone(),
            format: config.format.clone(),
            platform: config.platform.clone(),
        }
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, entry: &Path, working_dir: &Path, minify: bool) -> Result<String> {
        let format = format!("--format={}", self.format);
        let platform = format!("--platform={}", self.platform);

        let output = exec!(
            working_dir;
            &self.command;
            entry, "--bundle", format, platform, "--log-level=warning",
            if minify { "--minify" } else { "" }
        )
        .with_context(|| format!("Failed to bundle {}", entry.display()))?;

        String::from_utf8(output.stdout)
            .with_context(|| format!("Bundler produced invalid UTF-8 for {}", entry.display()))
    }
}

// ============================================================================
// Temporary Entry Files
// ============================================================================

/// A script written to disk for the bundler, removed when dropped.
///
/// The file name is derived from the page's file name, so two pages never
/// share a temporary even if they were compiled at the same time.
#[derive(Debug)]
pub struct TempEntry {
    path: PathBuf,
}

impl TempEntry {
    /// Write `code` to the temporary entry path of `page`.
    pub fn create(page: &Path, code: &str) -> Result<Self> {
        let path = temp_entry_path(page);
        fs::write(&path, code)
            .with_context(|| format!("Failed to write temporary entry {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempEntry {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path)
            && e.kind() != ErrorKind::NotFound
        {
            log!("warn"; "failed to remove {}: {e}", self.path.display());
        }
    }
}

/// `dir/page.vue` → `dir/.page.vue.stitch.tmp.js`
pub fn temp_entry_path(page: &Path) -> PathBuf {
    let name = page
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    page.with_file_name(format!(".{name}{TEMP_SUFFIX}"))
}

/// Whether `path` is a temporary entry written by the pipeline.
pub fn is_temp_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(TEMP_SUFFIX))
}

// ============================================================================
// Test Bundlers
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Returns the entry's source wrapped in a marker comment and records
    /// every call as `(entry, working_dir, minify, entry_existed)`.
    #[derive(Default)]
    pub struct EchoBundler {
        pub calls: RefCell<Vec<(PathBuf, PathBuf, bool, bool)>>,
    }

    impl Bundler for EchoBundler {
        fn bundle(&self, entry: &Path, working_dir: &Path, minify: bool) -> Result<String> {
            let existed = entry.exists();
            self.calls.borrow_mut().push((
                entry.to_path_buf(),
                working_dir.to_path_buf(),
                minify,
                existed,
            ));
            let source = fs::read_to_string(entry)?;
            Ok(format!("/*bundled*/{}", source.trim()))
        }
    }

    /// Always fails, after checking the entry exists.
    pub struct FailingBundler;

    impl Bundler for FailingBundler {
        fn bundle(&self, entry: &Path, _working_dir: &Path, _minify: bool) -> Result<String> {
            anyhow::ensure!(entry.exists(), "entry missing");
            anyhow::bail!("Could not resolve \"./missing.js\"")
        }
    }
}
