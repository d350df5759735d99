//! Page compilation for the build pipeline.
//!
//! - **sections**: Split page sources into markup, style and script
//! - **template**: Layouts with named insertion points
//! - **layout**: Nearest-ancestor layout lookup
//! - **assets**: Global and per-page CSS/JS
//! - **pages**: Compile one page and write it
//!
//! # Build Flow
//!
//! ```text
//! collect_pages() ──► PageSource::load() ──► compile_page() ──► <out>/<stem>.html
//!                                                 │
//!                                      resolve_layout() + page assets
//! ```

pub mod assets;
pub mod layout;
pub mod pages;
pub mod sections;
pub mod template;

use crate::{build::BuildContext, utils::bundle::is_temp_entry};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Page sources under the app root, in traversal order.
///
/// Directory entries are visited sorted by file name, depth-first, so the
/// order (and therefore which page wins a flattened name collision) is
/// stable across runs.
pub fn collect_pages(ctx: &BuildContext) -> Vec<PathBuf> {
    WalkDir::new(&ctx.app)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(&ctx.output))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| is_page(path, ctx))
        .collect()
}

fn is_page(path: &Path, ctx: &BuildContext) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name == ctx.layout_name || name.starts_with('.') || is_temp_entry(path) {
        return false;
    }
    if ctx.root_index.as_deref() == Some(path) {
        return false;
    }

    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&ctx.extension) || ext.eq_ignore_ascii_case("html"))
}
