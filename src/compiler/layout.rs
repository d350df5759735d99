//! Nearest-ancestor layout resolution.
//!
//! ```text
//! app/                  layout.html   ◄── used by app/index.vue
//! └── admin/            layout.html   ◄── shadows the root layout
//!     └── users/                      ◄── app/admin/users/list.vue uses admin/layout.html
//! ```

use super::template::Template;
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Find the layout closest to `page_dir`, walking up to and including
/// `app_root`. Pages outside the app tree start the walk at `app_root`.
pub fn resolve_layout(page_dir: &Path, app_root: &Path, layout_name: &str) -> Option<PathBuf> {
    let start = if page_dir.starts_with(app_root) {
        page_dir
    } else {
        app_root
    };

    start
        .ancestors()
        .take_while(|dir| dir.starts_with(app_root))
        .map(|dir| dir.join(layout_name))
        .find(|candidate| candidate.is_file())
}

/// Parse the layout at `path`, or the fallback body wrapper when `None`.
pub fn load_layout(path: Option<&Path>) -> Result<Template> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read layout {}", path.display()))?;
            Ok(Template::parse(&text))
        }
        None => Ok(Template::fallback()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LAYOUT: &str = "layout.html";

    fn app() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app/admin/users")).unwrap();
        dir
    }

    #[test]
    fn test_resolve_in_same_directory() {
        let dir = app();
        let root = dir.path().join("app");
        fs::write(root.join("admin/layout.html"), "admin").unwrap();

        let found = resolve_layout(&root.join("admin"), &root, LAYOUT);
        assert_eq!(found, Some(root.join("admin/layout.html")));
    }

    #[test]
    fn test_nearest_layout_wins() {
        let dir = app();
        let root = dir.path().join("app");
        fs::write(root.join("layout.html"), "root").unwrap();
        fs::write(root.join("admin/layout.html"), "admin").unwrap();

        let found = resolve_layout(&root.join("admin/users"), &root, LAYOUT);
        assert_eq!(found, Some(root.join("admin/layout.html")));
    }

    #[test]
    fn test_app_root_is_checked() {
        let dir = app();
        let root = dir.path().join("app");
        fs::write(root.join("layout.html"), "root").unwrap();

        let found = resolve_layout(&root.join("admin/users"), &root, LAYOUT);
        assert_eq!(found, Some(root.join("layout.html")));
    }

    #[test]
    fn test_walk_stops_at_app_root() {
        let dir = app();
        let root = dir.path().join("app");
        // Above the app root: never considered
        fs::write(dir.path().join("layout.html"), "outside").unwrap();

        assert_eq!(resolve_layout(&root.join("admin"), &root, LAYOUT), None);
    }

    #[test]
    fn test_sibling_prefix_directory_is_outside() {
        let dir = app();
        let root = dir.path().join("app");
        let other = dir.path().join("application");
        fs::create_dir_all(&other).unwrap();
        fs::write(root.join("layout.html"), "root").unwrap();

        // `application/` shares a string prefix with `app/` but is not inside it
        assert_eq!(resolve_layout(&other, &root, LAYOUT), Some(root.join("layout.html")));
    }

    #[test]
    fn test_page_outside_app_starts_at_root() {
        let dir = app();
        let root = dir.path().join("app");
        fs::write(root.join("layout.html"), "root").unwrap();

        assert_eq!(resolve_layout(dir.path(), &root, LAYOUT), Some(root.join("layout.html")));
    }

    #[test]
    fn test_directory_named_like_layout_is_ignored() {
        let dir = app();
        let root = dir.path().join("app");
        fs::create_dir_all(root.join("admin/layout.html")).unwrap();

        assert_eq!(resolve_layout(&root.join("admin"), &root, LAYOUT), None);
    }

    #[test]
    fn test_load_layout_fallback() {
        assert_eq!(load_layout(None).unwrap(), Template::fallback());
    }
}
