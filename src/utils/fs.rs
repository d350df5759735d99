//! Output directory writes: reset, single files and verbatim tree copies.

use anyhow::{Context, Result};
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Delete `output` if present, then recreate it with its asset directory.
///
/// Runs before any other work in a pass; nothing from a previous pass
/// survives.
pub fn prepare_output(output: &Path, assets: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clear output directory: {}", output.display()))?;
    }
    fs::create_dir_all(assets)
        .with_context(|| format!("Failed to create asset directory: {}", assets.display()))?;
    Ok(())
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Mirror `src` into `dst` byte-for-byte, directories included.
///
/// A missing `src` is not an error. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!("Failed to copy {} → {}", entry.path().display(), target.display())
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_output_clears_previous_pass() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dist");
        let assets = output.join("assets");
        fs::create_dir_all(output.join("old")).unwrap();
        fs::write(output.join("stale.html"), "old").unwrap();

        prepare_output(&output, &assets).unwrap();

        assert!(assets.is_dir());
        assert!(!output.join("stale.html").exists());
        assert!(!output.join("old").exists());
    }

    #[test]
    fn test_prepare_output_fresh() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dist");
        prepare_output(&output, &output.join("assets")).unwrap();
        assert!(output.join("assets").is_dir());
    }

    #[test]
    fn test_write_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/page.html");
        write_file(&path, "<p>x</p>").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "<p>x</p>");
    }

    #[test]
    fn test_copy_tree_mirrors_nested_files() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("public");
        fs::create_dir_all(src.join("img/icons")).unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::write(src.join("robots.txt"), "User-agent: *").unwrap();
        fs::write(src.join("img/icons/logo.svg"), [0u8, 159, 146, 150]).unwrap();

        let dst = dir.path().join("dist/public");
        let copied = copy_tree(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("robots.txt")).unwrap(), "User-agent: *");
        assert_eq!(fs::read(dst.join("img/icons/logo.svg")).unwrap(), vec![0u8, 159, 146, 150]);
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let dir = TempDir::new().unwrap();
        let copied = copy_tree(&dir.path().join("nope"), &dir.path().join("out")).unwrap();
        assert_eq!(copied, 0);
        assert!(!dir.path().join("out").exists());
    }
}
