//! Global and per-page CSS/JS.
//!
//! Global assets are built once per pass, before any page, and recorded in
//! [`BuildState`] so pages only reference what was actually produced.
//! Page assets are built while their page compiles and are either inlined
//! or written under the asset directory as `<stem>.css` / `<stem>.js`.

use super::sections::{PageScript, PageSource};
use crate::{
    build::BuildContext,
    log,
    utils::{
        bundle::{Bundler, TempEntry},
        fs::write_file,
        minify::minify_css,
    },
};
use anyhow::{Context, Result};
use std::fs;

/// Output name of the global stylesheet.
pub const GLOBAL_CSS: &str = "style.css";
/// Output name of the global script bundle.
pub const GLOBAL_JS: &str = "main.js";

/// Global assets produced during the current pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildState {
    pub global_css: bool,
    pub global_js: bool,
}

/// Build `assets/style.css` and `assets/main.js` when their sources exist.
pub fn build_global_assets(ctx: &BuildContext, bundler: &dyn Bundler) -> Result<BuildState> {
    let mut state = BuildState::default();

    if let Some(source) = &ctx.global_css {
        let css = fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let css = minify_css(&css, ctx.minify)
            .with_context(|| format!("Failed to minify {}", source.display()))?;
        write_file(&ctx.asset_path(GLOBAL_CSS), css.as_bytes())?;
        state.global_css = true;
        log!("assets"; "built {GLOBAL_CSS}");
    }

    if let Some(entry) = &ctx.global_js {
        let code = bundler.bundle(entry, &ctx.src, ctx.minify)?;
        write_file(&ctx.asset_path(GLOBAL_JS), code)?;
        state.global_js = true;
        log!("assets"; "built {GLOBAL_JS}");
    }

    Ok(state)
}

/// Minify the page style and return its head fragment.
pub fn build_page_style(page: &PageSource, css: &str, ctx: &BuildContext) -> Result<String> {
    let css = minify_css(css, ctx.minify)
        .with_context(|| format!("Failed to minify style of {}", page.path.display()))?;

    if ctx.inline {
        return Ok(style_tag(&css));
    }

    let name = format!("{}.css", page.stem());
    write_file(&ctx.asset_path(&name), css.as_bytes())?;
    Ok(stylesheet_link(&ctx.asset_url(&name)))
}

/// Bundle the page script and return its body fragment, if it produced code.
pub fn build_page_script(
    page: &PageSource,
    script: &PageScript,
    ctx: &BuildContext,
    bundler: &dyn Bundler,
) -> Result<Option<String>> {
    let code = match script {
        PageScript::Inline(code) => bundle_inline(page, code, ctx, bundler)?,
        PageScript::File(entry) => bundler.bundle(entry, &ctx.src, ctx.minify)?,
    };

    if code.trim().is_empty() {
        return Ok(None);
    }

    if ctx.inline {
        return Ok(Some(script_tag(&code)));
    }

    let name = format!("{}.js", page.stem());
    write_file(&ctx.asset_path(&name), code)?;
    Ok(Some(script_src(&ctx.asset_url(&name))))
}

/// Bundle an extracted script through a temporary entry next to the page.
///
/// The entry is removed when the guard drops, whether bundling succeeded
/// or not.
fn bundle_inline(
    page: &PageSource,
    code: &str,
    ctx: &BuildContext,
    bundler: &dyn Bundler,
) -> Result<String> {
    let entry = TempEntry::create(&page.path, code)?;
    bundler
        .bundle(entry.path(), &ctx.src, ctx.minify)
        .with_context(|| format!("Failed to bundle script of {}", page.path.display()))
}

// ============================================================================
// Fragments
// ============================================================================

pub fn style_tag(css: &str) -> String {
    format!("<style>{css}</style>")
}

pub fn stylesheet_link(href: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{href}">"#)
}

pub fn script_tag(code: &str) -> String {
    format!("<script>{}</script>", code.trim_end())
}

pub fn script_src(src: &str) -> String {
    format!(r#"<script src="{src}"></script>"#)
}
