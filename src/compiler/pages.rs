//! Page compilation: layout + sections + assets → one HTML file.
//!
//! # Injection Order
//!
//! ```text
//! <head>
//!   ...layout head...
//!   <style>page</style>                        ◄── page style (or <link> to assets/<stem>.css)
//!   <link rel="stylesheet" href="assets/style.css">   ◄── global style
//! </head>
//! <body>
//!   ...layout body with {{content}}...
//!   <script>page</script>                      ◄── page script (or <script src>)
//!   <script src="assets/main.js"></script>     ◄── global script
//! </body>
//! ```

use super::{
    assets::{
        BuildState, GLOBAL_CSS, GLOBAL_JS, build_page_script, build_page_style, script_src,
        stylesheet_link,
    },
    layout::{load_layout, resolve_layout},
    sections::PageSource,
    template::Document,
};
use crate::{
    build::BuildContext,
    log,
    utils::{bundle::Bundler, fs::write_file, minify::minify_html},
};
use anyhow::Result;
use std::path::Path;

/// A rendered page, ready to be written under the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPage {
    /// Flattened output file name (`<stem>.html`).
    pub name: String,
    pub html: String,
}

/// Compile `page` against its nearest layout.
///
/// Per-page asset files are written as a side effect when `ctx.inline` is
/// off; the page HTML itself is returned, not written.
pub fn compile_page(
    page: &PageSource,
    ctx: &BuildContext,
    state: &BuildState,
    bundler: &dyn Bundler,
) -> Result<CompiledPage> {
    let layout = resolve_layout(page.dir(), &ctx.app, &ctx.layout_name);
    let template = load_layout(layout.as_deref())?;

    let mut doc = Document::new(&template);
    doc.set_content(page.markup.as_deref().unwrap_or_default());
    match &page.title {
        Some(title) => doc.set_title_html(title.as_str()),
        None => doc.set_title(&page.title()),
    }

    if let Some(css) = &page.style {
        doc.push_head(build_page_style(page, css, ctx)?);
    }
    if state.global_css {
        doc.push_head(stylesheet_link(&ctx.asset_url(GLOBAL_CSS)));
    }

    if let Some(script) = &page.script
        && let Some(fragment) = build_page_script(page, script, ctx, bundler)?
    {
        doc.push_body(fragment);
    }
    if state.global_js {
        doc.push_body(script_src(&ctx.asset_url(GLOBAL_JS)));
    }

    match doc.dropped() {
        (0, 0) => {}
        (head, body) => log!(
            "warn"; "{}: layout has no insertion point for {head} head and {body} body fragment(s)",
            rel_path(&page.path, &ctx.src)
        ),
    }

    let html = doc.render();
    Ok(CompiledPage {
        name: page.output_name(),
        html: minify_html(&html, ctx.minify).into_owned(),
    })
}

/// Load, compile and write one page to `<output>/<stem>.html`.
pub fn build_page(
    path: &Path,
    ctx: &BuildContext,
    state: &BuildState,
    bundler: &dyn Bundler,
) -> Result<CompiledPage> {
    let page = PageSource::load(path, &ctx.extension)?;
    let compiled = compile_page(&page, ctx, state, bundler)?;

    write_file(&ctx.output.join(&compiled.name), &compiled.html)?;
    log!("page"; "{} -> {}", rel_path(path, &ctx.src), compiled.name);

    Ok(compiled)
}

/// `/proj/src/app/admin/users.vue` → `app/admin/users.vue`
fn rel_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::tests::{context, project};
    use crate::utils::bundle::testing::EchoBundler;
    use std::fs;

    const LAYOUT: &str = "<html><head><title>{{title}}</title></head><body>{{content}}</body></html>";

    fn compile(ctx: &BuildContext, state: &BuildState, path: &Path, raw: &str) -> CompiledPage {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, raw).unwrap();
        let page = PageSource::load(path, &ctx.extension).unwrap();
        compile_page(&page, ctx, state, &EchoBundler::default()).unwrap()
    }

    #[test]
    fn test_plain_page() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;
        fs::write(ctx.app.join("layout.html"), LAYOUT).unwrap();

        let page = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("my-page.vue"),
            "<template><h1>Hi</h1></template>",
        );

        assert_eq!(page.name, "my-page.html");
        assert_eq!(
            page.html,
            "<html><head><title>My Page</title></head><body><h1>Hi</h1></body></html>"
        );
    }

    #[test]
    fn test_marker_title_is_html_derived_title_is_escaped() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;
        fs::write(ctx.app.join("layout.html"), "<title>{{title}}</title>{{content}}").unwrap();

        let marked = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("cartoons.html"),
            "<!-- title: Tom &amp; Jerry --><p>x</p>",
        );
        assert_eq!(marked.html, "<title>Tom &amp; Jerry</title><p>x</p>");

        let derived = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("q&a.vue"),
            "<template><p>y</p></template>",
        );
        assert_eq!(derived.html, "<title>Q&amp;a</title><p>y</p>");
    }

    #[test]
    fn test_content_token_in_markup_not_resubstituted() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;
        fs::write(ctx.app.join("layout.html"), "<main>{{content}}</main>").unwrap();

        let page = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("docs.vue"),
            "<template><code>{{content}}</code></template>",
        );
        assert_eq!(page.html, "<main><code>{{content}}</code></main>");
    }

    #[test]
    fn test_head_and_body_order() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;
        fs::write(ctx.app.join("layout.html"), LAYOUT).unwrap();
        let state = BuildState {
            global_css: true,
            global_js: true,
        };

        let page = compile(
            &ctx,
            &state,
            &ctx.app.join("planner.vue"),
            "<template><p>x</p></template><style>p{}</style><script>run()</script>",
        );

        let html = &page.html;
        let page_style = html.find("<style>p{}</style>").unwrap();
        let global_style = html.find(r#"href="assets/style.css""#).unwrap();
        let head_end = html.find("</head>").unwrap();
        assert!(page_style < global_style && global_style < head_end);

        let page_script = html.find("<script>/*bundled*/run()</script>").unwrap();
        let global_script = html.find(r#"<script src="assets/main.js"></script>"#).unwrap();
        let body_end = html.find("</body>").unwrap();
        assert!(page_script < global_script && global_script < body_end);
    }

    #[test]
    fn test_no_scripts_no_script_tags() {
        let dir = project();
        let ctx = context(dir.path());
        fs::write(ctx.app.join("layout.html"), LAYOUT).unwrap();

        let page = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("about.vue"),
            "<template><p>About</p></template><style>p{color:red}</style>",
        );
        assert!(!page.html.contains("<script"));
    }

    #[test]
    fn test_nested_page_uses_nearest_layout() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;
        fs::create_dir_all(ctx.app.join("admin/users")).unwrap();
        fs::write(ctx.app.join("layout.html"), "<root>{{content}}</root>").unwrap();
        fs::write(ctx.app.join("admin/layout.html"), "<admin>{{content}}</admin>").unwrap();

        let page = compile(
            &ctx,
            &BuildState::default(),
            &ctx.app.join("admin/users/list.vue"),
            "<template>users</template>",
        );

        assert_eq!(page.name, "list.html");
        assert_eq!(page.html, "<admin>users</admin>");
    }

    #[test]
    fn test_fallback_layout_drops_head_fragments() {
        let dir = project();
        let mut ctx = context(dir.path());
        ctx.minify = false;

        let page = compile(
            &ctx,
            &BuildState { global_css: true, global_js: false },
            &ctx.app.join("bare.vue"),
            "<template><p>x</p></template><style>p{}</style>",
        );
        assert_eq!(page.html, "<body><p>x</p></body>");
    }

    #[test]
    fn test_build_page_writes_flattened_output() {
        let dir = project();
        let ctx = context(dir.path());
        crate::utils::fs::prepare_output(&ctx.output, &ctx.assets).unwrap();
        let path = ctx.app.join("deep/nested/login.html");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<!-- title: Sign in --><form></form>").unwrap();

        let compiled =
            build_page(&path, &ctx, &BuildState::default(), &EchoBundler::default()).unwrap();

        assert_eq!(compiled.name, "login.html");
        let written = fs::read_to_string(ctx.output.join("login.html")).unwrap();
        assert_eq!(written, compiled.html);
        assert!(written.contains("<form></form>"));
    }
}
