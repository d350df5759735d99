//! Minification for HTML documents and stylesheets.
//!
//! Both functions pass their input through untouched when minification is
//! disabled (dev mode), so callers never branch on the flag themselves.

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use std::borrow::Cow;

/// Minify a whole HTML document, including inline `<style>` and `<script>`.
///
/// Returns `Cow::Borrowed` if minify disabled, `Cow::Owned` if minified.
pub fn minify_html(html: &str, enabled: bool) -> Cow<'_, str> {
    if !enabled {
        return Cow::Borrowed(html);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;

    let minified = minify_html::minify(html.as_bytes(), &cfg);
    Cow::Owned(String::from_utf8_lossy(&minified).into_owned())
}

/// Minify a stylesheet with lightningcss.
///
/// # Errors
/// Returns error if the stylesheet cannot be parsed.
pub fn minify_css(css: &str, enabled: bool) -> Result<Cow<'_, str>> {
    if !enabled {
        return Ok(Cow::Borrowed(css));
    }

    let mut stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| anyhow!("Failed to parse CSS: {e}"))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| anyhow!("Failed to minify CSS: {e}"))?;

    let printer_options = PrinterOptions {
        minify: true,
        ..Default::default()
    };
    let result = stylesheet
        .to_css(printer_options)
        .map_err(|e| anyhow!("Failed to serialize CSS: {e}"))?;

    Ok(Cow::Owned(result.code))
}
