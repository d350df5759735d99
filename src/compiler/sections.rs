//! Page sources and section extraction.
//!
//! Two page conventions are supported side by side:
//!
//! - **Single-file pages** (`*.vue` by default): up to one `<template>`,
//!   one `<style>` and one `<script>` section in the same file.
//! - **Markup pages** (`*.html`): the whole file is markup; sibling
//!   `<stem>.css` and `<stem>.js` files are the page style and script.
//!
//! Either kind may declare its title with `<!-- title: ... -->` in the
//! markup; the comment is removed from the output.

use anyhow::{Context, Result};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Sections of a single-file page, each delimited by its own tag pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Markup,
    Style,
    Script,
}

impl Section {
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Markup => "template",
            Self::Style => "style",
            Self::Script => "script",
        }
    }

    fn regex(self) -> &'static Regex {
        static MARKUP: LazyLock<Regex> = LazyLock::new(|| section_regex(Section::Markup.tag()));
        static STYLE: LazyLock<Regex> = LazyLock::new(|| section_regex(Section::Style.tag()));
        static SCRIPT: LazyLock<Regex> = LazyLock::new(|| section_regex(Section::Script.tag()));

        match self {
            Self::Markup => &*MARKUP,
            Self::Style => &*STYLE,
            Self::Script => &*SCRIPT,
        }
    }
}

/// First-match, non-greedy `<tag ...>…</tag>`, case-insensitive.
fn section_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}(?:\s[^>]*)?>(.*?)</{tag}\s*>")).unwrap()
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<!--\s*title:\s*(.*?)\s*-->").unwrap());

/// Extract the body of the first `section` in `content`.
///
/// Unterminated or absent sections, and sections holding only whitespace,
/// yield `None`.
pub fn extract_section(content: &str, section: Section) -> Option<&str> {
    section
        .regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|body| !body.trim().is_empty())
}

/// Split the first title marker off `markup`.
pub fn take_title(markup: &str) -> (Option<String>, String) {
    match TITLE_RE.captures(markup) {
        Some(caps) => {
            let whole = caps.get(0).unwrap();
            let title = caps[1].to_string();
            let mut rest = String::with_capacity(markup.len());
            rest.push_str(&markup[..whole.start()]);
            rest.push_str(&markup[whole.end()..]);
            (Some(title).filter(|t| !t.is_empty()), rest)
        }
        None => (None, markup.to_string()),
    }
}

/// `weekly-schedule` → `Weekly Schedule`
pub fn derive_title(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

// ============================================================================
// PageSource
// ============================================================================

/// Page script: extracted text, or a sibling file that can be bundled as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScript {
    Inline(String),
    File(PathBuf),
}

/// One page to compile, with its sections already extracted.
#[derive(Debug, Clone)]
pub struct PageSource {
    pub path: PathBuf,
    pub markup: Option<String>,
    pub style: Option<String>,
    pub script: Option<PageScript>,
    /// Title marker text, HTML as written.
    pub title: Option<String>,
}

impl PageSource {
    /// Read a page from disk. Files with `single_file_ext` are split into
    /// sections; anything else is a markup page with optional siblings.
    pub fn load(path: &Path, single_file_ext: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read page {}", path.display()))?;

        let is_single_file = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(single_file_ext));

        if is_single_file {
            return Ok(Self::from_single_file(path, &raw));
        }

        let css_path = path.with_extension("css");
        let style = if css_path.is_file() {
            let css = fs::read_to_string(&css_path)
                .with_context(|| format!("Failed to read {}", css_path.display()))?;
            Some(css).filter(|css| !css.trim().is_empty())
        } else {
            None
        };

        let js_path = path.with_extension("js");
        let script = js_path.is_file().then_some(PageScript::File(js_path));

        Ok(Self::from_markup(path, &raw, style, script))
    }

    /// Split a single-file page into its sections.
    pub fn from_single_file(path: &Path, raw: &str) -> Self {
        let markup = extract_section(raw, Section::Markup).unwrap_or_default();
        let (title, markup) = take_title(markup);

        Self {
            path: path.to_path_buf(),
            markup: Some(markup).filter(|m| !m.is_empty()),
            style: extract_section(raw, Section::Style).map(str::to_owned),
            script: extract_section(raw, Section::Script)
                .map(|code| PageScript::Inline(code.to_owned())),
            title,
        }
    }

    /// A markup page: the whole file is markup.
    pub fn from_markup(
        path: &Path,
        raw: &str,
        style: Option<String>,
        script: Option<PageScript>,
    ) -> Self {
        let (title, markup) = take_title(raw);

        Self {
            path: path.to_path_buf(),
            markup: Some(markup).filter(|m| !m.is_empty()),
            style,
            script,
            title,
        }
    }

    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index")
    }

    /// Flattened output name: `<stem>.html`, whatever the nesting depth.
    pub fn output_name(&self) -> String {
        format!("{}.html", self.stem())
    }

    /// Explicit title, or one derived from the file stem.
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| derive_title(self.stem()))
    }

    /// Directory the page lives in.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new(""))
    }
}
