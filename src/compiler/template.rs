//! Layout templates with named insertion points.
//!
//! A layout is parsed once into literal text and four points, located in
//! the layout text only (never in page content):
//!
//! ```text
//! <html><head><title>{{title}}</title></head><body>{{content}}</body></html>
//!                    ^^^^^^^^^        ^^^^^^^      ^^^^^^^^^^^ ^^^^^^^
//!                    Title            Head         Content     Body
//! ```
//!
//! Only the first occurrence of each token becomes a point; later ones stay
//! literal. Fragments pushed to `Head`/`Body` render in push order, each
//! followed by a newline, immediately before `</head>`/`</body>`.

/// Content placeholder token.
pub const CONTENT: &str = "{{content}}";
/// Title placeholder token.
pub const TITLE: &str = "{{title}}";

const HEAD_END: &str = "</head>";
const BODY_END: &str = "</body>";

/// Used when no layout exists between a page and the app root.
pub const FALLBACK_LAYOUT: &str = "<body>{{content}}</body>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Point {
    Content,
    Title,
    Head,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Point(Point),
}

/// A parsed layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<Part>,
}

impl Template {
    pub fn parse(text: &str) -> Self {
        let mut marks: Vec<(usize, usize, Point)> = [
            (CONTENT, Point::Content),
            (TITLE, Point::Title),
            (HEAD_END, Point::Head),
            (BODY_END, Point::Body),
        ]
        .into_iter()
        .filter_map(|(token, point)| text.find(token).map(|at| (at, token.len(), point)))
        .collect();
        marks.sort_by_key(|&(at, ..)| at);

        let mut parts = Vec::with_capacity(marks.len() * 2 + 1);
        let mut cursor = 0;
        for (at, len, point) in marks {
            // Tokens are distinct literals and cannot overlap
            parts.push(Part::Text(text[cursor..at].to_string()));
            parts.push(Part::Point(point));
            cursor = at + len;
        }
        parts.push(Part::Text(text[cursor..].to_string()));

        Self { parts }
    }

    pub fn fallback() -> Self {
        Self::parse(FALLBACK_LAYOUT)
    }

    pub fn has(&self, point: Point) -> bool {
        self.parts.contains(&Part::Point(point))
    }
}

/// A page being assembled from a template.
#[derive(Debug)]
pub struct Document<'t> {
    template: &'t Template,
    content: String,
    title: String,
    head: Vec<String>,
    body: Vec<String>,
}

impl<'t> Document<'t> {
    pub fn new(template: &'t Template) -> Self {
        Self {
            template,
            content: String::new(),
            title: String::new(),
            head: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Set a plain-text title, HTML-escaped.
    pub fn set_title(&mut self, title: &str) {
        self.title = escape_html(title);
    }

    /// Set a title that is already HTML, inserted as written.
    pub fn set_title_html(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn push_head(&mut self, fragment: impl Into<String>) {
        self.head.push(fragment.into());
    }

    pub fn push_body(&mut self, fragment: impl Into<String>) {
        self.body.push(fragment.into());
    }

    /// Fragments with no insertion point in the template: `(head, body)`.
    pub fn dropped(&self) -> (usize, usize) {
        let head = if self.template.has(Point::Head) { 0 } else { self.head.len() };
        let body = if self.template.has(Point::Body) { 0 } else { self.body.len() };
        (head, body)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for part in &self.template.parts {
            match part {
                Part::Text(text) => out.push_str(text),
                Part::Point(Point::Content) => out.push_str(&self.content),
                Part::Point(Point::Title) => out.push_str(&self.title),
                Part::Point(Point::Head) => push_fragments(&mut out, &self.head, HEAD_END),
                Part::Point(Point::Body) => push_fragments(&mut out, &self.body, BODY_END),
            }
        }
        out
    }
}

fn push_fragments(out: &mut String, fragments: &[String], marker: &str) {
    for fragment in fragments {
        out.push_str(fragment);
        out.push('\n');
    }
    out.push_str(marker);
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
