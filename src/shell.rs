//! In-memory model of the HTML document shell the renderer paints into.
//!
//! The shell owns a fixed set of elements addressed by id. Renderers look
//! elements up and skip their update when an element is absent, so a shell can
//! be built without some of them to mirror an incomplete page.

use std::collections::{BTreeMap, BTreeSet};

pub mod ids {
    pub const THEME_TOGGLE: &str = "theme-toggle";
    pub const MAIN_HEADING: &str = "main-heading";
    pub const VIDEO_CONTAINER: &str = "video-player-container";
    pub const VIDEO_IFRAME: &str = "tutorial-video-iframe";
    pub const MARKDOWN_CONTENT: &str = "markdown-content";
    pub const PREV_LINK: &str = "prev-page-link";
    pub const NEXT_LINK: &str = "next-page-link";
    pub const NAV_SPACER: &str = "nav-spacer";
    pub const SIDEBAR_LIST: &str = "tutorial-list";

    pub const ALL: [&str; 9] = [
        THEME_TOGGLE,
        MAIN_HEADING,
        VIDEO_CONTAINER,
        VIDEO_IFRAME,
        MARKDOWN_CONTENT,
        PREV_LINK,
        NEXT_LINK,
        NAV_SPACER,
        SIDEBAR_LIST,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    InlineBlock,
    None,
}

impl Display {
    fn as_css(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::InlineBlock => "inline-block",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
    tag: &'static str,
    inner_html: String,
    attrs: BTreeMap<String, String>,
    display: Option<Display>,
}

impl Element {
    pub fn new(id: impl Into<String>, tag: &'static str) -> Self {
        Self {
            id: id.into(),
            tag,
            inner_html: String::new(),
            attrs: BTreeMap::new(),
            display: None,
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    pub fn set_inner_html(&mut self, html: impl Into<String>) {
        self.inner_html = html.into();
    }

    /// Replaces the contents with escaped text.
    pub fn set_text(&mut self, text: &str) {
        self.inner_html = escape_html(text);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_owned(), value.into());
    }

    pub fn display(&self) -> Option<Display> {
        self.display
    }

    pub fn set_display(&mut self, display: Display) {
        self.display = Some(display);
    }

    pub fn is_hidden(&self) -> bool {
        self.display == Some(Display::None)
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        out.push_str(&format!(" id=\"{}\"", escape_html(&self.id)));
        if let Some(display) = self.display {
            out.push_str(&format!(" style=\"display: {};\"", display.as_css()));
        }
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_html(value)));
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }
}

fn tag_for(id: &str) -> &'static str {
    match id {
        ids::THEME_TOGGLE => "button",
        ids::MAIN_HEADING => "h1",
        ids::VIDEO_IFRAME => "iframe",
        ids::PREV_LINK | ids::NEXT_LINK => "a",
        ids::NAV_SPACER => "span",
        ids::SIDEBAR_LIST => "ul",
        _ => "div",
    }
}

/// The document: title, body classes, and the addressable elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    title: String,
    body_classes: BTreeSet<String>,
    body_notice: Option<String>,
    elements: BTreeMap<String, Element>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::with_elements(ids::ALL)
    }
}

impl Shell {
    pub fn with_elements<'a>(element_ids: impl IntoIterator<Item = &'a str>) -> Self {
        let elements = element_ids
            .into_iter()
            .map(|id| (id.to_owned(), Element::new(id, tag_for(id))))
            .collect();
        Self {
            title: String::new(),
            body_classes: BTreeSet::new(),
            body_notice: None,
            elements,
        }
    }

    /// A complete shell minus the given elements.
    pub fn without(missing: &[&str]) -> Self {
        Self::with_elements(ids::ALL.into_iter().filter(|id| !missing.contains(id)))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Looks up an element for an update, logging when it is missing.
    pub fn require_mut(&mut self, id: &str) -> Option<&mut Element> {
        let element = self.elements.get_mut(id);
        if element.is_none() {
            tracing::warn!(element = id, "element not found; skipping update");
        }
        element
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    pub fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_owned());
    }

    pub fn remove_body_class(&mut self, class: &str) {
        self.body_classes.remove(class);
    }

    pub fn body_notice(&self) -> Option<&str> {
        self.body_notice.as_deref()
    }

    /// Writes an error into the main content area: the Markdown container when
    /// it exists, otherwise a notice at the top of the body.
    pub fn show_error(&mut self, message: &str) {
        let html = error_paragraph(message);
        match self.elements.get_mut(ids::MARKDOWN_CONTENT) {
            Some(container) => container.set_inner_html(html),
            None => self.body_notice = Some(html),
        }
    }

    /// Serializes the shell as a standalone HTML document.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!doctype html>\n");
        out.push_str("<html>\n");
        out.push_str("<head>\n");
        out.push_str("<meta charset=\"utf-8\" />\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.title)));
        out.push_str("<link rel=\"stylesheet\" href=\"style.css\" />\n");
        out.push_str("</head>\n");

        if self.body_classes.is_empty() {
            out.push_str("<body>\n");
        } else {
            let classes = self
                .body_classes
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>();
            out.push_str(&format!(
                "<body class=\"{}\">\n",
                escape_html(&classes.join(" "))
            ));
        }
        if let Some(notice) = &self.body_notice {
            out.push_str(notice);
            out.push('\n');
        }

        out.push_str("<header>\n");
        self.write_element(&mut out, ids::THEME_TOGGLE);
        out.push_str("</header>\n");

        out.push_str("<aside class=\"sidebar\">\n");
        self.write_element(&mut out, ids::SIDEBAR_LIST);
        out.push_str("</aside>\n");

        out.push_str("<main class=\"page-content-wrapper\">\n");
        self.write_element(&mut out, ids::MAIN_HEADING);
        if let Some(container) = self.element(ids::VIDEO_CONTAINER) {
            let mut container = container.clone();
            if let Some(iframe) = self.element(ids::VIDEO_IFRAME) {
                let mut inner = String::new();
                iframe.write_html(&mut inner);
                container.set_inner_html(inner);
            }
            container.write_html(&mut out);
            out.push('\n');
        } else {
            self.write_element(&mut out, ids::VIDEO_IFRAME);
        }
        self.write_element(&mut out, ids::MARKDOWN_CONTENT);

        out.push_str("<nav class=\"page-navigation\">\n");
        self.write_element(&mut out, ids::PREV_LINK);
        self.write_element(&mut out, ids::NAV_SPACER);
        self.write_element(&mut out, ids::NEXT_LINK);
        out.push_str("</nav>\n");
        out.push_str("</main>\n");

        out.push_str("</body>\n");
        out.push_str("</html>\n");
        out
    }

    fn write_element(&self, out: &mut String, id: &str) {
        if let Some(element) = self.element(id) {
            element.write_html(out);
            out.push('\n');
        }
    }
}

pub fn error_paragraph(message: &str) -> String {
    format!("<p style=\"color: red;\">{}</p>", escape_html(message))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
