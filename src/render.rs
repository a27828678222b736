//! Paints one page record into the shell: title, heading, video, Markdown
//! body, previous/next links, and the sidebar.

use crate::config::SiteConfig;
use crate::fetch::Fetch;
use crate::registry::{NavTarget, PageRecord, PageRegistry};
use crate::shell::{Display, Shell, error_paragraph, escape_html, ids};

pub fn render_page_elements(shell: &mut Shell, record: &PageRecord, config: &SiteConfig) {
    let title = record
        .page_title
        .as_deref()
        .unwrap_or(&config.default_title);
    shell.set_title(title);

    if let Some(heading) = shell.require_mut(ids::MAIN_HEADING) {
        heading.set_text(
            record
                .h1_content
                .as_deref()
                .unwrap_or(&config.default_heading),
        );
    }

    render_video(shell, record);
}

fn render_video(shell: &mut Shell, record: &PageRecord) {
    if shell.element(ids::VIDEO_CONTAINER).is_none() || shell.element(ids::VIDEO_IFRAME).is_none()
    {
        tracing::warn!("video elements not found; skipping video update");
        return;
    }

    let src = record.video_src();
    if let Some(iframe) = shell.element_mut(ids::VIDEO_IFRAME) {
        iframe.set_attr("src", src.unwrap_or_default());
    }
    if let Some(container) = shell.element_mut(ids::VIDEO_CONTAINER) {
        container.set_display(if src.is_some() {
            Display::Block
        } else {
            Display::None
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownOutcome {
    Rendered { path: String },
    Placeholder,
    FetchFailed { path: String },
    ContainerMissing,
}

/// Fills the Markdown container from the record's `markdown_file`.
///
/// A fetch failure stays local to the container.
pub async fn render_markdown(
    shell: &mut Shell,
    record: &PageRecord,
    fetcher: &dyn Fetch,
    config: &SiteConfig,
) -> MarkdownOutcome {
    if shell.element(ids::MARKDOWN_CONTENT).is_none() {
        tracing::error!(
            element = ids::MARKDOWN_CONTENT,
            "markdown container not found; skipping content"
        );
        return MarkdownOutcome::ContainerMissing;
    }

    let Some(path) = record
        .markdown_file
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
    else {
        tracing::warn!(page = %record.id, "no markdown file for page");
        set_content(shell, format!("<p>{}</p>", escape_html(&config.content_not_specified)));
        return MarkdownOutcome::Placeholder;
    };

    if let Some(container) = shell.element_mut(ids::MARKDOWN_CONTENT) {
        container.set_attr("data-markdown-file", path);
    }

    match fetcher.fetch_text(path).await {
        Ok(text) => {
            tracing::debug!(
                path,
                preview = %text.chars().take(200).collect::<String>(),
                "loaded markdown"
            );
            set_content(shell, crate::markdown::to_html(&text));
            MarkdownOutcome::Rendered {
                path: path.to_owned(),
            }
        }
        Err(err) => {
            tracing::error!(path, error = %err, "failed to load markdown");
            set_content(
                shell,
                error_paragraph(&config.markdown_load_failed_message(path)),
            );
            MarkdownOutcome::FetchFailed {
                path: path.to_owned(),
            }
        }
    }
}

fn set_content(shell: &mut Shell, html: String) {
    if let Some(container) = shell.element_mut(ids::MARKDOWN_CONTENT) {
        container.set_inner_html(html);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub prev_visible: bool,
    pub next_visible: bool,
}

impl NavState {
    pub fn spacer_visible(&self) -> bool {
        self.prev_visible && self.next_visible
    }
}

pub fn render_navigation(shell: &mut Shell, record: &PageRecord, config: &SiteConfig) -> NavState {
    let state = NavState {
        prev_visible: render_nav_link(shell, ids::PREV_LINK, record.prev(), config),
        next_visible: render_nav_link(shell, ids::NEXT_LINK, record.next(), config),
    };

    if let Some(spacer) = shell.require_mut(ids::NAV_SPACER) {
        spacer.set_display(if state.spacer_visible() {
            Display::InlineBlock
        } else {
            Display::None
        });
    }

    state
}

fn render_nav_link(
    shell: &mut Shell,
    id: &str,
    target: Option<NavTarget<'_>>,
    config: &SiteConfig,
) -> bool {
    let Some(link) = shell.require_mut(id) else {
        return false;
    };

    match target {
        Some(target) => {
            link.set_attr("href", config.page_href(target.id));
            // Labels may carry entities such as `&larr;`.
            link.set_inner_html(target.label);
            link.set_display(Display::InlineBlock);
            true
        }
        None => {
            link.set_display(Display::None);
            false
        }
    }
}

/// Rebuilds the sidebar list and returns the number of entries.
pub fn render_sidebar(
    shell: &mut Shell,
    registry: &PageRegistry,
    active_id: &str,
    config: &SiteConfig,
) -> usize {
    let Some(list) = shell.element_mut(ids::SIDEBAR_LIST) else {
        tracing::error!(element = ids::SIDEBAR_LIST, "sidebar list not found");
        return 0;
    };

    let mut html = String::new();
    for record in registry {
        let label = record
            .page_title
            .clone()
            .or_else(|| record.h1_content.clone())
            .unwrap_or_else(|| config.sidebar_fallback(&record.id));
        let class = if record.id == active_id {
            " class=\"active\""
        } else {
            ""
        };
        html.push_str(&format!(
            "<li><a href=\"{}\"{class}>{}</a></li>",
            escape_html(&config.page_href(&record.id)),
            escape_html(&label)
        ));
    }
    list.set_inner_html(html);

    registry.len()
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::fetch::FetchError;

    struct StaticFetch(Option<&'static str>);

    #[async_trait]
    impl Fetch for StaticFetch {
        async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
            match self.0 {
                Some(text) => Ok(text.to_owned()),
                None => Err(FetchError::Status {
                    path: path.to_owned(),
                    status: 404,
                }),
            }
        }
    }

    fn inner(shell: &Shell, id: &str) -> String {
        shell
            .element(id)
            .map(|e| e.inner_html().to_owned())
            .unwrap_or_default()
    }

    #[test]
    fn title_and_heading_fall_back_to_defaults() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        render_page_elements(&mut shell, &PageRecord::new("a"), &config);

        assert_eq!(shell.title(), "Tutorial OWL Odoo 17");
        assert_eq!(inner(&shell, ids::MAIN_HEADING), "Tutorial");
    }

    #[test]
    fn video_shown_only_with_source() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut record = PageRecord::new("a");
        record.iframe_src = Some("https://www.youtube.com/embed/abc".to_owned());
        render_page_elements(&mut shell, &record, &config);

        assert_eq!(
            shell.element(ids::VIDEO_CONTAINER).and_then(|e| e.display()),
            Some(Display::Block)
        );
        assert_eq!(
            shell.element(ids::VIDEO_IFRAME).and_then(|e| e.attr("src")),
            Some("https://www.youtube.com/embed/abc")
        );

        record.iframe_src = Some("  ".to_owned());
        render_page_elements(&mut shell, &record, &config);
        assert!(
            shell
                .element(ids::VIDEO_CONTAINER)
                .is_some_and(|e| e.is_hidden())
        );
        assert_eq!(
            shell.element(ids::VIDEO_IFRAME).and_then(|e| e.attr("src")),
            Some("")
        );
    }

    #[test]
    fn missing_heading_does_not_stop_video_update() {
        let config = SiteConfig::default();
        let mut shell = Shell::without(&[ids::MAIN_HEADING]);
        render_page_elements(&mut shell, &PageRecord::new("a"), &config);

        assert!(
            shell
                .element(ids::VIDEO_CONTAINER)
                .is_some_and(|e| e.is_hidden())
        );
    }

    #[test]
    fn next_link_requires_id_and_label() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut record = PageRecord::new("a");
        record.next_id = Some("b".to_owned());
        record.next_text = Some("Next &rarr;".to_owned());

        let state = render_navigation(&mut shell, &record, &config);
        assert!(state.next_visible);
        assert!(!state.prev_visible);
        let next = shell.element(ids::NEXT_LINK);
        assert_eq!(next.and_then(|e| e.attr("href")), Some("?page=b"));
        assert_eq!(next.map(|e| e.inner_html()), Some("Next &rarr;"));
        assert!(next.is_some_and(|e| !e.is_hidden()));
        assert!(shell.element(ids::PREV_LINK).is_some_and(|e| e.is_hidden()));
        assert!(shell.element(ids::NAV_SPACER).is_some_and(|e| e.is_hidden()));

        record.next_text = None;
        let state = render_navigation(&mut shell, &record, &config);
        assert!(!state.next_visible);
        assert!(shell.element(ids::NEXT_LINK).is_some_and(|e| e.is_hidden()));
    }

    #[test]
    fn spacer_shown_when_both_links_visible() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut record = PageRecord::new("b");
        record.prev_id = Some("a".to_owned());
        record.prev_text = Some("Back".to_owned());
        record.next_id = Some("c".to_owned());
        record.next_text = Some("Next".to_owned());

        let state = render_navigation(&mut shell, &record, &config);
        assert!(state.spacer_visible());
        assert_eq!(
            shell.element(ids::NAV_SPACER).and_then(|e| e.display()),
            Some(Display::InlineBlock)
        );
    }

    #[test]
    fn missing_link_element_is_not_visible() {
        let config = SiteConfig::default();
        let mut shell = Shell::without(&[ids::PREV_LINK]);
        let mut record = PageRecord::new("b");
        record.prev_id = Some("a".to_owned());
        record.prev_text = Some("Back".to_owned());
        record.next_id = Some("c".to_owned());
        record.next_text = Some("Next".to_owned());

        let state = render_navigation(&mut shell, &record, &config);
        assert!(!state.prev_visible);
        assert!(!state.spacer_visible());
    }

    #[test]
    fn sidebar_labels_and_active_entry() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut a = PageRecord::new("a");
        a.page_title = Some("Intro".to_owned());
        let mut b = PageRecord::new("b");
        b.h1_content = Some("Setup <env>".to_owned());
        let c = PageRecord::new("c");
        let registry = PageRegistry::from_records(vec![a, b, c]);

        assert_eq!(render_sidebar(&mut shell, &registry, "b", &config), 3);
        assert_eq!(
            inner(&shell, ids::SIDEBAR_LIST),
            "<li><a href=\"?page=a\">Intro</a></li>\
             <li><a href=\"?page=b\" class=\"active\">Setup &lt;env&gt;</a></li>\
             <li><a href=\"?page=c\">Page c</a></li>"
        );

        // Rebuilt from scratch, not appended.
        render_sidebar(&mut shell, &registry, "a", &config);
        assert_eq!(inner(&shell, ids::SIDEBAR_LIST).matches("<li>").count(), 3);
        assert!(
            inner(&shell, ids::SIDEBAR_LIST)
                .starts_with("<li><a href=\"?page=a\" class=\"active\">")
        );
    }

    #[test]
    fn sidebar_marks_one_entry_when_ids_repeat() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let registry = PageRegistry::parse("id,page_title\na,First\na,Second\nb,B\n", ',');

        assert_eq!(render_sidebar(&mut shell, &registry, "a", &config), 2);
        let html = inner(&shell, ids::SIDEBAR_LIST);
        assert_eq!(html.matches("class=\"active\"").count(), 1);
        assert!(html.contains("<a href=\"?page=a\" class=\"active\">First</a>"));
        assert!(!html.contains("Second"));
    }

    #[test]
    fn missing_sidebar_list_is_skipped() {
        let config = SiteConfig::default();
        let mut shell = Shell::without(&[ids::SIDEBAR_LIST]);
        let registry = PageRegistry::from_records(vec![PageRecord::new("a")]);

        assert_eq!(render_sidebar(&mut shell, &registry, "a", &config), 0);
        assert!(shell.element(ids::SIDEBAR_LIST).is_none());
    }

    #[test]
    fn missing_spacer_keeps_links() {
        let config = SiteConfig::default();
        let mut shell = Shell::without(&[ids::NAV_SPACER]);
        let mut record = PageRecord::new("b");
        record.prev_id = Some("a".to_owned());
        record.prev_text = Some("Back".to_owned());
        record.next_id = Some("c".to_owned());
        record.next_text = Some("Next".to_owned());

        let state = render_navigation(&mut shell, &record, &config);
        assert!(state.spacer_visible());
        assert!(shell.element(ids::PREV_LINK).is_some_and(|e| !e.is_hidden()));
        assert!(shell.element(ids::NEXT_LINK).is_some_and(|e| !e.is_hidden()));
    }

    #[tokio::test]
    async fn markdown_rendered_from_fetch() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut record = PageRecord::new("a");
        record.markdown_file = Some("md/a.md".to_owned());

        let outcome =
            render_markdown(&mut shell, &record, &StaticFetch(Some("# Hello")), &config).await;
        assert_eq!(
            outcome,
            MarkdownOutcome::Rendered {
                path: "md/a.md".to_owned()
            }
        );
        assert!(inner(&shell, ids::MARKDOWN_CONTENT).contains("<h1>Hello</h1>"));
        assert_eq!(
            shell
                .element(ids::MARKDOWN_CONTENT)
                .and_then(|e| e.attr("data-markdown-file")),
            Some("md/a.md")
        );
    }

    #[tokio::test]
    async fn markdown_fetch_failure_names_path() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();
        let mut record = PageRecord::new("a");
        record.markdown_file = Some("md/gone.md".to_owned());

        let outcome = render_markdown(&mut shell, &record, &StaticFetch(None), &config).await;
        assert!(matches!(outcome, MarkdownOutcome::FetchFailed { .. }));
        let content = inner(&shell, ids::MARKDOWN_CONTENT);
        assert!(content.contains("md/gone.md"));
        assert!(content.contains("color: red"));
    }

    #[tokio::test]
    async fn markdown_placeholder_without_file() {
        let config = SiteConfig::default();
        let mut shell = Shell::default();

        let outcome = render_markdown(
            &mut shell,
            &PageRecord::new("a"),
            &StaticFetch(Some("unused")),
            &config,
        )
        .await;
        assert_eq!(outcome, MarkdownOutcome::Placeholder);
        assert_eq!(
            inner(&shell, ids::MARKDOWN_CONTENT),
            "<p>Tutorial content is not specified.</p>"
        );
    }

    #[tokio::test]
    async fn markdown_container_missing_aborts() {
        let config = SiteConfig::default();
        let mut shell = Shell::without(&[ids::MARKDOWN_CONTENT]);
        let mut record = PageRecord::new("a");
        record.markdown_file = Some("md/a.md".to_owned());

        let outcome =
            render_markdown(&mut shell, &record, &StaticFetch(Some("# Hi")), &config).await;
        assert_eq!(outcome, MarkdownOutcome::ContainerMissing);
    }
}
