//! One page view: fetch the registry, resolve the active page, then paint
//! content, Markdown, navigation, and sidebar in that order.

use crate::config::SiteConfig;
use crate::fetch::{Fetch, FetchError};
use crate::registry::PageRegistry;
use crate::render::{self, MarkdownOutcome, NavState};
use crate::resolve::{self, Resolution, ResolveError};
use crate::shell::{Shell, error_paragraph, ids};

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("load page registry")]
    RegistryUnavailable(#[source] FetchError),
    #[error("page registry is empty")]
    EmptyRegistry,
}

impl From<ResolveError> for ViewError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptyRegistry => Self::EmptyRegistry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewReport {
    pub active_id: String,
    /// Set when the requested id was unknown and the first page was shown.
    pub not_found: Option<String>,
    pub markdown: MarkdownOutcome,
    pub nav: NavState,
    pub sidebar_entries: usize,
}

/// State for a single page load. Built from the fetched registry and the
/// requested page id, then consumed by [`PageView::render`].
#[derive(Debug, Clone)]
pub struct PageView {
    registry: PageRegistry,
    requested: Option<String>,
}

impl PageView {
    pub fn new(registry: PageRegistry, requested: Option<String>) -> Self {
        Self {
            registry,
            requested,
        }
    }

    /// Fetches and parses the registry. `location` is the current URL or query.
    pub async fn load(
        fetcher: &dyn Fetch,
        config: &SiteConfig,
        location: Option<&str>,
    ) -> Result<Self, ViewError> {
        let text = fetcher
            .fetch_text(&config.registry_path)
            .await
            .map_err(ViewError::RegistryUnavailable)?;
        let registry = PageRegistry::parse(&text, config.delimiter);
        let requested = location.and_then(resolve::page_id_from_location);
        tracing::debug!(
            pages = registry.len(),
            requested = requested.as_deref().unwrap_or(""),
            "loaded page registry"
        );
        Ok(Self::new(registry, requested))
    }

    pub fn registry(&self) -> &PageRegistry {
        &self.registry
    }

    pub async fn render(
        self,
        shell: &mut Shell,
        fetcher: &dyn Fetch,
        config: &SiteConfig,
    ) -> Result<ViewReport, ViewError> {
        let resolution = resolve::resolve(&self.registry, self.requested.as_deref())?;
        let active = resolution.active();
        let not_found = match resolution {
            Resolution::NotFound { requested, .. } => {
                shell.show_error(&config.page_not_found_message(requested));
                Some(requested.to_owned())
            }
            Resolution::Requested(_) | Resolution::Default(_) => None,
        };

        render::render_page_elements(shell, active, config);
        let markdown = render::render_markdown(shell, active, fetcher, config).await;
        let nav = render::render_navigation(shell, active, config);
        let sidebar_entries = render::render_sidebar(shell, &self.registry, &active.id, config);

        // Markdown rendering replaces the container, so restore the notice on top.
        if let Some(requested) = &not_found {
            let notice = error_paragraph(&config.page_not_found_message(requested));
            match shell.element_mut(ids::MARKDOWN_CONTENT) {
                Some(container) => {
                    let body = container.inner_html().to_owned();
                    container.set_inner_html(format!("{notice}{body}"));
                }
                None => shell.show_error(&config.page_not_found_message(requested)),
            }
        }

        tracing::info!(
            page = %active.id,
            fallback = not_found.is_some(),
            "rendered page"
        );
        Ok(ViewReport {
            active_id: active.id.clone(),
            not_found,
            markdown,
            nav,
            sidebar_entries,
        })
    }
}

/// Runs the whole pipeline. Fatal failures are painted into the shell as a
/// visible error before being returned.
pub async fn render_page(
    shell: &mut Shell,
    fetcher: &dyn Fetch,
    config: &SiteConfig,
    location: Option<&str>,
) -> Result<ViewReport, ViewError> {
    let result = match PageView::load(fetcher, config, location).await {
        Ok(view) => view.render(shell, fetcher, config).await,
        Err(err) => Err(err),
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "page view failed");
        let message = match err {
            ViewError::RegistryUnavailable(_) => &config.registry_load_failed,
            ViewError::EmptyRegistry => &config.config_error,
        };
        shell.show_error(message);
    }
    result
}
