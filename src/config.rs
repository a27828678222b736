use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

/// Fixed paths, labels, and messages used while rendering a page view.
///
/// Every field has a default, so a YAML file only needs to list overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub registry_path: String,
    pub delimiter: char,

    pub default_title: String,
    pub default_heading: String,
    /// Prefix placed before `?page=<id>` in generated links.
    pub link_base: String,

    pub storage_key: String,
    pub dark_class: String,
    pub switch_to_light_label: String,
    pub switch_to_dark_label: String,

    pub content_not_specified: String,
    pub markdown_load_failed: String,
    pub page_not_found: String,
    pub config_error: String,
    pub registry_load_failed: String,
    pub sidebar_fallback_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            registry_path: "pages.csv".to_owned(),
            delimiter: ',',
            default_title: "Tutorial OWL Odoo 17".to_owned(),
            default_heading: "Tutorial".to_owned(),
            link_base: String::new(),
            storage_key: "theme".to_owned(),
            dark_class: "dark-mode".to_owned(),
            switch_to_light_label: "Light mode".to_owned(),
            switch_to_dark_label: "Dark mode".to_owned(),
            content_not_specified: "Tutorial content is not specified.".to_owned(),
            markdown_load_failed: "Failed to load tutorial content from {path}.".to_owned(),
            page_not_found: "Error: page \"{id}\" was not found.".to_owned(),
            config_error: "Error: page configuration data was not found or the registry is empty."
                .to_owned(),
            registry_load_failed:
                "An error occurred while loading the page. Check the log for details.".to_owned(),
            sidebar_fallback_label: "Page {id}".to_owned(),
        }
    }
}

impl SiteConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("read site config: {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("parse site config: {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml).context("deserialize site config")?;
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// `<link_base>?page=<id>` with the id form-encoded.
    pub fn page_href(&self, id: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("page", id)
            .finish();
        format!("{}?{query}", self.link_base)
    }

    pub fn markdown_load_failed_message(&self, path: &str) -> String {
        self.markdown_load_failed.replace("{path}", path)
    }

    pub fn page_not_found_message(&self, id: &str) -> String {
        self.page_not_found.replace("{id}", id)
    }

    pub fn sidebar_fallback(&self, id: &str) -> String {
        self.sidebar_fallback_label.replace("{id}", id)
    }
}
