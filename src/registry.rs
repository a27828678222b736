//! Page registry: the delimiter-separated page index that drives content
//! lookup, navigation, and the sidebar.
//!
//! Splitting is deliberately naive. There is no quoting or escaping, so a value
//! that contains the delimiter produces a row with too many fields and that row
//! is skipped like any other malformed row.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

/// One row of the registry, validated once at parse time.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PageRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h1_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iframe_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_text: Option<String>,
}

/// A navigation pointer that is only usable when both the id and its label exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTarget<'a> {
    pub id: &'a str,
    pub label: &'a str,
}

impl PageRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    fn from_row(mut row: BTreeMap<&str, &str>) -> Option<Self> {
        let mut take = |name: &str| {
            row.remove(name)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        let id = take("id")?;
        Some(Self {
            id,
            page_title: take("page_title"),
            h1_content: take("h1_content"),
            iframe_src: take("iframe_src"),
            markdown_file: take("markdown_file"),
            prev_id: take("prev_id"),
            prev_text: take("prev_text"),
            next_id: take("next_id"),
            next_text: take("next_text"),
        })
    }

    pub fn prev(&self) -> Option<NavTarget<'_>> {
        nav_target(self.prev_id.as_deref(), self.prev_text.as_deref())
    }

    pub fn next(&self) -> Option<NavTarget<'_>> {
        nav_target(self.next_id.as_deref(), self.next_text.as_deref())
    }

    /// The embeddable video URL, if one is set and not blank.
    pub fn video_src(&self) -> Option<&str> {
        self.iframe_src
            .as_deref()
            .map(str::trim)
            .filter(|src| !src.is_empty())
    }
}

fn nav_target<'a>(id: Option<&'a str>, label: Option<&'a str>) -> Option<NavTarget<'a>> {
    match (id, label) {
        (Some(id), Some(label)) if !id.is_empty() && !label.is_empty() => {
            Some(NavTarget { id, label })
        }
        _ => None,
    }
}

/// Ordered, read-only collection of page records. The first record is the
/// default landing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRegistry {
    records: Vec<PageRecord>,
}

impl PageRegistry {
    pub fn from_records(records: Vec<PageRecord>) -> Self {
        Self { records }
    }

    /// Parses delimiter-separated text whose first non-empty line is the header.
    ///
    /// Malformed rows are skipped with a warning; an empty input yields an empty
    /// registry.
    pub fn parse(text: &str, delimiter: char) -> Self {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Self::default();
        };
        let headers = header_line
            .split(delimiter)
            .map(str::trim)
            .collect::<Vec<_>>();
        if !headers.contains(&"id") {
            tracing::warn!(?headers, "registry header has no `id` column");
        }

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for (idx, line) in lines {
            let line_no = idx + 1;
            let values = line.split(delimiter).map(str::trim).collect::<Vec<_>>();
            if values.len() != headers.len() {
                tracing::warn!(
                    line = line_no,
                    expected = headers.len(),
                    found = values.len(),
                    "skipping registry row with wrong number of columns"
                );
                continue;
            }

            let row = headers
                .iter()
                .copied()
                .zip(values)
                .collect::<BTreeMap<_, _>>();
            let Some(record) = PageRecord::from_row(row) else {
                tracing::warn!(line = line_no, "skipping registry row without an id");
                continue;
            };
            if !seen.insert(record.id.clone()) {
                tracing::warn!(
                    line = line_no,
                    id = %record.id,
                    "skipping registry row with duplicate id; the first occurrence wins"
                );
                continue;
            }
            records.push(record);
        }

        tracing::debug!(records = records.len(), "parsed page registry");
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&PageRecord> {
        self.records.first()
    }

    pub fn get(&self, id: &str) -> Option<&PageRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a PageRegistry {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
