use crate::registry::{PageRecord, PageRegistry};

/// Query parameter that selects the active page.
pub const PAGE_PARAM: &str = "page";

/// Extracts the `page` query value from a location.
///
/// Accepts a full URL (`https://host/index.html?page=a`), a relative reference
/// (`index.html?page=a`), or a bare query (`?page=a`, `page=a`). An empty value
/// is treated as absent.
pub fn page_id_from_location(location: &str) -> Option<String> {
    let without_fragment = location.split('#').next().unwrap_or(location);
    let query = match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains('=') => without_fragment,
        None => return None,
    };

    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PAGE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Outcome of selecting the active page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The requested id matched a record.
    Requested(&'a PageRecord),
    /// No id was requested; the first record is active.
    Default(&'a PageRecord),
    /// The requested id matched nothing; the first record is rendered instead.
    NotFound {
        requested: &'a str,
        fallback: &'a PageRecord,
    },
}

impl<'a> Resolution<'a> {
    pub fn active(&self) -> &'a PageRecord {
        match *self {
            Self::Requested(record) | Self::Default(record) => record,
            Self::NotFound { fallback, .. } => fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("page registry is empty")]
    EmptyRegistry,
}

pub fn resolve<'a>(
    registry: &'a PageRegistry,
    requested: Option<&'a str>,
) -> Result<Resolution<'a>, ResolveError> {
    let first = registry.first().ok_or(ResolveError::EmptyRegistry)?;

    let Some(requested) = requested else {
        return Ok(Resolution::Default(first));
    };

    match registry.get(requested) {
        Some(record) => Ok(Resolution::Requested(record)),
        None => {
            tracing::error!(page = requested, "requested page was not found");
            tracing::info!(fallback = %first.id, "rendering first page as fallback");
            Ok(Resolution::NotFound {
                requested,
                fallback: first,
            })
        }
    }
}
