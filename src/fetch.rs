use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid site path: {path}")]
    InvalidPath { path: String },
    #[error("request failed: {path}")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected status {status} for {path}")]
    Status { path: String, status: u16 },
    #[error("read failed: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidPath { path }
            | Self::Network { path, .. }
            | Self::Status { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Retrieves text documents relative to the site root.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError>;
}

/// Fetches over HTTP(S) relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base: Url,
}

impl HttpFetcher {
    pub fn new(base: Url) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|err| anyhow::anyhow!("build site http client: {err}"))?;
        Ok(Self::with_client(client, base))
    }

    pub fn with_client(client: reqwest::Client, mut base: Url) -> Self {
        // Relative joins resolve against the last path segment's directory.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Self { client, base }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|_| FetchError::InvalidPath {
                path: path.to_owned(),
            })?;

        let resp = self
            .client
            .get(url.clone())
            .header(reqwest::header::USER_AGENT, "tutorialsite/0.1")
            .send()
            .await
            .map_err(|source| FetchError::Network {
                path: path.to_owned(),
                source,
            })?;

        let status = resp.status();
        tracing::debug!(%url, status = status.as_u16(), "fetched");
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_owned(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| FetchError::Network {
            path: path.to_owned(),
            source,
        })
    }
}

/// Reads files from a local site directory.
#[derive(Debug, Clone)]
pub struct DirFetcher {
    root: PathBuf,
}

impl DirFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = path.split(['?', '#']).next().unwrap_or(path);
        let mut out = self.root.clone();
        for component in Path::new(relative.trim_start_matches('/')).components() {
            match component {
                Component::Normal(segment) => out.push(segment),
                Component::CurDir => {}
                _ => {
                    return Err(FetchError::InvalidPath {
                        path: path.to_owned(),
                    });
                }
            }
        }
        if out == self.root {
            return Err(FetchError::InvalidPath {
                path: path.to_owned(),
            });
        }
        Ok(out)
    }
}

#[async_trait]
impl Fetch for DirFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        let bytes = tokio::fs::read(&file)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_owned(),
                source,
            })?;
        tracing::debug!(file = %file.display(), bytes = bytes.len(), "read");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Chooses a fetcher for a `--site` argument: an http(s) URL or a directory.
pub fn fetcher_for_site(site: &str) -> anyhow::Result<Box<dyn Fetch>> {
    if site.starts_with("http://") || site.starts_with("https://") {
        let base = Url::parse(site).map_err(|err| anyhow::anyhow!("parse site url: {err}"))?;
        return Ok(Box::new(HttpFetcher::new(base)?));
    }

    let root = PathBuf::from(site);
    if !root.is_dir() {
        anyhow::bail!("site directory does not exist: {}", root.display());
    }
    Ok(Box::new(DirFetcher::new(root)))
}
