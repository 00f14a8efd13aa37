use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use grabber_logging::grabber_warn;
use thiserror::Error;
use url::Url;

use crate::decode::decode_page;
use crate::fetch::Fetcher;
use crate::FetchError;

/// Page whose images are collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTarget {
    Url(String),
    /// Saved HTML; `base_url` stands in for the address the page was served from.
    File {
        path: PathBuf,
        base_url: Option<String>,
    },
}

impl PageTarget {
    pub fn describe(&self) -> String {
        match self {
            PageTarget::Url(url) => url.clone(),
            PageTarget::File { path, .. } => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDocument {
    pub url: Option<Url>,
    pub html: String,
    pub encoding_label: String,
}

impl PageDocument {
    pub fn from_html(html: impl Into<String>, url: Option<Url>) -> Self {
        Self {
            url,
            html: html.into(),
            encoding_label: "UTF-8".to_string(),
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.url.as_ref().and_then(Url::host_str)
    }
}

#[derive(Debug, Error)]
pub enum PageLoadError {
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid base url {url}")]
    InvalidBaseUrl { url: String },
}

pub async fn load_page(
    target: &PageTarget,
    fetcher: &dyn Fetcher,
) -> Result<PageDocument, PageLoadError> {
    match target {
        PageTarget::Url(url) => {
            let output = fetcher.fetch(url).await?;
            let decoded = decode_page(&output.bytes, output.metadata.content_type.as_deref());
            if decoded.had_errors {
                grabber_warn!(
                    "Page {} had malformed {} sequences",
                    url,
                    decoded.encoding_label
                );
            }
            let final_url = Url::parse(&output.metadata.final_url).ok();
            Ok(PageDocument {
                url: final_url,
                html: decoded.html,
                encoding_label: decoded.encoding_label,
            })
        }
        PageTarget::File { path, base_url } => load_file(path, base_url.as_deref()),
    }
}

fn load_file(path: &Path, base_url: Option<&str>) -> Result<PageDocument, PageLoadError> {
    let io_error = |source| PageLoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = fs::read(path).map_err(io_error)?;

    let url = match base_url {
        Some(raw) => Url::parse(raw).map_err(|_| PageLoadError::InvalidBaseUrl {
            url: raw.to_string(),
        })?,
        None => {
            let absolute = fs::canonicalize(path).map_err(io_error)?;
            Url::from_file_path(&absolute).map_err(|_| PageLoadError::InvalidBaseUrl {
                url: absolute.display().to_string(),
            })?
        }
    };

    let decoded = decode_page(&bytes, None);
    Ok(PageDocument {
        url: Some(url),
        html: decoded.html,
        encoding_label: decoded.encoding_label,
    })
}
