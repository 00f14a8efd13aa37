use std::fmt;

use serde::Serialize;

use crate::archive::ArchiveHandle;

/// Message used when a page has no `<img>` elements at all.
pub const NO_IMAGES_MESSAGE: &str = "No images found on this page.";

/// One `<img>` element found on the page, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub index: usize,
    /// Source resolved against the document base; empty when the element has none.
    pub src: String,
}

impl ImageReference {
    /// Empty sources and inline `data:` URIs are never fetched.
    pub fn is_skippable(&self) -> bool {
        is_skippable_src(&self.src)
    }
}

pub(crate) fn is_skippable_src(src: &str) -> bool {
    let trimmed = src.trim();
    trimmed.is_empty()
        || trimmed
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Progress after one image attempt. Serializes to the `updateProgress` message shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename = "updateProgress")]
pub struct ProgressEvent {
    pub percent: u8,
    pub processed: usize,
    pub total: usize,
}

impl ProgressEvent {
    pub fn new(processed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((processed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            percent,
            processed,
            total,
        }
    }

    pub fn is_final(&self) -> bool {
        self.processed == self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub added: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn message(&self) -> String {
        format!(
            "Processed {} images ({} added to ZIP, {} skipped)",
            self.processed, self.added, self.skipped
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Terminal value of one worker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultDescriptor {
    Success {
        archive: ArchiveHandle,
        filename: String,
        summary: RunSummary,
    },
    Failure {
        message: String,
    },
}

impl ResultDescriptor {
    pub fn is_success(&self) -> bool {
        matches!(self, ResultDescriptor::Success { .. })
    }

    pub fn message(&self) -> String {
        match self {
            ResultDescriptor::Success { summary, .. } => summary.message(),
            ResultDescriptor::Failure { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    Progress(ProgressEvent),
    RunCompleted(Result<ResultDescriptor, crate::EngineError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub redirected: bool,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
