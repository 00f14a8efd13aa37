#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked for the page's images.
    DownloadClicked,
    /// Worker finished one more image.
    ProgressUpdated {
        percent: u8,
        processed: usize,
        total: usize,
    },
    /// Worker resolved with its result descriptor.
    WorkerFinished(WorkerOutcome),
    /// The run died before producing a result (page load, archive serialization, ...).
    WorkerErrored(String),
    /// The archive was written out.
    DownloadSaved { location: String },
    /// Writing the archive failed.
    DownloadFailed(String),
    /// Fallback for placeholder wiring.
    NoOp,
}

/// What the controller needs to know about a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerOutcome {
    Success {
        filename: Option<String>,
        summary: String,
    },
    Failure {
        message: Option<String>,
    },
}
