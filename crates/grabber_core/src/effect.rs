/// Download name used when the worker did not suggest one.
pub const DEFAULT_ARCHIVE_NAME: &str = "images.zip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the page and run the image worker against it.
    RunWorker,
    /// Save the finished archive under `filename`.
    TriggerDownload { filename: String },
}
