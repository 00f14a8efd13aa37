use crate::view_model::AppViewModel;

pub(crate) const STATUS_PREPARING: &str = "Preparing to download...";
pub(crate) const STATUS_COMPLETE: &str = "Download complete!";
pub(crate) const STATUS_FAILED: &str = "Download failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    /// Worker succeeded; the archive is being written.
    Saving,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: Phase,
    status_text: String,
    progress_percent: u8,
    processed: usize,
    total: usize,
    summary: Option<String>,
    archive_name: Option<String>,
    saved_location: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.phase,
            status_text: self.status_text.clone(),
            progress_percent: self.progress_percent,
            processed: self.processed,
            total: self.total,
            summary: self.summary.clone(),
            archive_name: self.archive_name.clone(),
            saved_location: self.saved_location.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_run(&mut self) {
        *self = Self {
            phase: Phase::Running,
            status_text: STATUS_PREPARING.to_string(),
            dirty: true,
            ..Self::default()
        };
    }

    pub(crate) fn apply_progress(&mut self, percent: u8, processed: usize, total: usize) {
        self.progress_percent = percent.min(100);
        self.processed = processed;
        self.total = total;
        self.status_text = format!(
            "Processing images... {}/{} ({}%)",
            processed, total, self.progress_percent
        );
        self.dirty = true;
    }

    pub(crate) fn apply_success(&mut self, summary: String, archive_name: String) {
        self.phase = Phase::Saving;
        self.progress_percent = 100;
        self.status_text = STATUS_COMPLETE.to_string();
        self.summary = Some(summary);
        self.archive_name = Some(archive_name);
        self.dirty = true;
    }

    pub(crate) fn apply_failure(&mut self, status_text: String) {
        self.phase = Phase::Failed;
        self.status_text = status_text;
        self.dirty = true;
    }

    pub(crate) fn apply_saved(&mut self, location: String) {
        self.phase = Phase::Completed;
        self.saved_location = Some(location);
        self.dirty = true;
    }
}
