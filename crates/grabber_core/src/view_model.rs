use crate::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub status_text: String,
    pub progress_percent: u8,
    pub processed: usize,
    pub total: usize,
    /// Summary line of a successful run.
    pub summary: Option<String>,
    /// Name the archive is saved under.
    pub archive_name: Option<String>,
    pub saved_location: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Completed | Phase::Failed)
    }
}
