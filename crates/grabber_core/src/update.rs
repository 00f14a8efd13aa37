use crate::state::STATUS_FAILED;
use crate::{AppState, Effect, Msg, Phase, WorkerOutcome, DEFAULT_ARCHIVE_NAME};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DownloadClicked => match state.phase() {
            // One run at a time; there is no way to abort one in flight.
            Phase::Running | Phase::Saving => Vec::new(),
            Phase::Idle | Phase::Completed | Phase::Failed => {
                state.begin_run();
                vec![Effect::RunWorker]
            }
        },
        Msg::ProgressUpdated {
            percent,
            processed,
            total,
        } => {
            if state.phase() == Phase::Running {
                state.apply_progress(percent, processed, total);
            }
            Vec::new()
        }
        Msg::WorkerFinished(outcome) => {
            if state.phase() != Phase::Running {
                return (state, Vec::new());
            }
            match outcome {
                WorkerOutcome::Success { filename, summary } => {
                    let filename = filename
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string());
                    state.apply_success(summary, filename.clone());
                    vec![Effect::TriggerDownload { filename }]
                }
                WorkerOutcome::Failure { message } => {
                    let text = message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| STATUS_FAILED.to_string());
                    state.apply_failure(text);
                    Vec::new()
                }
            }
        }
        Msg::WorkerErrored(message) | Msg::DownloadFailed(message) => {
            state.apply_failure(format!("Error: {message}"));
            Vec::new()
        }
        Msg::DownloadSaved { location } => {
            if state.phase() == Phase::Saving {
                state.apply_saved(location);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
