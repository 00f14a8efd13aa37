//! Grabber core: pure controller state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, DEFAULT_ARCHIVE_NAME};
pub use msg::{Msg, WorkerOutcome};
pub use state::{AppState, Phase};
pub use update::update;
pub use view_model::AppViewModel;
