use std::collections::VecDeque;

use anyhow::{bail, Result};
use grabber_core::{update, AppState, Msg, Phase};
use grabber_logging::{grabber_info, grabber_warn};

use super::config::GrabberConfig;
use super::effects::EffectRunner;
use super::ui::render::Renderer;
use crate::cli::Cli;

/// Runs one download to completion. Returns whether it produced an archive.
pub fn run_app(cli: Cli) -> Result<bool> {
    let Some(target) = cli.target() else {
        bail!("either a URL or --file is required");
    };
    let config = GrabberConfig::load(&cli)?;
    if let Some(destination) = config.log_destination() {
        if !grabber_logging::initialize(&destination, cli.log_level()) {
            eprintln!("Warning: logging disabled for {:?}", destination);
        }
    }
    grabber_info!("Starting grabber for {}", target.describe());

    let mut runner = EffectRunner::new(config.engine_config(), target, config.output_dir.clone());
    let mut renderer = Renderer::new(cli.json);
    let mut state = AppState::new();
    let mut inbox = VecDeque::from([Msg::DownloadClicked]);

    loop {
        let msg = match inbox.pop_front().or_else(|| runner.next_msg()) {
            Some(msg) => msg,
            None => {
                grabber_warn!("Engine stopped before the run finished");
                Msg::WorkerErrored("engine stopped unexpectedly".to_string())
            }
        };

        let (next, effects) = update(state, msg);
        state = next;
        if state.consume_dirty() {
            renderer.render(&state.view());
        }
        inbox.extend(runner.execute(effects));

        if inbox.is_empty() && state.view().is_finished() {
            break;
        }
    }

    let view = state.view();
    renderer.finish(&view)?;
    Ok(view.phase == Phase::Completed)
}
