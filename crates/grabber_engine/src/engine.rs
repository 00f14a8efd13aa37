use std::sync::{mpsc, Arc};
use std::thread;

use grabber_logging::{grabber_error, grabber_info};
use thiserror::Error;

use crate::archive::ArchiveError;
use crate::fetch::{ChannelProgressSink, FetchSettings, ProgressSink, ReqwestFetcher};
use crate::naming::utc_timestamp;
use crate::page::{load_page, PageLoadError, PageTarget};
use crate::worker::{collect_images, WorkerOptions};
use crate::{EngineEvent, FetchError, ResultDescriptor};

/// Errors that end a run outright, as opposed to per-image failures which only count as skips.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    PageLoad(#[from] PageLoadError),
    #[error("failed to build archive: {0}")]
    Archive(#[from] ArchiveError),
    #[error("failed to set up HTTP client: {0}")]
    Client(#[from] FetchError),
    #[error("engine runtime unavailable: {0}")]
    Runtime(String),
}

#[derive(Clone)]
pub struct EngineConfig {
    pub page_fetch: FetchSettings,
    pub image_fetch: FetchSettings,
    pub worker: WorkerOptions,
    /// Clock used for the archive filename.
    pub timestamp: Arc<dyn Fn() -> String + Send + Sync>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_fetch: FetchSettings::for_pages(),
            image_fetch: FetchSettings::for_images(),
            worker: WorkerOptions::default(),
            timestamp: Arc::new(utc_timestamp),
        }
    }
}

/// Load the target page and collect its images, emitting progress to `sink`.
pub async fn grab_page(
    config: &EngineConfig,
    target: &PageTarget,
    sink: &dyn ProgressSink,
) -> Result<ResultDescriptor, EngineError> {
    let page_fetcher = ReqwestFetcher::new(config.page_fetch.clone())?;
    let page = load_page(target, &page_fetcher).await?;
    grabber_info!(
        "Loaded {} ({} bytes, {})",
        target.describe(),
        page.html.len(),
        page.encoding_label
    );

    let image_fetcher = ReqwestFetcher::new(config.image_fetch.clone())?;
    let timestamp = (config.timestamp)();
    let result = collect_images(&page, &image_fetcher, sink, &config.worker, &timestamp).await?;
    Ok(result)
}

enum EngineCommand {
    Run { target: PageTarget },
}

/// Runs pages on a dedicated thread; one run at a time, in submission order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    grabber_error!("Failed to start engine runtime: {}", err);
                    while cmd_rx.recv().is_ok() {
                        let _ = event_tx.send(EngineEvent::RunCompleted(Err(
                            EngineError::Runtime(err.to_string()),
                        )));
                    }
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                runtime.block_on(handle_command(&config, command, &event_tx));
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn run(&self, target: PageTarget) {
        let _ = self.cmd_tx.send(EngineCommand::Run { target });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks until the next event; `None` once the engine thread is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn handle_command(
    config: &EngineConfig,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Run { target } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = grab_page(config, &target, &sink).await;
            if let Err(err) = &result {
                grabber_error!("Run for {} failed: {}", target.describe(), err);
            }
            let _ = event_tx.send(EngineEvent::RunCompleted(result));
        }
    }
}
