use std::path::PathBuf;

use grabber_core::{Effect, Msg, WorkerOutcome};
use grabber_engine::{
    ArchiveHandle, AtomicFileWriter, EngineConfig, EngineEvent, EngineHandle, PageTarget,
    ResultDescriptor,
};
use grabber_logging::{grabber_error, grabber_info, grabber_warn};

/// Executes controller effects against the engine and the output directory.
pub struct EffectRunner {
    engine: EngineHandle,
    target: PageTarget,
    writer: AtomicFileWriter,
    pending_archive: Option<ArchiveHandle>,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, target: PageTarget, output_dir: PathBuf) -> Self {
        Self {
            engine: EngineHandle::new(config),
            target,
            writer: AtomicFileWriter::new(output_dir),
            pending_archive: None,
        }
    }

    /// Runs the effects; any messages they produce synchronously are returned.
    pub fn execute(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_up = Vec::new();
        for effect in effects {
            match effect {
                Effect::RunWorker => {
                    grabber_info!("RunWorker target={}", self.target.describe());
                    self.pending_archive = None;
                    self.engine.run(self.target.clone());
                }
                Effect::TriggerDownload { filename } => {
                    follow_up.push(self.save_archive(&filename));
                }
            }
        }
        follow_up
    }

    /// Blocks for the next engine event, translated into a controller message.
    pub fn next_msg(&mut self) -> Option<Msg> {
        let event = self.engine.recv()?;
        Some(self.translate(event))
    }

    fn translate(&mut self, event: EngineEvent) -> Msg {
        match event {
            EngineEvent::Progress(progress) => Msg::ProgressUpdated {
                percent: progress.percent,
                processed: progress.processed,
                total: progress.total,
            },
            EngineEvent::RunCompleted(Ok(ResultDescriptor::Success {
                archive,
                filename,
                summary,
            })) => {
                self.pending_archive = Some(archive);
                Msg::WorkerFinished(WorkerOutcome::Success {
                    filename: Some(filename),
                    summary: summary.message(),
                })
            }
            EngineEvent::RunCompleted(Ok(ResultDescriptor::Failure { message })) => {
                grabber_warn!("Run finished without an archive: {}", message);
                Msg::WorkerFinished(WorkerOutcome::Failure {
                    message: Some(message),
                })
            }
            EngineEvent::RunCompleted(Err(err)) => Msg::WorkerErrored(err.to_string()),
        }
    }

    fn save_archive(&mut self, filename: &str) -> Msg {
        let Some(archive) = self.pending_archive.take() else {
            grabber_error!("TriggerDownload without a finished archive");
            return Msg::DownloadFailed("no archive to save".to_string());
        };

        let size = archive.len();
        match self.writer.save_archive(filename, archive) {
            Ok(path) => {
                let location = path.canonicalize().unwrap_or(path);
                grabber_info!("Saved {} bytes to {:?}", size, location);
                Msg::DownloadSaved {
                    location: location.display().to_string(),
                }
            }
            Err(err) => {
                grabber_error!("Failed to save {}: {}", filename, err);
                Msg::DownloadFailed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use grabber_engine::{ArchiveBuilder, Compression, ProgressEvent, RunSummary};

    use super::*;

    fn runner(dir: PathBuf) -> EffectRunner {
        EffectRunner::new(
            EngineConfig::default(),
            PageTarget::Url("https://example.com/".into()),
            dir,
        )
    }

    fn archive() -> ArchiveHandle {
        let mut builder = ArchiveBuilder::new("images");
        builder.insert("a.png", b"png".to_vec());
        builder.finish(Compression::Stored).unwrap()
    }

    #[test]
    fn progress_events_become_progress_messages() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut runner = runner(temp.path().to_path_buf());

        let msg = runner.translate(EngineEvent::Progress(ProgressEvent::new(1, 2)));
        assert_eq!(
            msg,
            Msg::ProgressUpdated {
                percent: 50,
                processed: 1,
                total: 2
            }
        );
    }

    #[test]
    fn successful_run_is_saved_on_trigger() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut runner = runner(temp.path().to_path_buf());

        let msg = runner.translate(EngineEvent::RunCompleted(Ok(ResultDescriptor::Success {
            archive: archive(),
            filename: "example_com_images_x.zip".into(),
            summary: RunSummary {
                processed: 1,
                added: 1,
                skipped: 0,
            },
        })));
        assert_eq!(
            msg,
            Msg::WorkerFinished(WorkerOutcome::Success {
                filename: Some("example_com_images_x.zip".into()),
                summary: "Processed 1 images (1 added to ZIP, 0 skipped)".into(),
            })
        );

        let follow_up = runner.execute(vec![Effect::TriggerDownload {
            filename: "example_com_images_x.zip".into(),
        }]);
        assert!(matches!(follow_up.as_slice(), [Msg::DownloadSaved { .. }]));
        assert!(temp.path().join("example_com_images_x.zip").is_file());

        // The handle is released after the first save.
        let again = runner.execute(vec![Effect::TriggerDownload {
            filename: "example_com_images_x.zip".into(),
        }]);
        assert!(matches!(again.as_slice(), [Msg::DownloadFailed(_)]));
    }
}
