//! The per-page routine: enumerate, fetch one image at a time, archive, report.

use grabber_logging::{grabber_debug, grabber_info, grabber_warn};

use crate::archive::{ArchiveBuilder, ArchiveError, Compression, DEFAULT_FOLDER};
use crate::enumerate::enumerate_images;
use crate::fetch::{Fetcher, ProgressSink};
use crate::naming::{archive_filename, derive_entry_name, FALLBACK_EXTENSION};
use crate::page::PageDocument;
use crate::{
    EngineEvent, ImageReference, ProgressEvent, ResultDescriptor, RunSummary,
    NO_IMAGES_MESSAGE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOptions {
    pub folder: String,
    pub fallback_extension: String,
    pub compression: Compression,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            fallback_extension: FALLBACK_EXTENSION.to_string(),
            compression: Compression::default(),
        }
    }
}

/// Counters threaded through the image loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub processed: usize,
    pub skipped: usize,
}

impl RunTally {
    fn record(self, outcome: &ImageOutcome) -> Self {
        match outcome {
            ImageOutcome::Added => Self {
                processed: self.processed + 1,
                ..self
            },
            ImageOutcome::Skipped | ImageOutcome::Failed => Self {
                processed: self.processed + 1,
                skipped: self.skipped + 1,
            },
        }
    }

    pub fn added(&self) -> usize {
        self.processed - self.skipped
    }

    pub fn progress(&self, total: usize) -> ProgressEvent {
        ProgressEvent::new(self.processed, total)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            processed: self.processed,
            added: self.added(),
            skipped: self.skipped,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageOutcome {
    Added,
    Skipped,
    Failed,
}

/// Collect every image of `page` into one archive.
///
/// Images are fetched strictly one after another. Each attempt, whatever its
/// outcome, emits exactly one progress event; per-image failures only count
/// as skips. A page without images ends in [`ResultDescriptor::Failure`] and
/// no archive.
pub async fn collect_images(
    page: &PageDocument,
    fetcher: &dyn Fetcher,
    sink: &dyn ProgressSink,
    options: &WorkerOptions,
    timestamp: &str,
) -> Result<ResultDescriptor, ArchiveError> {
    let images = enumerate_images(&page.html, page.url.as_ref());
    let total = images.len();
    if total == 0 {
        grabber_info!("No <img> elements found");
        return Ok(ResultDescriptor::Failure {
            message: NO_IMAGES_MESSAGE.to_string(),
        });
    }

    let filename = archive_filename(page.host(), timestamp);
    grabber_info!("Collecting {} images into {}", total, filename);

    let mut builder = ArchiveBuilder::new(options.folder.as_str());
    let mut tally = RunTally::default();
    for image in &images {
        let outcome = process_image(image, fetcher, &mut builder, options).await;
        tally = tally.record(&outcome);
        sink.emit(EngineEvent::Progress(tally.progress(total)));
    }

    let summary = tally.summary();
    grabber_info!("{} ({} distinct entries)", summary, builder.len());
    let archive = builder.finish(options.compression)?;
    Ok(ResultDescriptor::Success {
        archive,
        filename,
        summary,
    })
}

async fn process_image(
    image: &ImageReference,
    fetcher: &dyn Fetcher,
    builder: &mut ArchiveBuilder,
    options: &WorkerOptions,
) -> ImageOutcome {
    if image.is_skippable() {
        grabber_debug!("Skipping image #{} (empty or inline source)", image.index);
        return ImageOutcome::Skipped;
    }

    let output = match fetcher.fetch(&image.src).await {
        Ok(output) => output,
        Err(err) => {
            grabber_warn!("Error processing image {}: {}", image.src, err);
            return ImageOutcome::Failed;
        }
    };

    let name = derive_entry_name(
        &image.src,
        image.index,
        output.metadata.content_type.as_deref(),
        &options.fallback_extension,
    );
    if builder.insert(name.as_str(), output.bytes) {
        grabber_debug!("Entry {} overwritten by {}", name, image.src);
    }
    grabber_debug!("Added {} ({} bytes)", name, output.metadata.byte_len);
    ImageOutcome::Added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_every_outcome_as_processed() {
        let tally = RunTally::default()
            .record(&ImageOutcome::Added)
            .record(&ImageOutcome::Skipped)
            .record(&ImageOutcome::Failed);

        assert_eq!(tally.processed, 3);
        assert_eq!(tally.skipped, 2);
        assert_eq!(tally.added(), 1);
        assert_eq!(
            tally.summary().message(),
            "Processed 3 images (1 added to ZIP, 2 skipped)"
        );
        assert_eq!(tally.progress(3), ProgressEvent::new(3, 3));
    }
}
