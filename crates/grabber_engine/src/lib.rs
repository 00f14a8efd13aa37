//! Grabber engine: page loading, image collection and archive IO.
mod archive;
mod decode;
mod engine;
mod enumerate;
mod fetch;
mod naming;
mod page;
mod persist;
mod types;
mod worker;

pub use archive::{ArchiveBuilder, ArchiveError, ArchiveHandle, Compression, DEFAULT_FOLDER};
pub use decode::{decode_page, DecodedPage};
pub use engine::{grab_page, EngineConfig, EngineError, EngineHandle};
pub use enumerate::enumerate_images;
pub use fetch::{ChannelProgressSink, FetchSettings, Fetcher, ProgressSink, ReqwestFetcher};
pub use naming::{archive_filename, derive_entry_name, utc_timestamp, FALLBACK_EXTENSION};
pub use page::{load_page, PageDocument, PageLoadError, PageTarget};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, ImageReference,
    ProgressEvent, ResultDescriptor, RunSummary, WireResult, NO_IMAGES_MESSAGE,
};
pub use worker::{collect_images, RunTally, WorkerOptions};
