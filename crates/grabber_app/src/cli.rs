use std::path::PathBuf;

use clap::Parser;
use grabber_engine::PageTarget;
use log::LevelFilter;

/// Download every image on a web page into a single ZIP archive.
#[derive(Debug, Parser)]
#[command(name = "grabber", version)]
pub struct Cli {
    /// Page to collect images from.
    #[arg(value_name = "URL", required_unless_present = "file", conflicts_with = "file")]
    pub url: Option<String>,

    /// Read the page from a saved HTML file instead of fetching it.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Address the saved page was served from; relative image sources resolve against it.
    #[arg(long, value_name = "URL", requires = "file")]
    pub base_url: Option<String>,

    /// Directory the archive is written to.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// RON config file (defaults to ./grabber.ron when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print progress events and the final result as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Log debug details.
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    pub fn target(&self) -> Option<PageTarget> {
        match (&self.url, &self.file) {
            (_, Some(path)) => Some(PageTarget::File {
                path: path.clone(),
                base_url: self.base_url.clone(),
            }),
            (Some(url), None) => Some(PageTarget::Url(url.clone())),
            (None, None) => None,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}
