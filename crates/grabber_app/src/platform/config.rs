//! Optional RON configuration, overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use grabber_engine::{
    Compression, EngineConfig, FetchSettings, WorkerOptions, DEFAULT_FOLDER, FALLBACK_EXTENSION,
};
use grabber_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "grabber.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum LogTarget {
    #[default]
    File,
    Terminal,
    Both,
    Off,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GrabberConfig {
    pub output_dir: PathBuf,
    pub folder: String,
    pub fallback_extension: String,
    pub compression: Compression,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub redirect_limit: usize,
    pub max_image_bytes: Option<u64>,
    pub user_agent: Option<String>,
    pub log: LogTarget,
    pub log_file: PathBuf,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            folder: DEFAULT_FOLDER.to_string(),
            fallback_extension: FALLBACK_EXTENSION.to_string(),
            compression: Compression::default(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
            redirect_limit: FetchSettings::for_images().redirect_limit,
            max_image_bytes: None,
            user_agent: None,
            log: LogTarget::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl GrabberConfig {
    /// Reads `explicit` (which must exist) or `./grabber.ron` (which may not), then applies CLI flags.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {:?}", path))?;
        Self::parse(&content).with_context(|| format!("failed to parse config {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn log_destination(&self) -> Option<LogDestination> {
        match self.log {
            LogTarget::File => Some(LogDestination::File(self.log_file.clone())),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both(self.log_file.clone())),
            LogTarget::Off => None,
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        let mut page_fetch = FetchSettings::for_pages();
        let mut image_fetch = FetchSettings::for_images();
        for settings in [&mut page_fetch, &mut image_fetch] {
            settings.redirect_limit = self.redirect_limit;
            settings.user_agent = self.user_agent.clone();
        }
        if let Some(secs) = self.connect_timeout_secs {
            image_fetch.connect_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = self.request_timeout_secs {
            image_fetch.request_timeout = Some(Duration::from_secs(secs));
        }
        image_fetch.max_bytes = self.max_image_bytes;

        EngineConfig {
            page_fetch,
            image_fetch,
            worker: WorkerOptions {
                folder: self.folder.clone(),
                fallback_extension: self.fallback_extension.clone(),
                compression: self.compression,
            },
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config = GrabberConfig::parse(
            r#"(
                folder: "pictures",
                compression: stored,
                request_timeout_secs: Some(20),
                log: Terminal,
            )"#,
        )
        .unwrap();

        assert_eq!(config.folder, "pictures");
        assert_eq!(config.compression, Compression::Stored);
        assert_eq!(config.fallback_extension, "jpg");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.log_destination(), Some(LogDestination::Terminal));

        let engine = config.engine_config();
        assert_eq!(engine.worker.folder, "pictures");
        assert_eq!(
            engine.image_fetch.request_timeout,
            Some(Duration::from_secs(20))
        );
        assert!(engine.image_fetch.allowed_content_types.is_empty());
        assert!(!engine.page_fetch.allowed_content_types.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(GrabberConfig::parse("(folder: 42)").is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from([
            "grabber",
            "https://example.com/",
            "--config",
            "/definitely/not/here.ron",
        ])
        .unwrap();
        let err = GrabberConfig::load(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn output_dir_flag_overrides_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("grabber.ron");
        fs::write(&path, r#"(output_dir: "from-file", log: Off)"#).unwrap();

        let cli = Cli::try_parse_from([
            "grabber",
            "https://example.com/",
            "--config",
            path.to_str().unwrap(),
            "--output-dir",
            "from-flag",
        ])
        .unwrap();
        let config = GrabberConfig::load(&cli).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from-flag"));
        assert_eq!(config.log_destination(), None);
    }
}
