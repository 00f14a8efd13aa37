use anyhow::Result;
use grabber_core::{AppViewModel, Phase};
use grabber_engine::{ProgressEvent, WireResult};
use indicatif::{ProgressBar, ProgressStyle};
use url::Url;

const BAR_TEMPLATE: &str = "{bar:40.cyan/blue} {pos:>3}% {msg}";

/// Terminal presentation of the controller view: a progress bar, or JSON lines.
pub enum Renderer {
    Bar(ProgressBar),
    Json { last_processed: usize },
}

impl Renderer {
    pub fn new(json: bool) -> Self {
        if json {
            return Renderer::Json { last_processed: 0 };
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        Renderer::Bar(bar)
    }

    pub fn render(&mut self, view: &AppViewModel) {
        match self {
            Renderer::Bar(bar) => {
                bar.set_position(u64::from(view.progress_percent));
                bar.set_message(view.status_text.clone());
            }
            Renderer::Json { last_processed } => {
                if view.phase != Phase::Running || view.processed == *last_processed {
                    return;
                }
                *last_processed = view.processed;
                let event = ProgressEvent {
                    percent: view.progress_percent,
                    processed: view.processed,
                    total: view.total,
                };
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{line}");
                }
            }
        }
    }

    pub fn finish(&self, view: &AppViewModel) -> Result<()> {
        match self {
            Renderer::Bar(bar) => {
                bar.finish_with_message(view.status_text.clone());
                if let Some(summary) = &view.summary {
                    println!("{summary}");
                }
                if let Some(location) = &view.saved_location {
                    println!("Saved to {location}");
                }
            }
            Renderer::Json { .. } => {
                println!("{}", serde_json::to_string(&wire_result(view))?);
            }
        }
        Ok(())
    }
}

fn wire_result(view: &AppViewModel) -> WireResult {
    if view.phase == Phase::Completed {
        WireResult {
            success: true,
            zip_url: view
                .saved_location
                .as_deref()
                .and_then(|location| Url::from_file_path(location).ok())
                .map(String::from),
            filename: view.archive_name.clone(),
            message: view.summary.clone(),
        }
    } else {
        WireResult {
            success: false,
            zip_url: None,
            filename: None,
            message: Some(view.status_text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn completed_view_maps_to_success_record() {
        let view = AppViewModel {
            phase: Phase::Completed,
            status_text: "Download complete!".into(),
            progress_percent: 100,
            processed: 3,
            total: 3,
            summary: Some("Processed 3 images (1 added to ZIP, 2 skipped)".into()),
            archive_name: Some("example_com_images_t.zip".into()),
            saved_location: Some("/tmp/out/example_com_images_t.zip".into()),
            dirty: false,
        };
        let json = serde_json::to_value(wire_result(&view)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "zipUrl": "file:///tmp/out/example_com_images_t.zip",
                "filename": "example_com_images_t.zip",
                "message": "Processed 3 images (1 added to ZIP, 2 skipped)"
            })
        );
    }

    #[test]
    fn failed_view_maps_to_failure_record() {
        let view = AppViewModel {
            phase: Phase::Failed,
            status_text: "No images found on this page.".into(),
            ..AppViewModel::default()
        };
        let json = serde_json::to_string(&wire_result(&view)).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"message":"No images found on this page."}"#
        );
    }
}
