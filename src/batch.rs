use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tokio::fs;

use crate::error::FetchError;
use crate::formatter::{progress_line, Progress};
use crate::model::{FailureRecord, TranscriptRecord, VideoDescriptor};
use crate::transcript::{select_transcript, TranscriptSource};

/// Pauses between videos so the service does not throttle the run.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub after_success: Duration,
    pub after_failure: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    NoTranscript,
    Error(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoTranscript => f.write_str("No transcript found"),
            FailureReason::Error(message) => f.write_str(message),
        }
    }
}

/// Result of processing one video that was not already on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(TranscriptRecord),
    Failure(FailureReason),
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Includes skipped videos.
    pub success_count: usize,
    pub fail_count: usize,
    pub skipped_count: usize,
    pub failures: Vec<FailureRecord>,
}

pub struct BatchFetcher<S> {
    source: S,
    output_dir: PathBuf,
    languages: Vec<String>,
    pacing: Pacing,
}

impl<S: TranscriptSource> BatchFetcher<S> {
    pub fn new(
        source: S,
        output_dir: impl Into<PathBuf>,
        languages: Vec<String>,
        pacing: Pacing,
    ) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            languages,
            pacing,
        }
    }

    pub fn output_path(&self, video_id: &str) -> PathBuf {
        self.output_dir.join(format!("{}.json", video_id))
    }

    /// Processes `videos` in order. A failing video never stops the batch.
    pub async fn run(&self, videos: &[VideoDescriptor]) -> BatchReport {
        let total = videos.len();
        let mut report = BatchReport::default();

        for (i, video) in videos.iter().enumerate() {
            let index = i + 1;
            let output_path = self.output_path(&video.id);

            if fs::try_exists(&output_path).await.unwrap_or(false) {
                println!("{}", progress_line(index, total, &video.title, Progress::Skipped));
                report.success_count += 1;
                report.skipped_count += 1;
                continue;
            }

            match self.fetch_video(video, &output_path).await {
                FetchOutcome::Success(record) => {
                    println!("{}", progress_line(index, total, &video.title, Progress::Saved));
                    log::debug!(
                        "{}: wrote {} segment(s) in '{}' to {}",
                        video.id,
                        record.transcript.len(),
                        record.language,
                        output_path.display()
                    );
                    report.success_count += 1;
                    tokio::time::sleep(self.pacing.after_success).await;
                }
                FetchOutcome::Failure(reason) => {
                    let progress = match &reason {
                        FailureReason::NoTranscript => Progress::NoSubtitles,
                        FailureReason::Error(message) => Progress::Error(message),
                    };
                    println!("{}", progress_line(index, total, &video.title, progress));
                    log::warn!("{}: {}", video.id, reason);
                    report.failures.push(FailureRecord {
                        id: video.id.clone(),
                        title: video.title.clone(),
                        error: reason.to_string(),
                    });
                    report.fail_count += 1;
                    tokio::time::sleep(self.pacing.after_failure).await;
                }
            }
        }

        report
    }

    pub async fn fetch_video(&self, video: &VideoDescriptor, output_path: &Path) -> FetchOutcome {
        match self.try_fetch_video(video, output_path).await {
            Ok(Some(record)) => FetchOutcome::Success(record),
            Ok(None) => FetchOutcome::Failure(FailureReason::NoTranscript),
            Err(e) => FetchOutcome::Failure(FailureReason::Error(e.to_string())),
        }
    }

    async fn try_fetch_video(
        &self,
        video: &VideoDescriptor,
        output_path: &Path,
    ) -> Result<Option<TranscriptRecord>, FetchError> {
        let list = self.source.list_transcripts(&video.id).await?;
        let Some(transcript) = select_transcript(&list, &self.languages) else {
            return Ok(None);
        };

        let segments = self.source.fetch(transcript).await?;
        let record = TranscriptRecord {
            video_id: video.id.clone(),
            title: video.title.clone(),
            url: video.url.clone(),
            language: transcript.language_code.clone(),
            transcript: segments,
        };
        save_json(&record, output_path).await?;

        Ok(Some(record))
    }
}

/// Writes `value` as pretty-printed JSON, non-ASCII characters unescaped.
pub async fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<(), FetchError> {
    let pretty_json = serde_json::to_string_pretty(value)?;
    fs::write(path, pretty_json).await?;
    Ok(())
}

pub async fn load_videos(path: &Path) -> anyhow::Result<Vec<VideoDescriptor>> {
    let json_content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read video list {}", path.display()))?;
    let videos: Vec<VideoDescriptor> = serde_json::from_str(&json_content)
        .with_context(|| format!("Failed to parse video list {}", path.display()))?;
    Ok(videos)
}

/// Writes the failure log. Returns `false` without touching the disk when
/// there is nothing to report.
pub async fn write_failures(path: &Path, failures: &[FailureRecord]) -> anyhow::Result<bool> {
    if failures.is_empty() {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    save_json(&failures, path)
        .await
        .with_context(|| format!("Failed to write failure log {}", path.display()))?;
    Ok(true)
}
