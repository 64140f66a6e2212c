use serde::{Deserialize, Serialize};

/// A video to fetch subtitles for, as listed in the input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// One caption line. Passed through as the source returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// The per-video output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptRecord {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub language: String,
    pub transcript: Vec<TranscriptSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub id: String,
    pub title: String,
    pub error: String,
}
