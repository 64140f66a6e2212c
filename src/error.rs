use thiserror::Error;

/// Errors raised while listing or fetching transcripts.
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Too many requests: YouTube is rate limiting requests for video {0}")]
    TooManyRequests(String),

    #[error("Request blocked: YouTube is blocking requests for video {0}")]
    RequestBlocked(String),

    #[error("The video {0} is no longer available")]
    VideoUnavailable(String),

    #[error("The video {0} is age restricted")]
    AgeRestricted(String),

    #[error("The video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript for video {video_id} in any of {requested:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
    },

    #[error("A PO token is required to fetch the transcript of video {0}")]
    PoTokenRequired(String),

    #[error("Unexpected response for video {video_id}: {reason}")]
    Parse { video_id: String, reason: String },
}

/// Errors that fail a single video of a batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
