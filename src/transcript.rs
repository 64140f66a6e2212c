use async_trait::async_trait;

use crate::error::TranscriptError;
use crate::model::TranscriptSegment;

/// Anything that can list and fetch the subtitles of a video.
#[async_trait]
pub trait TranscriptSource {
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList, TranscriptError>;

    async fn fetch(&self, transcript: &Transcript)
        -> Result<Vec<TranscriptSegment>, TranscriptError>;
}

/// A single subtitle track of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
    pub url: String,
}

/// The subtitle tracks available for one video.
#[derive(Debug, Clone)]
pub struct TranscriptList {
    pub video_id: String,
    manually_created: Vec<Transcript>,
    generated: Vec<Transcript>,
}

impl TranscriptList {
    /// Splits `transcripts` by kind, keeping the order within each kind.
    pub fn new(video_id: &str, transcripts: Vec<Transcript>) -> Self {
        let (generated, manually_created): (Vec<_>, Vec<_>) =
            transcripts.into_iter().partition(|t| t.is_generated);
        Self {
            video_id: video_id.to_string(),
            manually_created,
            generated,
        }
    }

    pub fn find_generated_transcript(
        &self,
        langs: &[String],
    ) -> Result<&Transcript, TranscriptError> {
        self.find_in(langs, &self.generated)
    }

    pub fn find_manually_created_transcript(
        &self,
        langs: &[String],
    ) -> Result<&Transcript, TranscriptError> {
        self.find_in(langs, &self.manually_created)
    }

    /// Manually created tracks first, then generated ones.
    pub fn iter(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.iter().chain(self.generated.iter())
    }

    fn find_in<'a>(
        &'a self,
        langs: &[String],
        pool: &'a [Transcript],
    ) -> Result<&'a Transcript, TranscriptError> {
        for lang in langs {
            if let Some(t) = pool.iter().find(|t| &t.language_code == lang) {
                return Ok(t);
            }
        }
        Err(TranscriptError::NoTranscriptFound {
            video_id: self.video_id.clone(),
            requested: langs.to_vec(),
        })
    }
}

/// One step of the selection fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Generated,
    ManuallyCreated,
    Any,
}

pub const FALLBACK_CHAIN: [Selection; 3] = [
    Selection::Generated,
    Selection::ManuallyCreated,
    Selection::Any,
];

impl Selection {
    pub fn pick<'a>(&self, list: &'a TranscriptList, langs: &[String]) -> Option<&'a Transcript> {
        match self {
            Selection::Generated => list.find_generated_transcript(langs).ok(),
            Selection::ManuallyCreated => list.find_manually_created_transcript(langs).ok(),
            Selection::Any => list.iter().next(),
        }
    }
}

/// Walks the fallback chain and returns the first track it yields.
pub fn select_transcript<'a>(list: &'a TranscriptList, langs: &[String]) -> Option<&'a Transcript> {
    FALLBACK_CHAIN.iter().find_map(|selection| {
        let picked = selection.pick(list, langs);
        if let Some(t) = picked {
            log::debug!(
                "{}: selected {:?} track '{}' ({:?})",
                list.video_id,
                selection,
                t.language_code,
                t.language
            );
        }
        picked
    })
}

#[cfg(test)]
pub(crate) fn track(video_id: &str, code: &str, generated: bool) -> Transcript {
    Transcript {
        video_id: video_id.to_string(),
        language: code.to_uppercase(),
        language_code: code.to_string(),
        is_generated: generated,
        url: format!("http://captions.test/{}/{}", video_id, code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs() -> Vec<String> {
        vec!["ko".to_string(), "en".to_string()]
    }

    #[test]
    fn test_select_prefers_generated_korean() {
        let list = TranscriptList::new(
            "v",
            vec![
                track("v", "en", true),
                track("v", "ko", false),
                track("v", "ko", true),
            ],
        );
        let picked = select_transcript(&list, &langs()).expect("a transcript");
        assert_eq!(picked.language_code, "ko");
        assert!(picked.is_generated);
    }

    #[test]
    fn test_select_generated_english_over_manual_korean() {
        let list = TranscriptList::new("v", vec![track("v", "ko", false), track("v", "en", true)]);
        let picked = select_transcript(&list, &langs()).expect("a transcript");
        assert_eq!(picked.language_code, "en");
        assert!(picked.is_generated);
    }

    #[test]
    fn test_select_falls_back_to_manual() {
        let list = TranscriptList::new("v", vec![track("v", "en", false), track("v", "fr", true)]);
        let picked = select_transcript(&list, &langs()).expect("a transcript");
        assert_eq!(picked.language_code, "en");
        assert!(!picked.is_generated);
    }

    #[test]
    fn test_select_falls_back_to_first_available() {
        let list = TranscriptList::new(
            "v",
            vec![track("v", "fr", true), track("v", "de", false), track("v", "es", false)],
        );
        let picked = select_transcript(&list, &langs()).expect("a transcript");
        // manually created tracks come first in enumeration order
        assert_eq!(picked.language_code, "de");
    }

    #[test]
    fn test_select_empty_list() {
        let list = TranscriptList::new("v", vec![]);
        assert!(list.iter().next().is_none());
        assert!(select_transcript(&list, &langs()).is_none());
    }

    #[test]
    fn test_find_reports_requested_languages() {
        let list = TranscriptList::new("v", vec![track("v", "fr", true)]);
        match list.find_manually_created_transcript(&langs()) {
            Err(TranscriptError::NoTranscriptFound { video_id, requested }) => {
                assert_eq!(video_id, "v");
                assert_eq!(requested, langs());
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
