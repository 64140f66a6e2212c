use std::sync::LazyLock;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use regex::Regex;
use reqwest::{header, Client, Response, StatusCode};
use serde_json::{json, Value};

use crate::error::TranscriptError;
use crate::model::TranscriptSegment;
use crate::transcript::{Transcript, TranscriptList, TranscriptSource};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid api key regex")
});
static TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("valid text regex")
});
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(start|dur)="([^"]*)""#).expect("valid attribute regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Lists and fetches subtitles through YouTube's innertube player API.
pub struct YoutubeSource {
    client: Client,
    base_url: String,
}

impl YoutubeSource {
    pub fn new() -> Result<Self, TranscriptError> {
        Self::with_base_url(YOUTUBE_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self, TranscriptError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static("en-US"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_api_key(&self, video_id: &str) -> Result<String, TranscriptError> {
        let url = format!("{}/watch?v={}", self.base_url, video_id);
        log::debug!("GET {}", url);
        let html = check_status(self.client.get(&url).send().await?, video_id)?
            .text()
            .await?;

        if let Some(caps) = API_KEY_RE.captures(&html) {
            return Ok(caps[1].to_string());
        }
        if html.contains("class=\"g-recaptcha\"") {
            return Err(TranscriptError::TooManyRequests(video_id.to_string()));
        }
        Err(TranscriptError::Parse {
            video_id: video_id.to_string(),
            reason: "watch page has no innertube api key".to_string(),
        })
    }

    async fn fetch_player_data(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.base_url, api_key);
        log::debug!("POST {}", url);
        let body = json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38",
                }
            },
            "videoId": video_id,
        });
        let response = self.client.post(&url).json(&body).send().await?;
        Ok(check_status(response, video_id)?.json::<Value>().await?)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeSource {
    async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptList, TranscriptError> {
        let api_key = self.fetch_api_key(video_id).await?;
        let data = self.fetch_player_data(video_id, &api_key).await?;
        check_playability(&data, video_id)?;
        let transcripts = parse_caption_tracks(&data, video_id)?;
        log::debug!("{}: {} caption track(s)", video_id, transcripts.len());
        Ok(TranscriptList::new(video_id, transcripts))
    }

    async fn fetch(
        &self,
        transcript: &Transcript,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        if transcript.url.contains("&exp=xpe") {
            return Err(TranscriptError::PoTokenRequired(transcript.video_id.clone()));
        }
        log::debug!("GET {}", transcript.url);
        let response = self.client.get(&transcript.url).send().await?;
        let xml = check_status(response, &transcript.video_id)?.text().await?;
        parse_timedtext(&xml, &transcript.video_id)
    }
}

fn check_status(response: Response, video_id: &str) -> Result<Response, TranscriptError> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::TooManyRequests(video_id.to_string()));
    }
    Ok(response.error_for_status()?)
}

fn check_playability(data: &Value, video_id: &str) -> Result<(), TranscriptError> {
    let playability = &data["playabilityStatus"];
    let Some(status) = playability["status"].as_str() else {
        return Ok(());
    };
    let reason = playability["reason"].as_str().unwrap_or_default();

    match status {
        "OK" => Ok(()),
        "LOGIN_REQUIRED" if reason.contains("not a bot") => {
            Err(TranscriptError::RequestBlocked(video_id.to_string()))
        }
        "LOGIN_REQUIRED" if reason.contains("inappropriate") => {
            Err(TranscriptError::AgeRestricted(video_id.to_string()))
        }
        "ERROR" if reason == "This video is unavailable" => {
            Err(TranscriptError::VideoUnavailable(video_id.to_string()))
        }
        _ => Err(TranscriptError::VideoUnplayable {
            video_id: video_id.to_string(),
            reason: if reason.is_empty() {
                status.to_string()
            } else {
                reason.to_string()
            },
        }),
    }
}

fn parse_caption_tracks(data: &Value, video_id: &str) -> Result<Vec<Transcript>, TranscriptError> {
    let tracks = data["captions"]["playerCaptionsTracklistRenderer"]["captionTracks"]
        .as_array()
        .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

    tracks
        .iter()
        .map(|track| {
            let missing = |field: &str| TranscriptError::Parse {
                video_id: video_id.to_string(),
                reason: format!("caption track without {}", field),
            };
            let url = track["baseUrl"].as_str().ok_or_else(|| missing("baseUrl"))?;
            let language_code = track["languageCode"]
                .as_str()
                .ok_or_else(|| missing("languageCode"))?;
            let language = track["name"]["runs"][0]["text"]
                .as_str()
                .or_else(|| track["name"]["simpleText"].as_str())
                .unwrap_or(language_code);

            Ok(Transcript {
                video_id: video_id.to_string(),
                language: language.to_string(),
                language_code: language_code.to_string(),
                is_generated: track["kind"].as_str() == Some("asr"),
                url: url.replace("&fmt=srv3", ""),
            })
        })
        .collect()
}

/// Parses a timed-text document. Caption text is escaped twice: once as XML
/// and once as HTML, and may carry inline formatting tags.
fn parse_timedtext(xml: &str, video_id: &str) -> Result<Vec<TranscriptSegment>, TranscriptError> {
    let mut segments = Vec::new();

    for caps in TEXT_RE.captures_iter(xml) {
        let Some(raw) = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty()) else {
            continue;
        };

        let mut start = None;
        let mut duration = 0.0;
        for attr in ATTR_RE.captures_iter(&caps[1]) {
            let value = attr[2].parse::<f64>().map_err(|e| TranscriptError::Parse {
                video_id: video_id.to_string(),
                reason: format!("bad {} attribute '{}': {}", &attr[1], &attr[2], e),
            })?;
            match &attr[1] {
                "start" => start = Some(value),
                _ => duration = value,
            }
        }
        let start = start.ok_or_else(|| TranscriptError::Parse {
            video_id: video_id.to_string(),
            reason: "caption line without start".to_string(),
        })?;

        let unescaped = decode_html_entities(raw);
        let html = decode_html_entities(&unescaped);
        let text = TAG_RE.replace_all(&html, "").into_owned();

        segments.push(TranscriptSegment {
            text,
            start,
            duration,
        });
    }

    Ok(segments)
}
