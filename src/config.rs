use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::batch::Pacing;

#[derive(Parser, Debug)]
#[command(name = "subfetch")]
#[command(about = "Download YouTube subtitles for a list of videos into JSON files")]
pub struct Config {
    /// JSON array of videos with `id`, `title` and `url`
    #[arg(long, env = "SUBFETCH_INPUT", default_value = "reference/ear_opening_english_list.json")]
    pub input: PathBuf,

    /// Directory receiving one `<video_id>.json` per video
    #[arg(long, env = "SUBFETCH_OUTPUT_DIR", default_value = "reference/subtitles")]
    pub output_dir: PathBuf,

    /// Where to write the list of failed videos, if any
    #[arg(long, env = "SUBFETCH_FAILURES", default_value = "reference/failed_subtitles.json")]
    pub failures: PathBuf,

    /// Preferred subtitle languages, most preferred first
    #[arg(
        long,
        env = "SUBFETCH_LANGUAGES",
        value_delimiter = ',',
        default_value = "ko,en"
    )]
    pub languages: Vec<String>,

    /// Pause after a saved transcript, in milliseconds
    #[arg(long, env = "SUBFETCH_SUCCESS_DELAY_MS", default_value_t = 500)]
    pub success_delay_ms: u64,

    /// Pause after a failed video, in milliseconds
    #[arg(long, env = "SUBFETCH_FAILURE_DELAY_MS", default_value_t = 1000)]
    pub failure_delay_ms: u64,
}

impl Config {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            after_success: Duration::from_millis(self.success_delay_ms),
            after_failure: Duration::from_millis(self.failure_delay_ms),
        }
    }
}
