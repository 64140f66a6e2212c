/// Outcome marker shown on a progress line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress<'a> {
    Skipped,
    Saved,
    NoSubtitles,
    Error(&'a str),
}

/// Cuts `s` after at most `max_chars` characters, never inside a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

pub fn progress_line(index: usize, total: usize, title: &str, progress: Progress) -> String {
    let position = format!("[{}/{}]", index, total);
    match progress {
        Progress::Skipped => {
            format!("{} ⏭️ Skip (exists): {}...", position, truncate_chars(title, 30))
        }
        Progress::Saved => format!("{} ✅ {}...", position, truncate_chars(title, 40)),
        Progress::NoSubtitles => {
            format!("{} ❌ No subtitles: {}...", position, truncate_chars(title, 30))
        }
        Progress::Error(error) => format!(
            "{} ❌ Error: {}... - {}",
            position,
            truncate_chars(title, 30),
            error
        ),
    }
}

pub fn summary_line(success_count: usize, fail_count: usize, skipped_count: usize) -> String {
    format!(
        "📊 Done: {} succeeded ({} skipped), {} failed",
        success_count, skipped_count, fail_count
    )
}
