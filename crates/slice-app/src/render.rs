use std::fmt::Write;
use slice_core::{JobResults, JobSnapshot};

const BAR_WIDTH: usize = 20;

pub fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One line per observed snapshot, e.g. `⚡ processing [########------------]  40% Transcribing audio...`
pub fn progress_line(snapshot: &JobSnapshot) -> String {
    let mut line = format!(
        "{} {:<10} {} {:>3}%",
        snapshot.status.icon(),
        snapshot.status.label(),
        progress_bar(snapshot.progress()),
        snapshot.progress(),
    );
    if !snapshot.message.trim().is_empty() {
        line.push(' ');
        line.push_str(snapshot.message.trim());
    }
    line
}

fn timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn summary(results: &JobResults) -> String {
    let mut out = String::new();

    if !results.transcript.is_empty() {
        let words = results.transcript.split_whitespace().count();
        let _ = writeln!(out, "Transcript: {} words", words);
    }

    let _ = writeln!(out, "Viral hooks ({}):", results.viral_hooks.len());
    for (i, hook) in results.viral_hooks.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, hook);
    }

    let _ = writeln!(out, "Captions ({}):", results.captions.len());
    for (i, caption) in results.captions.iter().enumerate() {
        let first_line = caption.caption.lines().next().unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}. {} ({} hashtags, {} chars)",
            i + 1,
            first_line,
            caption.hashtags.len(),
            caption.character_count
        );
    }

    let _ = writeln!(out, "Clips ({}):", results.clips.len());
    for clip in &results.clips {
        let _ = writeln!(
            out,
            "  {}-{} ({:.1}s) {}",
            timestamp(clip.start_time),
            timestamp(clip.end_time),
            clip.duration(),
            clip.description
        );
    }

    if let Some(url) = &results.download_url {
        let _ = writeln!(out, "Download: {}", url);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use slice_core::{Caption, Clip, JobId, JobStatus};

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "[--------------------]");
        assert_eq!(progress_bar(50), "[##########----------]");
        assert_eq!(progress_bar(100), "[####################]");
        assert_eq!(progress_bar(250), "[####################]");
    }

    #[test]
    fn test_progress_line() {
        let snapshot = JobSnapshot {
            job_id: JobId::new("j").unwrap(),
            status: JobStatus::Processing,
            progress_percent: 40,
            message: "Transcribing audio...".into(),
            results: None,
        };
        let line = progress_line(&snapshot);
        assert!(line.contains("processing"));
        assert!(line.contains(" 40%"));
        assert!(line.ends_with("Transcribing audio..."));
    }

    #[test]
    fn test_summary_lists_everything() {
        let results = JobResults {
            transcript: "one two three".into(),
            viral_hooks: vec!["Hook A".into(), "Hook B".into()],
            captions: vec![Caption {
                caption: "Wait for it\nsecond line".into(),
                hashtags: vec!["#fyp".into()],
                character_count: 30,
            }],
            clips: vec![Clip {
                start_time: 65.0,
                end_time: 80.0,
                duration: None,
                description: "Punchline".into(),
            }],
            download_url: Some("https://cdn.example.com/r.zip".into()),
        };

        let text = summary(&results);
        assert!(text.contains("Transcript: 3 words"));
        assert!(text.contains("  2. Hook B"));
        assert!(text.contains("  1. Wait for it (1 hashtags, 30 chars)"));
        assert!(text.contains("  1:05-1:20 (15.0s) Punchline"));
        assert!(text.contains("Download: https://cdn.example.com/r.zip"));
    }
}
