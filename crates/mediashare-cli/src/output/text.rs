//! Plain text output formatting for shares.

use chrono::{DateTime, Duration, Utc};
use mediashare_core::report::MediaReport;
use mediashare_core::storage::EntrySummary;

/// Render time left as "5h 12m", "12m", or "<1m".
pub fn format_remaining(remaining: Duration) -> String {
    let minutes = remaining.num_minutes();
    if minutes < 1 {
        return "<1m".to_string();
    }
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

pub fn print_summary(summary: &EntrySummary, now: DateTime<Utc>) {
    println!("ID: {}", summary.id);
    println!("Created: {}", summary.created_at.to_rfc3339());
    println!(
        "Expires: {} (in {})",
        summary.expires_at.to_rfc3339(),
        format_remaining(summary.expires_at - now)
    );
    println!(
        "Protected: {}",
        if summary.protected { "yes" } else { "no" }
    );
}

fn print_field(label: &str, value: &Option<String>) {
    if let Some(value) = value {
        println!("  {}: {}", label, value);
    }
}

/// Print the structured MediaInfo summary.
pub fn print_report(report: &MediaReport) {
    let general = &report.general;
    println!("General");
    print_field("Name", &general.movie_name);
    print_field("File", &general.complete_name);
    print_field("Format", &general.format);
    print_field("Duration", &general.duration);
    print_field("Size", &general.size);
    print_field("Bit rate", &general.bitrate);

    let video = &report.video;
    if let Some(resolution) = report.resolution() {
        println!("Video");
        println!("  Resolution: {}", resolution);
    } else if video.format.is_some() {
        println!("Video");
    }
    print_field("Format", &video.format);
    print_field("Frame rate", &video.frame_rate);
    print_field("Bit depth", &video.bit_depth);
    print_field("HDR", &video.hdr_format);

    for (index, audio) in report.audio.iter().enumerate() {
        let label = audio
            .commercial_name
            .as_deref()
            .or(audio.format.as_deref())
            .unwrap_or("unknown");
        println!(
            "Audio #{}: {} {} {} {}",
            index + 1,
            audio.flag.unwrap_or(""),
            audio.language.as_deref().unwrap_or("und"),
            label,
            audio.channels.as_deref().unwrap_or("")
        );
    }

    for (index, subtitle) in report.subtitles.iter().enumerate() {
        let forced = matches!(subtitle.forced.as_deref(), Some("Yes"));
        println!(
            "Subtitle #{}: {} {}{}{}",
            index + 1,
            subtitle.flag.unwrap_or(""),
            subtitle.language.as_deref().unwrap_or("und"),
            subtitle
                .title
                .as_deref()
                .map(|title| format!(" ({})", title))
                .unwrap_or_default(),
            if forced { " [forced]" } else { "" }
        );
    }
}
