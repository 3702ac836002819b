//! MediaInfo text report parsing.
//!
//! Turns the plain-text output of the `mediainfo` tool into a small
//! structured summary: general container facts, the video stream, and every
//! audio and subtitle track. Only the fields a share preview needs are kept;
//! everything else in the report is ignored.
//!
//! Parsing never fails. Lines that are neither a known section header nor a
//! `key : value` pair are skipped, so partial or hand-edited reports still
//! produce whatever they contain.

use serde::Serialize;

/// Channel names that count towards the main (ear-level) layout.
const MAIN_CHANNELS: &[&str] = &[
    "Lscr", "Rscr", "C", "Lc", "Rc", "L", "R", "Lw", "Rw", "Lss", "Rss", "Ls", "Rs", "Lsd", "Rsd",
    "Lb", "Rb", "Cb", "M",
];

const LFE_CHANNELS: &[&str] = &["LFE", "LFE2"];

const HEIGHT_CHANNELS: &[&str] = &[
    "Bfc", "Bfl", "Bfr", "Tfc", "Vhl", "Vhr", "Tfl", "Tfr", "Tsl", "Tsr", "Lvs", "Rvs", "Tbl",
    "Tbr", "Tbc", "Tc",
];

/// Container-level facts from the `General` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct General {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_name: Option<String>,
}

/// The video stream. Reports with several video sections merge into one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Video {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_depth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdr_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_primaries: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_characteristics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_size: Option<String>,
}

impl Video {
    fn is_empty(&self) -> bool {
        self == &Video::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commercial_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_settings: Option<String>,

    /// `main.lfe` or `main.lfe.height`, e.g. `5.1` or `7.1.4`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubtitleTrack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced: Option<String>,
}

/// Structured view of a MediaInfo report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaReport {
    pub general: General,
    #[serde(skip_serializing_if = "Video::is_empty")]
    pub video: Video,
    pub audio: Vec<AudioTrack>,
    pub subtitles: Vec<SubtitleTrack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    General,
    Video,
    Audio,
    Text,
    Other,
}

impl Section {
    fn from_header(line: &str) -> Option<Self> {
        // Headers carry an optional stream number: "Audio #2"
        let name = line.split_whitespace().next()?;
        if line.contains(':') {
            return None;
        }
        match name {
            "General" => Some(Section::General),
            "Video" => Some(Section::Video),
            "Audio" => Some(Section::Audio),
            "Text" => Some(Section::Text),
            "Menu" | "Image" | "Other" => Some(Section::Other),
            _ => None,
        }
    }
}

enum Track {
    Audio(AudioTrack),
    Text(SubtitleTrack),
}

impl MediaReport {
    /// Parse MediaInfo text output.
    pub fn parse(text: &str) -> Self {
        let mut report = MediaReport::default();
        let mut section = Section::Preamble;
        let mut track: Option<Track> = None;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if let Some(next) = Section::from_header(line) {
                report.finish_track(track.take());
                section = next;
                track = match next {
                    Section::Audio => Some(Track::Audio(AudioTrack::default())),
                    Section::Text => Some(Track::Text(SubtitleTrack::default())),
                    _ => None,
                };
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim().to_string();

            match (section, track.as_mut()) {
                (Section::General, _) => report.general.set(&key, value),
                (Section::Video, _) => report.video.set(&key, value),
                (Section::Audio, Some(Track::Audio(audio))) => audio.set(&key, value),
                (Section::Text, Some(Track::Text(subtitle))) => subtitle.set(&key, value),
                _ => {}
            }
        }

        report.finish_track(track);
        report
    }

    fn finish_track(&mut self, track: Option<Track>) {
        match track {
            Some(Track::Audio(mut audio)) => {
                audio.flag = audio.language.as_deref().and_then(language_flag);
                self.audio.push(audio);
            }
            Some(Track::Text(mut text)) => {
                text.flag = text.language.as_deref().and_then(language_flag);
                self.subtitles.push(text);
            }
            None => {}
        }
    }

    /// Human-readable resolution such as `1920x1080`, if both sides are known.
    pub fn resolution(&self) -> Option<String> {
        match (&self.video.width, &self.video.height) {
            (Some(width), Some(height)) => Some(format!("{}x{}", width, height)),
            _ => None,
        }
    }
}

impl General {
    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "format" => &mut self.format,
            "duration" => &mut self.duration,
            "overall bit rate" | "bit rate" => &mut self.bitrate,
            "file size" | "size" => &mut self.size,
            "frame rate" => &mut self.frame_rate,
            "complete name" => &mut self.complete_name,
            "movie name" => &mut self.movie_name,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Video {
    fn set(&mut self, key: &str, value: String) {
        let value = match key {
            "width" | "height" => value.replace("pixels", "").replace(' ', ""),
            _ => value,
        };
        let slot = match key {
            "format" => &mut self.format,
            "width" => &mut self.width,
            "height" => &mut self.height,
            "display aspect ratio" | "aspect ratio" => &mut self.aspect_ratio,
            "frame rate" | "frame rate mode" => &mut self.frame_rate,
            "bit rate" | "nominal bit rate" => &mut self.bit_rate,
            "bit depth" | "bit depth (bits)" => &mut self.bit_depth,
            "hdr format" => &mut self.hdr_format,
            "color primaries" => &mut self.color_primaries,
            "transfer characteristics" => &mut self.transfer_characteristics,
            "title" => &mut self.title,
            "stream size" => &mut self.stream_size,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl AudioTrack {
    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "language" => &mut self.language,
            "format" => &mut self.format,
            "channel layout" => {
                self.channels = Some(channel_summary(&value));
                return;
            }
            "bit rate" | "nominal bit rate" => &mut self.bit_rate,
            "format settings" => &mut self.format_settings,
            "sampling rate" | "sampling frequency" => &mut self.sampling_rate,
            "commercial name" => &mut self.commercial_name,
            "title" => &mut self.title,
            "stream size" => &mut self.stream_size,
            "default" => &mut self.default,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl SubtitleTrack {
    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "language" => &mut self.language,
            "title" => &mut self.title,
            "default" => &mut self.default,
            "forced" => &mut self.forced,
            _ => return,
        };
        *slot = Some(value);
    }
}

/// Count a MediaInfo channel layout (`"L R C LFE Ls Rs"`) as `main.lfe[.height]`.
pub fn channel_summary(layout: &str) -> String {
    let (mut main, mut lfe, mut height) = (0, 0, 0);
    for channel in layout.split_whitespace() {
        if MAIN_CHANNELS.contains(&channel) {
            main += 1;
        } else if LFE_CHANNELS.contains(&channel) {
            lfe += 1;
        } else if HEIGHT_CHANNELS.contains(&channel) {
            height += 1;
        }
    }

    if height > 0 {
        format!("{}.{}.{}", main, lfe, height)
    } else {
        format!("{}.{}", main, lfe)
    }
}

/// Flag emoji for a language code such as `EN` or `English (US)`.
pub fn language_flag(language: &str) -> Option<&'static str> {
    let mut code = language.trim();
    if let (Some(open), Some(close)) = (code.find('('), code.find(')')) {
        if open < close {
            code = code[open + 1..close].trim();
        }
    }

    let flag = match code.to_ascii_uppercase().as_str() {
        "JP" | "JA" => "\u{1F1EF}\u{1F1F5}",
        "EN" | "US" => "\u{1F1FA}\u{1F1F8}",
        "GB" => "\u{1F1EC}\u{1F1E7}",
        "FR" => "\u{1F1EB}\u{1F1F7}",
        "ES" => "\u{1F1EA}\u{1F1F8}",
        "DE" => "\u{1F1E9}\u{1F1EA}",
        "IT" => "\u{1F1EE}\u{1F1F9}",
        "CN" | "ZH" => "\u{1F1E8}\u{1F1F3}",
        "KO" | "KR" => "\u{1F1F0}\u{1F1F7}",
        "RU" => "\u{1F1F7}\u{1F1FA}",
        _ => return None,
    };
    Some(flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
General
Complete name                            : D:\\Movies\\Example.mkv
Format                                   : Matroska
File size                                : 4.37 GiB
Duration                                 : 1 h 52 min
Overall bit rate                         : 5 574 kb/s
Movie name                               : Example

Video
Format                                   : HEVC
Width                                    : 1 920 pixels
Height                                   : 1 080 pixels
Display aspect ratio                     : 16:9
Frame rate                               : 23.976 FPS
Bit depth                                : 10 bits
HDR format                               : SMPTE ST 2086

Audio #1
Format                                   : E-AC-3 JOC
Commercial name                          : Dolby Digital Plus with Dolby Atmos
Channel layout                           : L R C LFE Ls Rs Lb Rb Tfl Tfr Tbl Tbr
Sampling rate                            : 48.0 kHz
Language                                 : English
Default                                  : Yes

Audio #2
Format                                   : AAC LC
Channel layout                           : L R
Language                                 : ja

Text #1
Language                                 : English (US)
Title                                    : SDH
Forced                                   : No

Text #2
Language                                 : Korean (KO)
Default                                  : No

Menu
00:00:00.000                             : en:Chapter 1
";

    #[test]
    fn test_parse_general_and_video() {
        let report = MediaReport::parse(SAMPLE);

        assert_eq!(report.general.format.as_deref(), Some("Matroska"));
        assert_eq!(
            report.general.complete_name.as_deref(),
            Some("D:\\Movies\\Example.mkv")
        );
        assert_eq!(report.general.bitrate.as_deref(), Some("5 574 kb/s"));
        assert_eq!(report.video.width.as_deref(), Some("1920"));
        assert_eq!(report.video.height.as_deref(), Some("1080"));
        assert_eq!(report.video.aspect_ratio.as_deref(), Some("16:9"));
        assert_eq!(report.resolution().as_deref(), Some("1920x1080"));
    }

    #[test]
    fn test_parse_tracks() {
        let report = MediaReport::parse(SAMPLE);

        assert_eq!(report.audio.len(), 2);
        assert_eq!(report.audio[0].channels.as_deref(), Some("7.1.4"));
        assert_eq!(report.audio[0].flag, None);
        assert_eq!(report.audio[1].channels.as_deref(), Some("2.0"));
        assert_eq!(report.audio[1].flag, Some("\u{1F1EF}\u{1F1F5}"));

        assert_eq!(report.subtitles.len(), 2);
        assert_eq!(report.subtitles[0].title.as_deref(), Some("SDH"));
        assert_eq!(report.subtitles[0].flag, Some("\u{1F1FA}\u{1F1F8}"));
        assert_eq!(report.subtitles[1].flag, Some("\u{1F1F0}\u{1F1F7}"));
    }

    #[test]
    fn test_track_before_menu_is_kept() {
        let report = MediaReport::parse("Audio\nFormat : FLAC\nMenu\n00:01 : Chapter");
        assert_eq!(report.audio.len(), 1);
        assert_eq!(report.audio[0].format.as_deref(), Some("FLAC"));
    }

    #[test]
    fn test_unstructured_text_yields_empty_report() {
        let report = MediaReport::parse("MediaInfo report A");
        assert_eq!(report, MediaReport::default());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("video").is_none());
        assert_eq!(json["audio"], serde_json::json!([]));
    }

    #[test]
    fn test_channel_summary() {
        assert_eq!(channel_summary("L R C LFE Ls Rs"), "5.1");
        assert_eq!(channel_summary("M"), "1.0");
        assert_eq!(channel_summary("Object Based"), "0.0");
    }

    #[test]
    fn test_language_flag() {
        assert_eq!(language_flag("fr"), Some("\u{1F1EB}\u{1F1F7}"));
        assert_eq!(language_flag(" Chinese (zh) "), Some("\u{1F1E8}\u{1F1F3}"));
        assert_eq!(language_flag("Klingon"), None);
        assert_eq!(language_flag(""), None);
    }
}
