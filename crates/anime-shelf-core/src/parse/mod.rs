//! Release name parsing
//!
//! Fansub and web releases encode most of what the organizer needs in the
//! file name: `[Group] Title - 06 [BDRip 1080p HEVC-10bit FLAC].CHT.ass`.
//! [`parse_release_name`] pulls the group, title, episode, season and a few
//! technical tags out of such names so callers only have to supply what is
//! missing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::config::is_subtitle_extension;
use crate::sanitize::split_extension;
use crate::template::extract_season;

// "[Group] ..." at the very start
static GROUP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([^\]]+)\]").unwrap());

// Language tag between a subtitle's stem and its extension: ".CHT.ass"
static LANGUAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\.((?:chs|cht|sc|tc|gb|big5|jpn?|ja|eng?|zh(?:-hans|-hant)?)(?:[&_](?:chs|cht|sc|tc|jpn?|ja|eng?))?)$",
    )
    .unwrap()
});

// "S01E05", "s2e13"
static SEASON_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bs(\d{1,2})e(\d{1,4})\b").unwrap());

// Episode markers, tried in order after the SxxEyy form
// "Title - 06 [..]", "Title - 12v2", "Title - 03 (1080p)"
static DASH_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s-\s(\d{1,4})(?:v\d+)?(?:\s|\[|\(|$)").unwrap());
// "[05]", "[12v2]", "[12END]"
static BRACKET_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(\d{1,3})(?:v\d+)?(?:END|完)?\]").unwrap());
// "第05话", "第5集"
static CJK_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s*(\d{1,4})\s*[话話集]").unwrap());
// "EP05", "E05"
static WORD_EPISODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bep?(\d{1,4})\b").unwrap());

// Season marker left at the end of a title: "Oshi no Ko S2", "间谍过家家 第2季"
static SEASON_SUFFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\s._-]*(?:season\s*\d+|s\d{1,2}|第\s*\d+\s*季)$").unwrap()
});

static RESOLUTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d{3,4})p\b").unwrap());
static DIMENSIONS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{3,4}x(\d{3,4})\b").unwrap());
static UHD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b4k\b").unwrap());

static AUDIO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(flac|aac|e-?ac-?3|ac3|dts|opus|mp3|truehd)\b").unwrap()
});

/// Video extensions stripped before parsing
const MEDIA_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m2ts", "ts", "rmvb",
];

/// What could be read from a release name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRelease {
    /// Show title; never empty for a non-empty name
    pub title: String,
    pub episode: Option<u32>,
    pub season: Option<u32>,
    /// Release group from the leading `[...]`
    pub group: Option<String>,
    /// Normalized to lowercase, e.g. `1080p`
    pub resolution: Option<String>,
    /// `H.264` or `H.265`
    pub video_codec: Option<String>,
    /// Uppercased, e.g. `FLAC`
    pub audio_codec: Option<String>,
    /// Subtitle language tag, e.g. `CHT` in `.CHT.ass`
    pub language: Option<String>,
}

/// Parse a release file name (or a path; only the final component is used).
///
/// # Examples
///
/// ```
/// use anime_shelf_core::parse_release_name;
///
/// let parsed = parse_release_name("[SubsPlease] Oshi no Ko S2 - 03 (1080p) [A1B2C3D4].mkv");
/// assert_eq!(parsed.group.as_deref(), Some("SubsPlease"));
/// assert_eq!(parsed.title, "Oshi no Ko");
/// assert_eq!(parsed.season, Some(2));
/// assert_eq!(parsed.episode, Some(3));
/// assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
/// ```
pub fn parse_release_name(name: &str) -> ParsedRelease {
    let name = final_component(name);
    let mut parsed = ParsedRelease::default();

    let stem = strip_extensions(name, &mut parsed);
    let stem = stem.replace('【', "[").replace('】', "]");

    let rest = match GROUP_PATTERN.captures(&stem) {
        Some(caps) => {
            parsed.group = caps.get(1).map(|m| m.as_str().trim().to_string());
            &stem[caps.get(0).map_or(0, |m| m.end())..]
        }
        None => stem.as_str(),
    };

    let (title_part, tail) = match find_episode(rest) {
        Some(found) => {
            parsed.episode = Some(found.episode);
            parsed.season = found.season;
            (&rest[..found.start], &rest[found.end..])
        }
        None => (rest, rest),
    };

    let mut title = clean_title(title_part);
    if parsed.season.is_none() {
        parsed.season = extract_season(&title);
    }
    if parsed.season.is_some() {
        let stripped = SEASON_SUFFIX_PATTERN.replace(&title, "");
        if !stripped.trim().is_empty() {
            title = stripped.trim().to_string();
        }
    }

    if title.is_empty() {
        // "[Title][05]": the only bracket before the episode was the title
        title = match parsed.group.take() {
            Some(group) => group,
            None => extract_title(&stem),
        };
    }
    if title.is_empty() {
        title = stem.trim().to_string();
    }
    parsed.title = title;

    read_tags(tail, &mut parsed);

    tracing::debug!("Parsed release name {:?}: {:?}", name, parsed);
    parsed
}

/// Everything before the first `[`, trimmed.
///
/// Used when no episode marker splits the name.
///
/// ```
/// use anime_shelf_core::parse::extract_title;
///
/// assert_eq!(extract_title("Frieren [1080p]"), "Frieren");
/// ```
pub fn extract_title(name: &str) -> String {
    name.split('[').next().unwrap_or(name).trim().to_string()
}

fn final_component(name: &str) -> &str {
    name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name)
}

/// Drop a known media extension, and for subtitles the language tag in front
/// of it
fn strip_extensions<'a>(name: &'a str, parsed: &mut ParsedRelease) -> &'a str {
    let (stem, ext) = split_extension(name);
    let ext = ext.trim_start_matches('.').to_lowercase();

    if is_subtitle_extension(&ext) {
        if let Some(caps) = LANGUAGE_PATTERN.captures(stem) {
            parsed.language = caps.get(1).map(|m| m.as_str().to_string());
            return &stem[..caps.get(0).map_or(stem.len(), |m| m.start())];
        }
        stem
    } else if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
        stem
    } else {
        name
    }
}

struct EpisodeMatch {
    episode: u32,
    season: Option<u32>,
    start: usize,
    end: usize,
}

fn find_episode(text: &str) -> Option<EpisodeMatch> {
    if let Some(caps) = SEASON_EPISODE_PATTERN.captures(text) {
        let whole = caps.get(0)?;
        let episode = caps.get(2)?.as_str().parse().ok()?;
        return Some(EpisodeMatch {
            episode,
            season: caps.get(1).and_then(|m| m.as_str().parse().ok()),
            start: whole.start(),
            end: whole.end(),
        });
    }

    [
        &*DASH_EPISODE_PATTERN,
        &*BRACKET_EPISODE_PATTERN,
        &*CJK_EPISODE_PATTERN,
        &*WORD_EPISODE_PATTERN,
    ]
    .into_iter()
    .find_map(|pattern| {
        let caps = pattern.captures(text)?;
        let whole = caps.get(0)?;
        Some(EpisodeMatch {
            episode: caps.get(1)?.as_str().parse().ok()?,
            season: None,
            start: whole.start(),
            end: whole.end(),
        })
    })
}

fn clean_title(raw: &str) -> String {
    let piece = raw
        .split(['[', ']'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("");

    // "Sousou.no.Frieren" style names use dots or underscores for spaces
    let piece = if piece.contains(' ') {
        piece.to_string()
    } else {
        piece.replace(['.', '_'], " ")
    };

    piece
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .to_string()
}

fn read_tags(tail: &str, parsed: &mut ParsedRelease) {
    parsed.resolution = RESOLUTION_PATTERN
        .captures(tail)
        .and_then(|caps| caps.get(1))
        .map(|m| format!("{}p", m.as_str()))
        .or_else(|| {
            DIMENSIONS_PATTERN
                .captures(tail)
                .and_then(|caps| caps.get(1))
                .map(|m| format!("{}p", m.as_str()))
        })
        .or_else(|| UHD_PATTERN.is_match(tail).then(|| "2160p".to_string()));

    let lower = tail.to_lowercase();
    if ["h264", "h.264", "x264", "avc"].iter().any(|t| lower.contains(t)) {
        parsed.video_codec = Some("H.264".to_string());
    } else if ["h265", "h.265", "x265", "hevc"].iter().any(|t| lower.contains(t)) {
        parsed.video_codec = Some("H.265".to_string());
    }

    parsed.audio_codec = AUDIO_PATTERN
        .find(tail)
        .map(|m| m.as_str().to_uppercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fansub_subtitle_name() {
        let parsed = parse_release_name(
            "[hyakuhuyu&LoliHouse] BanG Dream! Girls Band Party!☆PICO～OHMORI～ - 06 [BDRip 1080p HEVC-10bit FLAC].CHT.ass",
        );

        assert_eq!(parsed.group.as_deref(), Some("hyakuhuyu&LoliHouse"));
        assert_eq!(parsed.title, "BanG Dream! Girls Band Party!☆PICO～OHMORI～");
        assert_eq!(parsed.episode, Some(6));
        assert_eq!(parsed.season, None);
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
        assert_eq!(parsed.video_codec.as_deref(), Some("H.265"));
        assert_eq!(parsed.audio_codec.as_deref(), Some("FLAC"));
        assert_eq!(parsed.language.as_deref(), Some("CHT"));
    }

    #[test]
    fn test_web_release_with_season() {
        let parsed = parse_release_name(
            "[LoliHouse] Spy x Family Season 2 - 05 [WebRip 1080p HEVC-10bit AAC ASSx2].mkv",
        );
        assert_eq!(parsed.title, "Spy x Family");
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.episode, Some(5));
        assert_eq!(parsed.audio_codec.as_deref(), Some("AAC"));
        assert_eq!(parsed.language, None);
    }

    #[test]
    fn test_bracketed_episode() {
        let parsed =
            parse_release_name("[Nekomoe kissaten][Sousou no Frieren][05][1080p][JPSC].mp4");
        assert_eq!(parsed.group.as_deref(), Some("Nekomoe kissaten"));
        assert_eq!(parsed.title, "Sousou no Frieren");
        assert_eq!(parsed.episode, Some(5));
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_chinese_release() {
        let parsed = parse_release_name("【喵萌奶茶屋】间谍过家家 第2季 [05][1080p][简日双语].mp4");
        assert_eq!(parsed.group.as_deref(), Some("喵萌奶茶屋"));
        assert_eq!(parsed.title, "间谍过家家");
        assert_eq!(parsed.season, Some(2));
        assert_eq!(parsed.episode, Some(5));
    }

    #[test]
    fn test_cjk_episode_marker() {
        let parsed = parse_release_name("[字幕组] 葬送的芙莉莲 第12话 [1080P].mp4");
        assert_eq!(parsed.title, "葬送的芙莉莲");
        assert_eq!(parsed.episode, Some(12));
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
    }

    #[test]
    fn test_scene_style_name() {
        let parsed = parse_release_name("Sousou.no.Frieren.S01E05.1920x1080.WEB.x264.mkv");
        assert_eq!(parsed.title, "Sousou no Frieren");
        assert_eq!(parsed.season, Some(1));
        assert_eq!(parsed.episode, Some(5));
        assert_eq!(parsed.resolution.as_deref(), Some("1080p"));
        assert_eq!(parsed.video_codec.as_deref(), Some("H.264"));
        assert_eq!(parsed.group, None);
    }

    #[test]
    fn test_episode_version_suffix() {
        let parsed = parse_release_name("[Erai-raws] Title - 12v2 [720p].mkv");
        assert_eq!(parsed.title, "Title");
        assert_eq!(parsed.episode, Some(12));
        assert_eq!(parsed.resolution.as_deref(), Some("720p"));
    }

    #[test]
    fn test_title_only_bracket() {
        let parsed = parse_release_name("[Sousou no Frieren][05].mkv");
        assert_eq!(parsed.title, "Sousou no Frieren");
        assert_eq!(parsed.group, None);
        assert_eq!(parsed.episode, Some(5));
    }

    #[test]
    fn test_no_episode_falls_back_to_leading_text() {
        let parsed = parse_release_name("[Group] Movie Title [BDRip 4K].mkv");
        assert_eq!(parsed.title, "Movie Title");
        assert_eq!(parsed.episode, None);
        assert_eq!(parsed.resolution.as_deref(), Some("2160p"));
    }

    #[test]
    fn test_uses_final_path_component() {
        let parsed = parse_release_name(r"D:\Downloads\Season 3\[Sub] Show - 01.mkv");
        assert_eq!(parsed.title, "Show");
        assert_eq!(parsed.episode, Some(1));
        // Folder names are not part of the release name
        assert_eq!(parsed.season, None);
    }

    #[test]
    fn test_unknown_extension_is_kept() {
        let parsed = parse_release_name("Dr. Stone - 05");
        assert_eq!(parsed.title, "Dr. Stone");
        assert_eq!(parsed.episode, Some(5));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("Show Name [1080p][x264]"), "Show Name");
        assert_eq!(extract_title("[Group] Show"), "");
        assert_eq!(extract_title("plain"), "plain");
    }
}
