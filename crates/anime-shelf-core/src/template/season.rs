//! Season number detection from folder and release names

use regex::Regex;
use std::sync::LazyLock;

// Tried in order; the first pattern that matches wins.
// "Season 2", "season2"
static SEASON_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)season\s*(\d+)").unwrap());
// "S2", "S02E05", but not the "s" ending a word like "Pass1"
static SEASON_SHORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^a-z])s(\d+)").unwrap());
// "第2季"
static SEASON_CJK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"第\s*(\d+)\s*季").unwrap());

/// Extract a season number from a folder or release name.
///
/// `Season N` is tried first, then `SN`, then `第N季`.
///
/// ```
/// use anime_shelf_core::extract_season;
///
/// assert_eq!(extract_season("Season 2"), Some(2));
/// assert_eq!(extract_season("第3季"), Some(3));
/// assert_eq!(extract_season("Frieren S02E05"), Some(2));
/// assert_eq!(extract_season("Frieren - 05"), None);
/// ```
pub fn extract_season(text: &str) -> Option<u32> {
    [
        &*SEASON_WORD_PATTERN,
        &*SEASON_SHORT_PATTERN,
        &*SEASON_CJK_PATTERN,
    ]
    .into_iter()
    .find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

/// Like [`extract_season`], but assumes season 1 when nothing is found.
pub fn season_or_default(text: &str) -> u32 {
    extract_season(text).unwrap_or(1)
}
