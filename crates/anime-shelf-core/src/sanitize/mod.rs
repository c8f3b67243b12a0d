//! Filesystem name sanitization
//!
//! Release names from fansub groups are full of full-width punctuation and
//! symbols that either break on Windows filesystems or make paths awkward to
//! type. [`sanitize_component`] normalizes a single path component and
//! [`sanitize_path`] applies it to every component of a path, truncating the
//! filename when the assembled path gets too long.

mod path;

pub use path::{
    exceeds_path_limit, sanitize_path, sanitize_path_under, sanitize_path_with, split_extension,
    PathStyle, MAX_PATH_LEN, STEM_KEEP, STEM_TRUNCATE_TRIGGER,
};

/// Characters remapped to a safer equivalent before anything else happens.
pub const REPLACEMENTS: &[(char, char)] = &[
    ('☆', '★'),
    ('～', '~'),
    ('＆', '&'),
    ('！', '!'),
    ('？', '?'),
    ('：', ':'),
    ('；', ';'),
    ('，', ','),
    ('。', '.'),
    ('（', '('),
    ('）', ')'),
    ('【', '['),
    ('】', ']'),
    ('｛', '{'),
    ('｝', '}'),
    ('\u{3000}', ' '),
];

/// Characters Windows refuses in file and directory names.
pub const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Replacement for every character in [`ILLEGAL_CHARS`].
pub const ILLEGAL_REPLACEMENT: char = '_';

fn remap(c: char) -> char {
    REPLACEMENTS
        .iter()
        .find(|(from, _)| *from == c)
        .map_or(c, |(_, to)| *to)
}

/// Sanitize a single path component (a directory name or a filename).
///
/// Steps, in order:
/// 1. full-width punctuation and special symbols are remapped through
///    [`REPLACEMENTS`]
/// 2. characters in [`ILLEGAL_CHARS`] become `_`
/// 3. control characters (code points below 32) are dropped
/// 4. leading and trailing spaces and periods are trimmed
///
/// Remapping runs first, so `？` and `：` end up as `_` as well.
///
/// # Examples
///
/// ```
/// use anime_shelf_core::sanitize_component;
///
/// assert_eq!(sanitize_component("Show☆Name～Part"), "Show★Name~Part");
/// assert_eq!(sanitize_component("What？ Now: Go"), "What_ Now_ Go");
/// assert_eq!(sanitize_component("  .hidden. "), "hidden");
/// ```
pub fn sanitize_component(text: &str) -> String {
    text.chars()
        .map(remap)
        .map(|c| {
            if ILLEGAL_CHARS.contains(&c) {
                ILLEGAL_REPLACEMENT
            } else {
                c
            }
        })
        .filter(|&c| u32::from(c) >= 32)
        .collect::<String>()
        .trim_matches(|c: char| c == ' ' || c == '.')
        .to_string()
}

/// Replace `/` and `\` in a value that must stay inside one path component.
///
/// Titles such as "Fate/Zero" are substituted into folder and file names;
/// without this they would split into extra directory levels.
///
/// ```
/// use anime_shelf_core::sanitize::neutralize_separators;
///
/// assert_eq!(neutralize_separators("Fate/Zero"), "Fate_Zero");
/// assert_eq!(neutralize_separators(r"a\b"), "a_b");
/// ```
pub fn neutralize_separators(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '/' | '\\' => ILLEGAL_REPLACEMENT,
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaps_special_characters() {
        let out = sanitize_component("[x] Show☆Name～Part - 06.ass");
        assert_eq!(out, "[x] Show★Name~Part - 06.ass");

        assert_eq!(sanitize_component("【字幕组】（简体）"), "[字幕组](简体)");
        assert_eq!(sanitize_component("A＆B！"), "A&B!");
        assert_eq!(sanitize_component("a；b，c"), "a;b,c");
        assert_eq!(sanitize_component("｛x｝"), "{x}");
        assert_eq!(sanitize_component("full\u{3000}width"), "full width");
    }

    #[test]
    fn test_replaces_illegal_characters() {
        assert_eq!(sanitize_component("file:name"), "file_name");
        assert_eq!(sanitize_component("file*name?"), "file_name_");
        assert_eq!(sanitize_component("file<>|name"), "file___name");
        assert_eq!(sanitize_component("\"quoted\""), "_quoted_");
    }

    #[test]
    fn test_full_width_mapped_to_illegal_ends_as_underscore() {
        assert_eq!(sanitize_component("Why？"), "Why_");
        assert_eq!(sanitize_component("Re：Zero"), "Re_Zero");
    }

    #[test]
    fn test_drops_control_characters() {
        assert_eq!(sanitize_component("a\u{0}b\tc\nd\u{1f}e"), "abcde");
        // DEL is above the cutoff and stays
        assert_eq!(sanitize_component("a\u{7f}b"), "a\u{7f}b");
    }

    #[test]
    fn test_trims_spaces_and_periods() {
        assert_eq!(sanitize_component("  spaced  "), "spaced");
        assert_eq!(sanitize_component("...dots..."), "dots");
        assert_eq!(sanitize_component(". . mixed . ."), "mixed");
        // Only spaces, not other whitespace
        assert_eq!(sanitize_component("\u{a0}x\u{a0}"), "\u{a0}x\u{a0}");
        // Full-width period is remapped before trimming
        assert_eq!(sanitize_component("name。"), "name");
    }

    #[test]
    fn test_empty_and_degenerate_input() {
        assert_eq!(sanitize_component(""), "");
        assert_eq!(sanitize_component(" . . "), "");
        assert_eq!(sanitize_component("\u{1}\u{2}"), "");
    }

    #[test]
    fn test_leaves_path_separators_alone() {
        assert_eq!(sanitize_component("a/b\\c"), "a/b\\c");
    }

    #[test]
    fn test_neutralize_separators() {
        assert_eq!(neutralize_separators("Fate/stay night"), "Fate_stay night");
        assert_eq!(neutralize_separators("../../etc"), ".._.._etc");
        assert_eq!(neutralize_separators(r"C:\x"), "C:_x");
        assert_eq!(neutralize_separators("plain"), "plain");
    }
}
