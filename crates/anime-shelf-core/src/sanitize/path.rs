//! Whole-path sanitization and length guarding

use super::sanitize_component;
use crate::error::{Error, Result};

/// Longest path (in characters) accepted without truncating the filename.
pub const MAX_PATH_LEN: usize = 260;

/// Stems longer than this are truncated when the path is over [`MAX_PATH_LEN`].
pub const STEM_TRUNCATE_TRIGGER: usize = 100;

/// Characters of the stem kept when truncating, before the `...` marker.
pub const STEM_KEEP: usize = 97;

const ELLIPSIS: &str = "...";

/// Separator convention used to split and rejoin a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `/` separated
    Unix,
    /// `\` separated; `/` is also accepted when splitting and a leading
    /// drive component such as `C:` is kept verbatim
    Windows,
}

impl PathStyle {
    /// Style of the platform this crate was built for
    pub fn native() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Unix
        }
    }

    pub fn separator(self) -> char {
        match self {
            PathStyle::Unix => '/',
            PathStyle::Windows => '\\',
        }
    }

    pub(crate) fn is_separator(self, c: char) -> bool {
        match self {
            PathStyle::Unix => c == '/',
            PathStyle::Windows => c == '\\' || c == '/',
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

/// Split a filename into stem and extension (the extension keeps its dot).
///
/// Leading dots never start an extension, so `.hidden` has no extension.
///
/// ```
/// use anime_shelf_core::split_extension;
///
/// assert_eq!(split_extension("ep06.CHT.ass"), ("ep06.CHT", ".ass"));
/// assert_eq!(split_extension(".hidden"), (".hidden", ""));
/// assert_eq!(split_extension("README"), ("README", ""));
/// ```
pub fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if filename[..idx].chars().any(|c| c != '.') => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Whether `path` is longer than [`MAX_PATH_LEN`] characters.
///
/// [`sanitize_path`] truncates at most once, so callers that need a hard
/// guarantee should check its output with this.
pub fn exceeds_path_limit(path: &str) -> bool {
    path.chars().count() > MAX_PATH_LEN
}

/// Sanitize every component of `path` using the platform's separator.
///
/// See [`sanitize_path_with`].
pub fn sanitize_path(path: &str) -> Result<String> {
    sanitize_path_with(path, PathStyle::native())
}

/// Sanitize every component of `path` and guard its total length.
///
/// Empty components (a leading root marker, doubled separators) and the
/// relative markers `.` and `..` are kept as they are. When the result is
/// longer than [`MAX_PATH_LEN`] characters and the filename stem is longer
/// than [`STEM_TRUNCATE_TRIGGER`], the stem is cut to [`STEM_KEEP`]
/// characters followed by `...`; the extension is kept. This happens once: a
/// path that is still too long afterwards is returned unchanged.
///
/// Fails with [`Error::InvalidPath`] when `path` is empty, contains a NUL
/// byte, or has no filename after its last separator.
///
/// # Examples
///
/// ```
/// use anime_shelf_core::{sanitize_path_with, PathStyle};
///
/// let out = sanitize_path_with("/media/Show☆Name/ep：01.mkv", PathStyle::Unix).unwrap();
/// assert_eq!(out, "/media/Show★Name/ep_01.mkv");
///
/// let out = sanitize_path_with(r"E:\Anime\Part？\a.ass", PathStyle::Windows).unwrap();
/// assert_eq!(out, r"E:\Anime\Part_\a.ass");
/// ```
pub fn sanitize_path_with(path: &str, style: PathStyle) -> Result<String> {
    sanitize_joined("", path, style)
}

/// Sanitize `relative` and place it under `root`, which is used verbatim.
///
/// `root` is a directory the caller already trusts (a configured library
/// folder, for instance), so hidden or relative parts such as `.anime` or
/// `../library` survive. A separator is inserted unless `root` already ends
/// with one, and an empty `root` leaves the result relative. The length guard
/// of [`sanitize_path_with`] applies to the assembled path.
///
/// ```
/// use anime_shelf_core::{sanitize_path_under, PathStyle};
///
/// let out = sanitize_path_under("../.anime", "Show？/ep 01.mkv", PathStyle::Unix).unwrap();
/// assert_eq!(out, "../.anime/Show_/ep 01.mkv");
/// ```
pub fn sanitize_path_under(root: &str, relative: &str, style: PathStyle) -> Result<String> {
    sanitize_joined(root, relative, style)
}

fn sanitize_joined(root: &str, path: &str, style: PathStyle) -> Result<String> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.contains('\0') || root.contains('\0') {
        return Err(Error::invalid_path(path, "path contains a NUL byte"));
    }

    let (directory, filename) = match path.rfind(|c: char| style.is_separator(c)) {
        Some(idx) => {
            // Separators are ASCII, so idx + 1 is a char boundary
            (Some(&path[..idx]), &path[idx + 1..])
        }
        None => (None, path),
    };

    if filename.is_empty() {
        return Err(Error::invalid_path(path, "no filename after the last separator"));
    }

    let filename = sanitize_component(filename);
    if filename.is_empty() {
        return Err(Error::invalid_path(path, "filename is empty after sanitizing"));
    }

    let prefix = match root.chars().last() {
        None => String::new(),
        Some(last) if style.is_separator(last) => root.to_string(),
        Some(_) => format!("{}{}", root, style.separator()),
    };
    let directory = directory.map(|dir| sanitize_directory(dir, style));
    let assemble = |name: &str| format!("{}{}", prefix, join(directory.as_deref(), name, style));

    let mut assembled = assemble(&filename);

    if exceeds_path_limit(&assembled) {
        let (stem, ext) = split_extension(&filename);
        if stem.chars().count() > STEM_TRUNCATE_TRIGGER {
            let short_stem: String = stem.chars().take(STEM_KEEP).collect();
            let short_name = format!("{short_stem}{ELLIPSIS}{ext}");
            tracing::debug!(
                "Truncated filename stem to {} characters: {}",
                STEM_KEEP,
                short_name
            );
            assembled = assemble(&short_name);
        }

        if exceeds_path_limit(&assembled) {
            tracing::warn!(
                "Path still exceeds {} characters ({}): {}",
                MAX_PATH_LEN,
                assembled.chars().count(),
                assembled
            );
        }
    }

    Ok(assembled)
}

fn sanitize_directory(directory: &str, style: PathStyle) -> String {
    let separator = style.separator().to_string();

    directory
        .split(|c: char| style.is_separator(c))
        .enumerate()
        .map(|(i, part)| {
            let keep = matches!(part, "" | "." | "..")
                || (i == 0 && style == PathStyle::Windows && is_drive(part));
            if keep {
                part.to_string()
            } else {
                sanitize_component(part)
            }
        })
        .collect::<Vec<_>>()
        .join(&separator)
}

fn is_drive(part: &str) -> bool {
    let bytes = part.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn join(directory: Option<&str>, filename: &str, style: PathStyle) -> String {
    match directory {
        Some(dir) => format!("{}{}{}", dir, style.separator(), filename),
        None => filename.to_string(),
    }
}
