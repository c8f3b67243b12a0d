//! Handling targets that already exist in the library

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sanitize::{split_extension, PathStyle};

/// Highest numeric suffix tried when renaming around an existing file
pub const MAX_RENAME_ATTEMPTS: u32 = 100;

/// What to do when the planned target is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictStrategy {
    /// Leave the existing file alone and drop this one
    #[default]
    Skip,
    /// Replace the existing file
    Overwrite,
    /// Place the file next to it as `stem_1.ext`, `stem_2.ext`, ...
    Rename,
}

/// Alternative names for `file_name`, from `stem_1.ext` up to
/// `stem_100.ext`.
///
/// ```
/// use anime_shelf_core::organize::rename_candidates;
///
/// let names: Vec<String> = rename_candidates("ep06.CHT.ass").take(2).collect();
/// assert_eq!(names, ["ep06.CHT_1.ass", "ep06.CHT_2.ass"]);
/// ```
pub fn rename_candidates(file_name: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = split_extension(file_name);
    (1..=MAX_RENAME_ATTEMPTS).map(move |n| format!("{stem}_{n}{ext}"))
}

/// First candidate from [`rename_candidates`] for which `exists` is false.
pub fn next_available_name(file_name: &str, exists: impl Fn(&str) -> bool) -> Option<String> {
    rename_candidates(file_name).find(|name| !exists(name))
}

/// Decide the final target for a planned path.
///
/// `exists` is asked about full paths, so callers decide what "taken" means
/// (a real filesystem check, names already claimed in a batch, ...). Returns
/// `Ok(None)` when the file should be skipped.
pub fn resolve_conflict(
    target: &str,
    strategy: ConflictStrategy,
    style: PathStyle,
    exists: impl Fn(&str) -> bool,
) -> Result<Option<String>> {
    if !exists(target) {
        return Ok(Some(target.to_string()));
    }

    match strategy {
        ConflictStrategy::Skip => {
            tracing::info!("Skipping, target already exists: {}", target);
            Ok(None)
        }
        ConflictStrategy::Overwrite => {
            tracing::info!("Overwriting existing target: {}", target);
            Ok(Some(target.to_string()))
        }
        ConflictStrategy::Rename => {
            let (directory, file_name) = match target.rfind(|c: char| style.is_separator(c)) {
                Some(idx) => target.split_at(idx + 1),
                None => ("", target),
            };

            let renamed = next_available_name(file_name, |name| {
                exists(&format!("{directory}{name}"))
            })
            .map(|name| format!("{directory}{name}"))
            .ok_or_else(|| Error::NoFreeName {
                path: target.to_string(),
                attempts: MAX_RENAME_ATTEMPTS,
            })?;

            tracing::info!("Renaming target: {} -> {}", target, renamed);
            Ok(Some(renamed))
        }
    }
}
