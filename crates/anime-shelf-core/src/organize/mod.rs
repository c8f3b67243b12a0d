//! Library layout: show folders, season subfolders and episode file names

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::OrganizerConfig;
use crate::error::{Error, Result};
use crate::sanitize::{
    neutralize_separators, sanitize_component, sanitize_path_under, split_extension, PathStyle,
};
use crate::template::{apply_template, TemplateContext};

mod conflict;

pub use conflict::{
    next_available_name, rename_candidates, resolve_conflict, ConflictStrategy, MAX_RENAME_ATTEMPTS,
};

/// Separator used between the show folder and its season subfolder
pub const FOLDER_SEPARATOR: char = '/';

/// Build the folder path for a show, with a season subfolder when wanted.
///
/// The season subfolder is only added when `organize_by_season` is set
/// and `season` is greater than 1; first seasons live directly in the show
/// folder. Separators in the title are replaced with `_` so it stays one
/// folder, and both folder names are sanitized.
///
/// # Examples
///
/// ```
/// use anime_shelf_core::build_folder_path;
///
/// let path = build_folder_path("Title", Some(2022), 2, "{title_romaji} ({year})", "Season {season}", true);
/// assert_eq!(path, "Title (2022)/Season 2");
///
/// let path = build_folder_path("Title", Some(2022), 1, "{title_romaji} ({year})", "Season {season}", true);
/// assert_eq!(path, "Title (2022)");
/// ```
pub fn build_folder_path(
    anime_title: &str,
    year: Option<u32>,
    season: u32,
    folder_template: &str,
    season_folder_template: &str,
    organize_by_season: bool,
) -> String {
    let mut ctx = TemplateContext::new(season).with_title(neutralize_separators(anime_title));
    ctx.year = year;

    let anime_folder = sanitize_component(&apply_template(folder_template, &ctx));

    if organize_by_season && season > 1 {
        let season_folder = sanitize_component(&apply_template(season_folder_template, &ctx));
        format!("{anime_folder}{FOLDER_SEPARATOR}{season_folder}")
    } else {
        anime_folder
    }
}

/// A source file and the show information used to place it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeRequest {
    /// Source file name or path; only the final component is used
    pub source: String,
    pub title: String,
    pub year: Option<u32>,
    pub season: u32,
    pub episode: u32,
    pub group: Option<String>,
}

impl OrganizeRequest {
    pub fn new(source: impl Into<String>, title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            year: None,
            season,
            episode,
            group: None,
        }
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Final component of `source`
    fn source_name(&self) -> Option<&str> {
        Path::new(&self.source)
            .file_name()
            .and_then(|name| name.to_str())
    }

    fn context(&self, ext: &str) -> TemplateContext {
        let mut ctx = TemplateContext::new(self.season)
            .with_title(neutralize_separators(&self.title))
            .with_episode(self.episode)
            .with_ext(ext);
        ctx.year = self.year;
        ctx.group = self.group.as_deref().map(neutralize_separators);
        ctx
    }
}

/// Plan where a source file goes inside the library, using the platform's
/// path style.
///
/// See [`plan_target_with`].
pub fn plan_target(config: &OrganizerConfig, request: &OrganizeRequest) -> Result<String> {
    plan_target_with(config, request, PathStyle::native())
}

/// Plan where a source file goes inside the library.
///
/// The result is `output_directory / show folder [/ season folder] / name`,
/// where the name comes from the config's naming template (or subtitle
/// template for subtitle files) followed by the source's extension. The
/// folders and name are sanitized; `output_directory` is used as configured,
/// so relative and hidden roots like `../library` or `~/.anime` are kept.
/// The assembled path is length-guarded by [`sanitize_path_under`].
pub fn plan_target_with(
    config: &OrganizerConfig,
    request: &OrganizeRequest,
    style: PathStyle,
) -> Result<String> {
    let source_name = request
        .source_name()
        .ok_or_else(|| Error::invalid_path(&request.source, "source has no file name"))?;
    let (_, ext) = split_extension(source_name);

    let ctx = request.context(ext);
    let folder = build_folder_path(
        &request.title,
        request.year,
        request.season,
        &config.folder_template,
        &config.season_folder_template,
        config.organize_by_season,
    );
    let file_name = format!(
        "{}{}",
        apply_template(config.template_for_extension(ext), &ctx),
        ext
    );

    let relative = format!("{}{}{}", folder, style.separator(), file_name);
    let root = config.output_directory.to_string_lossy();

    let target = sanitize_path_under(&root, &relative, style)?;
    tracing::debug!("Planned {} -> {}", request.source, target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config() -> OrganizerConfig {
        OrganizerConfig {
            output_directory: PathBuf::from("/library"),
            ..Default::default()
        }
    }

    #[test]
    fn test_season_folder_only_after_first_season() {
        let folder = |season, organize| {
            build_folder_path(
                "Title",
                Some(2022),
                season,
                "{title_romaji} ({year})",
                "Season {season}",
                organize,
            )
        };

        assert_eq!(folder(1, true), "Title (2022)");
        assert_eq!(folder(2, true), "Title (2022)/Season 2");
        assert_eq!(folder(3, false), "Title (2022)");
        assert_eq!(folder(0, true), "Title (2022)");
    }

    #[test]
    fn test_folder_names_are_sanitized() {
        let path = build_folder_path(
            "BanG Dream! Girls Band Party!☆PICO～OHMORI～",
            Some(2022),
            2,
            "{title_romaji} ({year})",
            "S{season:02}",
            true,
        );
        assert_eq!(path, "BanG Dream! Girls Band Party!★PICO~OHMORI~ (2022)/S02");
    }

    #[test]
    fn test_title_separators_become_underscores() {
        let path = build_folder_path("Fate/Zero", None, 1, "{title_romaji}", "Season {season}", true);
        assert_eq!(path, "Fate_Zero");

        let path = build_folder_path(r"A\B", Some(2020), 2, "{title_romaji} ({year})", "Season {season}", true);
        assert_eq!(path, "A_B (2020)/Season 2");
    }

    #[test]
    fn test_missing_year_leaves_token() {
        let path = build_folder_path("Title", None, 1, "{title_romaji} ({year})", "", true);
        assert_eq!(path, "Title ({year})");
    }

    #[test]
    fn test_chinese_season_template() {
        let path = build_folder_path("间谍过家家", Some(2023), 2, "{title_romaji}", "第{season}季", true);
        assert_eq!(path, "间谍过家家/第2季");
    }

    #[test]
    fn test_plan_video() {
        let request = OrganizeRequest::new("/downloads/[Group] Frieren - 05 [1080p].mkv", "Frieren", 2, 5)
            .with_year(2023);
        let target = plan_target_with(&config(), &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/library/Frieren (2023)/Season 2/Frieren - S2E05.mkv");
    }

    #[test]
    fn test_plan_subtitle_uses_subtitle_template() {
        let request = OrganizeRequest::new("ep05.ass", "Frieren", 1, 5).with_year(2023);
        let target = plan_target_with(&config(), &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/library/Frieren (2023)/Frieren - S1E05.chs.ass");
    }

    #[test]
    fn test_plan_sanitizes_title() {
        let request = OrganizeRequest::new("x.mkv", "Re：Zero？", 1, 1).with_year(2016);
        let target = plan_target_with(&config(), &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/library/Re_Zero_ (2016)/Re_Zero_ - S1E01.mkv");
    }

    #[test]
    fn test_plan_windows_style() {
        let config = OrganizerConfig {
            output_directory: PathBuf::from(r"E:\Anime\"),
            ..Default::default()
        };
        let request = OrganizeRequest::new("x.mkv", "Title", 2, 3).with_year(2022);
        let target = plan_target_with(&config, &request, PathStyle::Windows).unwrap();
        assert_eq!(target, r"E:\Anime\Title (2022)\Season 2\Title - S2E03.mkv");
    }

    #[test]
    fn test_plan_with_group_template() {
        let config = OrganizerConfig {
            naming_template: "[{group}] {title} - {episode}".to_string(),
            ..config()
        };
        let request = OrganizeRequest::new("x.mkv", "Title", 1, 7)
            .with_year(2022)
            .with_group("LoliHouse");
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/library/Title (2022)/[LoliHouse] Title - 07.mkv");
    }

    #[test]
    fn test_plan_into_filesystem_root() {
        let config = OrganizerConfig {
            output_directory: PathBuf::from("/"),
            ..Default::default()
        };
        let request = OrganizeRequest::new("x.mkv", "Title", 1, 1).with_year(2022);
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/Title (2022)/Title - S1E01.mkv");
    }

    #[test]
    fn test_plan_title_with_slash() {
        let config = OrganizerConfig {
            output_directory: PathBuf::from("/lib"),
            ..Default::default()
        };
        let request = OrganizeRequest::new("x.mkv", "Fate/Zero", 2, 1).with_year(2011);
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/lib/Fate_Zero (2011)/Season 2/Fate_Zero - S2E01.mkv");
    }

    #[test]
    fn test_plan_title_cannot_leave_library() {
        let config = OrganizerConfig {
            output_directory: PathBuf::from("/lib"),
            ..Default::default()
        };
        let request = OrganizeRequest::new("x.mkv", "../../etc", 1, 1).with_year(2011);
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/lib/_.._etc (2011)/_.._etc - S1E01.mkv");
        assert_eq!(target.matches('/').count(), 3);
    }

    #[test]
    fn test_plan_group_with_slash() {
        let config = OrganizerConfig {
            naming_template: "[{group}] {title} - {episode}".to_string(),
            ..config()
        };
        let request = OrganizeRequest::new("x.mkv", "Title", 1, 7)
            .with_year(2022)
            .with_group("Sub/Team");
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/library/Title (2022)/[Sub_Team] Title - 07.mkv");
    }

    #[test]
    fn test_plan_keeps_relative_output_directory() {
        let plan_into = |root: &str| {
            let config = OrganizerConfig {
                output_directory: PathBuf::from(root),
                ..Default::default()
            };
            let request = OrganizeRequest::new("x.mkv", "Title", 1, 1).with_year(2022);
            plan_target_with(&config, &request, PathStyle::Unix).unwrap()
        };

        assert_eq!(plan_into("./library"), "./library/Title (2022)/Title - S1E01.mkv");
        assert_eq!(plan_into("../library"), "../library/Title (2022)/Title - S1E01.mkv");
        assert_eq!(plan_into("."), "./Title (2022)/Title - S1E01.mkv");
        assert_eq!(plan_into(""), "Title (2022)/Title - S1E01.mkv");
    }

    #[test]
    fn test_plan_keeps_hidden_output_directory() {
        let config = OrganizerConfig {
            output_directory: PathBuf::from("/home/u/.anime"),
            ..Default::default()
        };
        let request = OrganizeRequest::new("x.mkv", "Title", 1, 1).with_year(2022);
        let target = plan_target_with(&config, &request, PathStyle::Unix).unwrap();
        assert_eq!(target, "/home/u/.anime/Title (2022)/Title - S1E01.mkv");
    }

    #[test]
    fn test_plan_without_file_name() {
        let request = OrganizeRequest::new("", "Title", 1, 1);
        assert!(matches!(
            plan_target_with(&config(), &request, PathStyle::Unix),
            Err(Error::InvalidPath { .. })
        ));
    }
}
