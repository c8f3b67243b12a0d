//! Folder and file name templates
//!
//! Templates are plain strings with `{placeholder}` tokens, e.g.
//! `"{title_romaji} ({year})"` or `"S{season:02}"`. Tokens are recognized
//! whole in a single left-to-right pass, so `{season}` can never eat into
//! `{season:02}`.

mod season;

pub use season::{extract_season, season_or_default};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)(?::([0-9]+))?\}").unwrap());

/// Values available to a template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    /// Season number (1-based)
    pub season: u32,
    /// Title, used for both `{title}` and `{title_romaji}`
    pub title: Option<String>,
    /// Release year
    pub year: Option<u32>,
    /// Episode number
    pub episode: Option<u32>,
    /// Release group
    pub group: Option<String>,
    /// File extension without the leading dot
    pub ext: Option<String>,
}

impl TemplateContext {
    pub fn new(season: u32) -> Self {
        Self {
            season,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_episode(mut self, episode: u32) -> Self {
        self.episode = Some(episode);
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Set the extension; a leading dot is dropped
    pub fn with_ext(mut self, ext: impl AsRef<str>) -> Self {
        self.ext = Some(ext.as_ref().trim_start_matches('.').to_string());
        self
    }
}

/// A recognized template token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{season}`, `{season:02}`, `{season:03}`; the value is the pad width
    Season(usize),
    /// `{title}`
    Title,
    /// `{title_romaji}`
    TitleRomaji,
    /// `{year}`
    Year,
    /// `{episode}`, `{episode:02}`, `{episode:03}`
    Episode(usize),
    /// `{group}`
    Group,
    /// `{ext}`
    Ext,
}

impl Placeholder {
    /// Recognize a token from its name and optional format suffix
    pub fn parse(name: &str, format: Option<&str>) -> Option<Self> {
        let placeholder = match (name, format) {
            ("season", None) => Placeholder::Season(0),
            ("season", Some("02")) => Placeholder::Season(2),
            ("season", Some("03")) => Placeholder::Season(3),
            // A bare `{episode}` is padded like `{episode:02}`
            ("episode", None | Some("02")) => Placeholder::Episode(2),
            ("episode", Some("03")) => Placeholder::Episode(3),
            ("title", None) => Placeholder::Title,
            ("title_romaji", None) => Placeholder::TitleRomaji,
            ("year", None) => Placeholder::Year,
            ("group", None) => Placeholder::Group,
            ("ext", None) => Placeholder::Ext,
            _ => return None,
        };
        Some(placeholder)
    }

    /// Value for this token, if the context has one
    pub fn render(self, ctx: &TemplateContext) -> Option<String> {
        match self {
            Placeholder::Season(width) => Some(format!("{:0width$}", ctx.season)),
            Placeholder::Episode(width) => ctx.episode.map(|e| format!("{e:0width$}")),
            Placeholder::Title | Placeholder::TitleRomaji => ctx.title.clone(),
            Placeholder::Year => ctx.year.map(|y| y.to_string()),
            Placeholder::Group => ctx.group.clone(),
            Placeholder::Ext => ctx.ext.clone(),
        }
    }
}

/// Substitute every recognized placeholder in `template`.
///
/// Unknown tokens, and known tokens whose value is missing from `ctx`, are
/// left in the output as written.
///
/// # Examples
///
/// ```
/// use anime_shelf_core::{apply_template, TemplateContext};
///
/// let ctx = TemplateContext::new(1);
/// assert_eq!(apply_template("S{season:02}", &ctx), "S01");
/// assert_eq!(apply_template("第{season}季", &ctx), "第1季");
/// assert_eq!(apply_template("{season}st Season", &ctx), "1st Season");
///
/// let ctx = TemplateContext::new(2).with_title("Title").with_year(2022);
/// assert_eq!(apply_template("{title_romaji} ({year})", &ctx), "Title (2022)");
/// ```
pub fn apply_template(template: &str, ctx: &TemplateContext) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures| {
            Placeholder::parse(&caps[1], caps.get(2).map(|m| m.as_str()))
                .and_then(|p| p.render(ctx))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
