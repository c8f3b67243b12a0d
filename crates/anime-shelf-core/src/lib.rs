//! # anime-shelf-core
//!
//! Core library for placing downloaded anime episodes into a tidy library.
//!
//! This crate provides:
//! - Sanitizing path components and whole paths for Windows-safe names
//! - Substituting `{placeholder}` tokens in folder and file name templates
//! - Reading title, episode, season and group from release names
//! - Season folder layout, per-file target planning and conflict renaming
//! - Persisted organizer configuration
//!
//! Everything except [`config`] loading and saving is pure string work: no
//! filesystem access, no shared state.
//!
//! ## Modules
//!
//! - [`config`] - Organizer configuration (templates, output directory)
//! - [`error`] - Error types and Result alias
//! - [`organize`] - Folder composition, target planning and name conflicts
//! - [`parse`] - Release name parsing
//! - [`sanitize`] - Component and path sanitization
//! - [`template`] - Template substitution and season detection
//!
//! ## Example
//!
//! ```
//! use anime_shelf_core::{build_folder_path, sanitize_component};
//!
//! let folder = build_folder_path(
//!     "BanG Dream! Girls Band Party!☆PICO～OHMORI～",
//!     Some(2022),
//!     2,
//!     "{title_romaji} ({year})",
//!     "S{season:02}",
//!     true,
//! );
//! assert_eq!(folder, "BanG Dream! Girls Band Party!★PICO~OHMORI~ (2022)/S02");
//!
//! assert_eq!(sanitize_component("Re：Zero"), "Re_Zero");
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod organize;
pub mod parse;
pub mod sanitize;
pub mod template;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Configuration
pub use config::{is_subtitle_extension, OrganizerConfig};

// Sanitization
pub use sanitize::{
    exceeds_path_limit, sanitize_component, sanitize_path, sanitize_path_under, sanitize_path_with,
    split_extension, PathStyle, MAX_PATH_LEN,
};

// Release names
pub use parse::{parse_release_name, ParsedRelease};

// Templates
pub use template::{apply_template, extract_season, season_or_default, Placeholder, TemplateContext};

// Layout
pub use organize::{
    build_folder_path, next_available_name, plan_target, plan_target_with, resolve_conflict,
    ConflictStrategy, OrganizeRequest,
};
