//! Headless commands for scripting and checking templates
//!
//! Usage:
//!   anime-shelf sanitize <path>...          Sanitize paths
//!   anime-shelf template <template>         Render a template
//!   anime-shelf folder <title>              Show folder for a title
//!   anime-shelf plan <source-file>          Plan a file's library path
//!   anime-shelf parse <name>...             Read release names
//!   anime-shelf season <text>               Detect a season number
//!
//! Options:
//!   --json             Output in JSON format
//!   --config <path>    Use this config file instead of the default one

use std::path::{Path, PathBuf};

use anime_shelf_core::{
    apply_template, build_folder_path, extract_season, parse_release_name, plan_target,
    resolve_conflict, sanitize_path_with, ConflictStrategy, OrganizeRequest, OrganizerConfig,
    PathStyle, TemplateContext,
};

/// CLI command to execute
#[derive(Debug, Clone)]
pub enum CliCommand {
    Sanitize {
        paths: Vec<String>,
        style: PathStyle,
    },
    Template {
        template: String,
        context: TemplateContext,
    },
    Folder {
        title: String,
        season: u32,
        year: Option<u32>,
    },
    Plan {
        request: OrganizeRequest,
        on_conflict: Option<ConflictStrategy>,
    },
    Parse {
        names: Vec<String>,
    },
    Season {
        text: String,
    },
}

/// CLI options
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub json: bool,
    pub config: Option<PathBuf>,
}

/// Flag values collected while scanning the arguments
#[derive(Debug, Default)]
struct Flags {
    style: Option<PathStyle>,
    season: Option<u32>,
    title: Option<String>,
    year: Option<u32>,
    episode: Option<u32>,
    group: Option<String>,
    on_conflict: Option<ConflictStrategy>,
}

/// Parse CLI arguments and return command + options
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut flags = Flags::default();
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--json" => options.json = true,
            "--config" | "--style" | "--season" | "--title" | "--year" | "--episode"
            | "--group" | "--on-conflict" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires a value", arg))?;
                match arg {
                    "--config" => options.config = Some(PathBuf::from(value)),
                    "--style" => flags.style = Some(parse_style(value)?),
                    "--season" => flags.season = Some(parse_number(arg, value)?),
                    "--title" => flags.title = Some(value.clone()),
                    "--year" => flags.year = Some(parse_number(arg, value)?),
                    "--episode" => flags.episode = Some(parse_number(arg, value)?),
                    "--on-conflict" => flags.on_conflict = Some(parse_conflict(value)?),
                    _ => flags.group = Some(value.clone()),
                }
            }
            _ if arg.starts_with("--") => return Err(format!("Unknown option: {}", arg)),
            _ => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or_else(|| {
        "No command specified. Use: sanitize, template, folder, plan, parse, or season".to_string()
    })?;
    let rest: Vec<String> = positional.collect();

    let command = match name.as_str() {
        "sanitize" => {
            if rest.is_empty() {
                return Err("sanitize requires at least one path".to_string());
            }
            CliCommand::Sanitize {
                paths: rest,
                style: flags.style.unwrap_or_default(),
            }
        }
        "template" => {
            let template = single(rest, "template requires a template string")?;
            let mut context = TemplateContext::new(flags.season.unwrap_or(1));
            context.title = flags.title;
            context.year = flags.year;
            context.episode = flags.episode;
            context.group = flags.group;
            CliCommand::Template { template, context }
        }
        "folder" => CliCommand::Folder {
            title: single(rest, "folder requires a title")?,
            season: flags.season.unwrap_or(1),
            year: flags.year,
        },
        "plan" => {
            let source = single(rest, "plan requires a source file")?;
            let parsed = parse_release_name(&source);

            let episode = flags.episode.or(parsed.episode).ok_or_else(|| {
                format!("No episode number found in '{}'; pass --episode", source)
            })?;
            let title = flags.title.unwrap_or(parsed.title);
            let season = flags
                .season
                .unwrap_or_else(|| infer_season(Path::new(&source), parsed.season));

            let mut request = OrganizeRequest::new(source, title, season, episode);
            request.year = flags.year;
            request.group = flags.group.or(parsed.group);
            CliCommand::Plan {
                request,
                on_conflict: flags.on_conflict,
            }
        }
        "parse" => {
            if rest.is_empty() {
                return Err("parse requires at least one name".to_string());
            }
            CliCommand::Parse { names: rest }
        }
        "season" => CliCommand::Season {
            text: single(rest, "season requires some text")?,
        },
        other => return Err(format!("Unknown command: {}", other)),
    };

    Ok((command, options))
}

fn single(mut values: Vec<String>, missing: &str) -> Result<String, String> {
    match values.len() {
        0 => Err(missing.to_string()),
        1 => Ok(values.remove(0)),
        _ => Err(format!("Unexpected argument: {}", values[1])),
    }
}

fn parse_style(s: &str) -> Result<PathStyle, String> {
    match s.to_lowercase().as_str() {
        "unix" | "posix" => Ok(PathStyle::Unix),
        "windows" | "win" => Ok(PathStyle::Windows),
        _ => Err(format!("Invalid style '{}'. Use: unix or windows", s)),
    }
}

fn parse_conflict(s: &str) -> Result<ConflictStrategy, String> {
    match s.to_lowercase().as_str() {
        "skip" => Ok(ConflictStrategy::Skip),
        "overwrite" => Ok(ConflictStrategy::Overwrite),
        "rename" => Ok(ConflictStrategy::Rename),
        _ => Err(format!(
            "Invalid conflict strategy '{}'. Use: skip, overwrite, or rename",
            s
        )),
    }
}

fn parse_number(flag: &str, value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid number for {}: {}", flag, value))
}

/// Season from the source's parent folder name, then the one parsed from its
/// own name, then 1
fn infer_season(source: &Path, from_name: Option<u32>) -> u32 {
    source
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|name| extract_season(&name.to_string_lossy()))
        .or(from_name)
        .unwrap_or(1)
}

/// Run CLI command
pub fn run(command: CliCommand, options: CliOptions, config: &OrganizerConfig) -> anyhow::Result<()> {
    match command {
        CliCommand::Sanitize { paths, style } => run_sanitize(&paths, style, &options),
        CliCommand::Template { template, context } => {
            run_template(&template, &context, &options);
            Ok(())
        }
        CliCommand::Folder {
            title,
            season,
            year,
        } => {
            run_folder(&title, season, year, config, &options);
            Ok(())
        }
        CliCommand::Plan {
            request,
            on_conflict,
        } => run_plan(&request, on_conflict, config, &options),
        CliCommand::Parse { names } => {
            run_parse(&names, &options);
            Ok(())
        }
        CliCommand::Season { text } => {
            run_season(&text, &options);
            Ok(())
        }
    }
}

fn run_sanitize(paths: &[String], style: PathStyle, options: &CliOptions) -> anyhow::Result<()> {
    let mut failed = 0;
    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        match sanitize_path_with(path, style) {
            Ok(sanitized) => results.push((path, Ok(sanitized))),
            Err(e) => {
                failed += 1;
                results.push((path, Err(e.to_string())));
            }
        }
    }

    if options.json {
        let items: Vec<serde_json::Value> = results
            .iter()
            .map(|(path, result)| match result {
                Ok(sanitized) => serde_json::json!({
                    "path": path,
                    "sanitized": sanitized,
                    "length": sanitized.chars().count(),
                }),
                Err(message) => serde_json::json!({
                    "path": path,
                    "error": message,
                }),
            })
            .collect();
        println!("{}", serde_json::Value::Array(items));
    } else {
        for (path, result) in &results {
            match result {
                Ok(sanitized) => {
                    println!("{}", path);
                    println!("  -> {} ({} chars)", sanitized, sanitized.chars().count());
                }
                Err(message) => println!("{}\n  error: {}", path, message),
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} paths could not be sanitized", failed, paths.len());
    }
    Ok(())
}

fn run_template(template: &str, context: &TemplateContext, options: &CliOptions) {
    let rendered = apply_template(template, context);

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "template": template,
                "context": context,
                "result": rendered,
            })
        );
    } else {
        println!("{}", rendered);
    }
}

fn run_folder(
    title: &str,
    season: u32,
    year: Option<u32>,
    config: &OrganizerConfig,
    options: &CliOptions,
) {
    let folder = build_folder_path(
        title,
        year,
        season,
        &config.folder_template,
        &config.season_folder_template,
        config.organize_by_season,
    );

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "title": title,
                "season": season,
                "year": year,
                "folder": folder,
            })
        );
    } else {
        println!("{}", folder);
    }
}

fn run_plan(
    request: &OrganizeRequest,
    on_conflict: Option<ConflictStrategy>,
    config: &OrganizerConfig,
    options: &CliOptions,
) -> anyhow::Result<()> {
    let planned = plan_target(config, request)?;

    // Only consult the filesystem when asked to
    let target = match on_conflict {
        Some(strategy) => resolve_conflict(&planned, strategy, PathStyle::native(), |path| {
            Path::new(path).exists()
        })?,
        None => Some(planned.clone()),
    };

    let Some(target) = target else {
        if options.json {
            println!(
                "{}",
                serde_json::json!({
                    "request": request,
                    "target": planned,
                    "skipped": true,
                })
            );
        } else {
            println!("Skipped, already exists: {}", planned);
        }
        return Ok(());
    };

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "request": request,
                "target": target,
                "skipped": false,
                "over_limit": anime_shelf_core::exceeds_path_limit(&target),
            })
        );
    } else {
        println!("{}", target);
        if anime_shelf_core::exceeds_path_limit(&target) {
            eprintln!(
                "Warning: target is longer than {} characters",
                anime_shelf_core::MAX_PATH_LEN
            );
        }
    }
    Ok(())
}

fn run_parse(names: &[String], options: &CliOptions) {
    let parsed: Vec<_> = names.iter().map(|name| parse_release_name(name)).collect();

    if options.json {
        let items: Vec<serde_json::Value> = names
            .iter()
            .zip(&parsed)
            .map(|(name, release)| {
                serde_json::json!({
                    "name": name,
                    "parsed": release,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(items));
        return;
    }

    for (name, release) in names.iter().zip(&parsed) {
        println!("{}", name);
        println!("  Title:      {}", release.title);
        if let Some(episode) = release.episode {
            println!("  Episode:    {}", episode);
        }
        if let Some(season) = release.season {
            println!("  Season:     {}", season);
        }
        if let Some(group) = &release.group {
            println!("  Group:      {}", group);
        }
        let tags: Vec<&str> = [
            &release.resolution,
            &release.video_codec,
            &release.audio_codec,
            &release.language,
        ]
        .into_iter()
        .filter_map(|tag| tag.as_deref())
        .collect();
        if !tags.is_empty() {
            println!("  Tags:       {}", tags.join(", "));
        }
    }
}

fn run_season(text: &str, options: &CliOptions) {
    let season = extract_season(text);

    if options.json {
        println!(
            "{}",
            serde_json::json!({
                "text": text,
                "season": season,
            })
        );
    } else {
        match season {
            Some(season) => println!("{}", season),
            None => println!("No season found (defaults to 1)"),
        }
    }
}

/// Print CLI help
pub fn print_help() {
    println!("anime-shelf v{}", env!("CARGO_PKG_VERSION"));
    println!("Plan tidy library paths for anime episodes");
    println!();
    println!("USAGE:");
    println!("    anime-shelf <command> [options]");
    println!();
    println!("COMMANDS:");
    println!("    sanitize <path>...          Sanitize paths (--style unix|windows)");
    println!("    template <template>         Render a template with the given values");
    println!("    folder <title>              Show folder for a title (uses config templates)");
    println!("    plan <source-file>          Plan where a file goes in the library");
    println!("                                (title, episode and group default to the release name)");
    println!("    parse <name>...             Show what is read from release names");
    println!("    season <text>               Detect a season number in a name");
    println!();
    println!("OPTIONS:");
    println!("    --season <n>                Season number");
    println!("    --episode <n>               Episode number");
    println!("    --title <title>             Show title");
    println!("    --year <year>               Release year");
    println!("    --group <group>             Release group");
    println!("    --style <style>             Path style for sanitize (default: platform)");
    println!("    --on-conflict <strategy>    For plan: skip, overwrite, or rename an existing target");
    println!("    --config <path>             Config file (default: user config dir)");
    println!("    --json                      Output in JSON format");
    println!();
    println!("EXAMPLES:");
    println!("    anime-shelf sanitize '/downloads/Show☆Name～ - 06.ass'");
    println!("    anime-shelf template 'S{{season:02}}' --season 2");
    println!("    anime-shelf folder 'Frieren' --year 2023 --season 2");
    println!("    anime-shelf plan '/downloads/Season 2/ep05.mkv' --title Frieren --episode 5");
    println!("    anime-shelf plan '[SubsPlease] Sousou no Frieren - 05 (1080p).mkv' --year 2023");
    println!("    anime-shelf parse '[LoliHouse] Spy x Family Season 2 - 05 [1080p].mkv'");
}
