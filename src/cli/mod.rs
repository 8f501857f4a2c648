//! Top-level CLI parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use crate::config::Settings;
use crate::entities::paper::{self, Catalog};
use crate::view::{CatalogStats, CatalogView, ViewState, group_by_year};

pub mod explore;

#[derive(Parser, Debug)]
#[command(
    name = "papershelf",
    about = "Browse and search a static catalog of research papers and their artifacts",
    version,
    after_help = "Catalog location: --data, then PAPERSHELF_DATA, then PAPERSHELF_BASE_URL + papers.json, then ./papers.json"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog URL or file path (overrides PAPERSHELF_DATA)
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// Output as JSON instead of Markdown
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List publication years, optionally with one year expanded
    #[command(after_help = "\
EXAMPLES:
  papershelf browse
  papershelf browse --year 2021")]
    Browse {
        /// Year to expand
        #[arg(long)]
        year: Option<i32>,
    },
    /// Search titles and authors (case-insensitive substring)
    #[command(after_help = "\
EXAMPLES:
  papershelf search smith
  papershelf search \"graph neural\"")]
    Search {
        /// Free text query
        query: String,
    },
    /// Render the catalog as a static HTML page
    Build {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Pre-filled search query
        #[arg(short, long)]
        query: Option<String>,
        /// Year expanded when the page opens
        #[arg(long)]
        year: Option<i32>,
    },
    /// Summarize the loaded catalog
    Stats,
    /// Interactive session: toggle years and search from stdin
    Explore,
    /// Show version
    Version,
}

/// `papershelf <version>`, followed by whatever build stamps are available.
fn version_output() -> String {
    let release = option_env!("PAPERSHELF_RELEASE_TAG")
        .and_then(|tag| tag.strip_prefix('v'))
        .unwrap_or(env!("CARGO_PKG_VERSION"));
    let stamps: Vec<String> = [
        option_env!("PAPERSHELF_GIT_SHA").map(|sha| format!("git {sha}")),
        build_date(option_env!("PAPERSHELF_BUILD_EPOCH")).map(|date| format!("built {date}")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if stamps.is_empty() {
        format!("papershelf {release}")
    } else {
        format!("papershelf {release} ({})", stamps.join(", "))
    }
}

fn build_date(epoch: Option<&str>) -> Option<Date> {
    let seconds = epoch?.trim().parse::<i64>().ok()?;
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .map(OffsetDateTime::date)
}

fn browse_state(year: Option<i32>) -> ViewState {
    let mut state = ViewState::default();
    if let Some(year) = year {
        state.toggle_year(year);
    }
    state
}

fn warn_if_year_missing(catalog: &Catalog, year: Option<i32>) {
    let Some(year) = year else {
        return;
    };
    if group_by_year(catalog.papers()).get(year).is_none() {
        warn!(year, "No papers listed for requested year");
    }
}

/// Renders one view state in the requested output format.
pub(crate) fn render_view(
    catalog: &Catalog,
    state: &ViewState,
    settings: &Settings,
    json: bool,
) -> Result<String, crate::error::PaperShelfError> {
    if json {
        let view = CatalogView::derive(catalog.papers(), state);
        crate::render::json::to_pretty(&view)
    } else {
        crate::render::markdown::catalog_markdown(catalog.papers(), state, &settings.page_title)
    }
}

/// Executes one parsed CLI command and returns rendered output.
///
/// # Errors
///
/// Returns an error if rendering fails or the output file cannot be written.
/// Catalog load failures are logged and produce an empty view instead.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    if let Commands::Version = cli.command {
        return Ok(version_output());
    }

    let settings = Settings::resolve(cli.data.as_deref());
    debug!(source = %settings.data_source, "Resolved catalog source");
    let catalog = paper::load(&settings.data_source).await;

    match cli.command {
        Commands::Browse { year } => {
            warn_if_year_missing(&catalog, year);
            Ok(render_view(&catalog, &browse_state(year), &settings, cli.json)?)
        }
        Commands::Search { query } => {
            let mut state = ViewState::default();
            state.set_query(query);
            Ok(render_view(&catalog, &state, &settings, cli.json)?)
        }
        Commands::Build { out, query, year } => {
            warn_if_year_missing(&catalog, year);
            let mut state = browse_state(year);
            if let Some(query) = query {
                state.set_query(query);
            }
            let page = crate::render::html::page_html(
                catalog.papers(),
                &state,
                &crate::render::html::PageOptions {
                    title: settings.page_title.clone(),
                    generated_at: crate::render::html::timestamp_now(),
                },
            )?;
            match out {
                Some(path) => {
                    tokio::fs::write(&path, page).await.map_err(|err| {
                        anyhow::anyhow!("Failed to write {}: {err}", path.display())
                    })?;
                    Ok(format!("Wrote {}", path.display()))
                }
                None => Ok(page),
            }
        }
        Commands::Stats => {
            let stats = CatalogStats::collect(catalog.papers());
            if cli.json {
                Ok(crate::render::json::to_pretty(&stats)?)
            } else {
                Ok(stats.to_markdown())
            }
        }
        Commands::Explore => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let stdout = tokio::io::stdout();
            explore::run(&catalog, &settings, cli.json, stdin, stdout).await?;
            Ok(String::new())
        }
        Commands::Version => Ok(version_output()),
    }
}

/// Parses an argument vector and runs it.
///
/// # Errors
///
/// Returns an error when CLI args cannot be parsed or when command execution fails.
pub async fn execute(mut args: Vec<String>) -> anyhow::Result<String> {
    if args.is_empty() {
        args.push("papershelf".to_string());
    }
    let cli = Cli::try_parse_from(args)?;
    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands, browse_state, build_date, execute, version_output};
    use clap::Parser;

    fn temp_catalog(contents: &str) -> std::path::PathBuf {
        let suffix = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("papershelf-cli-{suffix}.json"));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const SAMPLE: &str = r#"[
        {"title": "A", "authors": "X, Y", "publication_date": "2020-01-01"},
        {"title": "B", "authors": "Z", "publication_date": "2021-06-01"}
    ]"#;

    #[test]
    fn browse_parses_year_flag() {
        let cli = Cli::try_parse_from(["papershelf", "browse", "--year", "2020"])
            .expect("browse --year should parse");
        match cli.command {
            Commands::Browse { year } => assert_eq!(year, Some(2020)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["papershelf", "search", "smith", "--json", "--data", "x.json"])
            .expect("global flags should parse");
        assert!(cli.json);
        assert_eq!(cli.data.as_deref(), Some("x.json"));
        match cli.command {
            Commands::Search { query } => assert_eq!(query, "smith"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn build_parses_output_query_and_year() {
        let cli = Cli::try_parse_from([
            "papershelf", "build", "--out", "site/index.html", "-q", "graph", "--year", "2019",
        ])
        .expect("build flags should parse");
        match cli.command {
            Commands::Build { out, query, year } => {
                assert_eq!(out.as_deref(), Some(std::path::Path::new("site/index.html")));
                assert_eq!(query.as_deref(), Some("graph"));
                assert_eq!(year, Some(2019));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn browse_state_expands_requested_year() {
        assert_eq!(browse_state(Some(2020)).expanded_year(), Some(2020));
        assert_eq!(browse_state(None).expanded_year(), None);
    }

    #[test]
    fn version_output_names_binary() {
        assert!(version_output().starts_with("papershelf "));
    }

    #[test]
    fn build_date_reads_source_date_epoch() {
        assert_eq!(
            build_date(Some("1767225600")).map(|d| d.to_string()),
            Some("2026-01-01".to_string())
        );
        assert_eq!(build_date(Some("soon")), None);
        assert_eq!(build_date(None), None);
    }

    #[tokio::test]
    async fn browse_renders_years_most_recent_first() {
        let path = temp_catalog(SAMPLE);
        let out = execute(vec![
            "papershelf".into(),
            "browse".into(),
            "--data".into(),
            path.display().to_string(),
            "--year".into(),
            "2020".into(),
        ])
        .await
        .unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(out.find("2021 (1)").unwrap() < out.find("2020 (1)").unwrap());
        assert!(out.contains("### A"));
        assert!(!out.contains("### B"));
    }

    #[tokio::test]
    async fn search_json_output_is_tagged_search() {
        let path = temp_catalog(SAMPLE);
        let out = execute(vec![
            "papershelf".into(),
            "--json".into(),
            "--data".into(),
            path.display().to_string(),
            "search".into(),
            "z".into(),
        ])
        .await
        .unwrap();
        let _ = std::fs::remove_file(&path);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["mode"], "search");
        assert_eq!(value["results"].as_array().unwrap().len(), 1);
        assert_eq!(value["results"][0]["title"], "B");
    }

    #[tokio::test]
    async fn missing_catalog_renders_empty_browse_view() {
        let out = execute(vec![
            "papershelf".into(),
            "browse".into(),
            "--data".into(),
            "/nonexistent/papershelf/papers.json".into(),
        ])
        .await
        .expect("load failures must not fail the command");
        assert!(out.contains("No papers to show."));
    }

    #[tokio::test]
    async fn build_writes_html_file() {
        let path = temp_catalog(SAMPLE);
        let out_path = path.with_extension("html");
        let message = execute(vec![
            "papershelf".into(),
            "build".into(),
            "--data".into(),
            path.display().to_string(),
            "--out".into(),
            out_path.display().to_string(),
        ])
        .await
        .unwrap();
        let html = std::fs::read_to_string(&out_path).unwrap();
        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&out_path);
        assert!(message.starts_with("Wrote "));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<summary>2021"));
    }
}
