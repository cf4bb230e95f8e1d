//! Search command implementation

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::downloader::{Pipeline, PipelineConfig, PipelineOutcome, ProgressReporter, Stage};
use crate::fetcher::board_config::BOARD_ORIGIN;
use crate::query::{QuerySpec, SortDirection, SortMode, DIRECTION_PARAM, PAGE_PARAM, SORT_PARAM};
use crate::summary::ListingSummary;

use super::CliError;

/// Most area codes the board accepts in one query
pub const MAX_AREA_CODES: usize = 10;

/// Most industry codes the board accepts in one query
pub const MAX_INDUSTRY_CODES: usize = 5;

/// Query keys owned by the sort options and the pager
const RESERVED_FILTER_KEYS: [&str; 3] = [SORT_PARAM, DIRECTION_PARAM, PAGE_PARAM];

/// Parse and validate the result cap
fn parse_max_results(s: &str) -> Result<NonZeroU32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    NonZeroU32::new(value).ok_or_else(|| "max results must be at least 1".to_string())
}

/// Parse a `key=value` filter
fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid filter: {s}. Expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Invalid filter: {s}. Key must not be empty"));
    }
    if RESERVED_FILTER_KEYS.contains(&key) {
        return Err(format!(
            "Invalid filter: {s}. '{key}' is set by the downloader; use --sort and --ascending to order results"
        ));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// Keep at most `max` codes, warning when some are dropped
fn clamp_codes<'a>(kind: &str, codes: &'a [String], max: usize) -> &'a [String] {
    if codes.len() > max {
        warn!(
            "{} {} codes given, only the first {} are used",
            codes.len(),
            kind,
            max
        );
        &codes[..max]
    } else {
        codes
    }
}

/// Job Listing Downloader CLI
#[derive(Parser, Debug)]
#[command(name = "job-listing-downloader")]
#[command(about = "Fetch job listings and their details from a job board search", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Serve Prometheus metrics on this address (e.g. 127.0.0.1:9000)
    #[arg(long, global = true)]
    pub metrics_addr: Option<SocketAddr>,

    /// Disable progress bars
    #[arg(long, global = true, default_value_t = false)]
    pub no_progress: bool,
}

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search listings and fetch every listing's details
    Search(SearchArgs),
}

/// Search command arguments
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search keyword; leave empty to search by filters only
    #[arg(long, default_value = "")]
    pub keyword: String,

    /// Maximum number of listings to collect
    #[arg(long, default_value = "100", value_parser = parse_max_results)]
    pub max_results: NonZeroU32,

    /// Sort mode: relevance, experience, education, applicants, salary, or date
    #[arg(long, default_value = "relevance")]
    pub sort: SortMode,

    /// Sort ascending instead of descending
    #[arg(long, default_value_t = false)]
    pub ascending: bool,

    /// Extra query parameter (repeatable), e.g. --filter ro=0
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Area code (repeatable, at most 10 used)
    #[arg(long = "area")]
    pub areas: Vec<String>,

    /// Industry category code (repeatable, at most 5 used)
    #[arg(long = "industry")]
    pub industries: Vec<String>,

    /// Print records and errors as one JSON object instead of the summary
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Board origin
    #[arg(long, default_value = BOARD_ORIGIN)]
    pub origin: String,
}

impl SearchArgs {
    /// Build the query from the command line
    pub fn query_spec(&self) -> QuerySpec {
        let direction = if self.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };

        let mut spec = QuerySpec::new(self.keyword.clone(), self.max_results)
            .with_sort(self.sort, direction);
        for (key, value) in &self.filters {
            spec = spec.with_filter(key.clone(), value.clone());
        }

        let areas = clamp_codes("area", &self.areas, MAX_AREA_CODES);
        if !areas.is_empty() {
            spec = spec.with_filter("area", areas.join(","));
        }
        let industries = clamp_codes("industry", &self.industries, MAX_INDUSTRY_CODES);
        if !industries.is_empty() {
            spec = spec.with_filter("indcat", industries.join(","));
        }
        spec
    }

    /// Execute the search
    pub async fn execute(&self, cli: &Cli) -> Result<(), CliError> {
        if let Some(addr) = cli.metrics_addr {
            crate::metrics::init_metrics(addr)
                .await
                .map_err(|e| CliError::ConfigurationError(e.to_string()))?;
        }

        let spec = self.query_spec();
        info!(
            keyword = spec.keyword(),
            max_results = spec.max_results(),
            sort = %spec.sort_mode(),
            "Starting search"
        );

        let mut pipeline = Pipeline::with_config(PipelineConfig::for_origin(&self.origin));
        if !cli.no_progress {
            pipeline = pipeline.with_progress(Arc::new(BarProgress::default()));
        }
        let outcome = pipeline.run(spec).await?;

        if self.json {
            println!("{}", render_json(&outcome)?);
        } else {
            print!("{}", ListingSummary::from_records(&outcome.list_records));
            println!();
            println!(
                "Details: {}  Failed requests: {}  Board total: {}",
                outcome.detail_records.len(),
                outcome.errors.len(),
                outcome.total_count
            );
            for failure in &outcome.errors {
                println!("  {failure}");
            }
        }
        Ok(())
    }
}

/// Render a run as `{ "list": [...], "details": [...], "errors": [...] }`
pub fn render_json(outcome: &PipelineOutcome) -> Result<String, CliError> {
    let document = serde_json::json!({
        "list": outcome.list_records,
        "details": outcome.detail_records,
        "errors": outcome.errors,
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

// ─── Progress bar ────────────────────────────────────────────────────────────

/// Progress bar per stage, drawn on stderr
#[derive(Default)]
struct BarProgress {
    bar: Mutex<Option<ProgressBar>>,
}

fn create_progress_bar(stage: Stage, total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(format!("{} {}", stage.label(), stage.unit()));
    pb
}

impl ProgressReporter for BarProgress {
    fn stage_started(&self, stage: Stage, total: u64) {
        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(create_progress_bar(stage, total));
        }
    }

    fn item_finished(&self, _stage: Stage) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(pb) = slot.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn stage_finished(&self, _stage: Stage) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_and_clear();
            }
        }
    }
}
