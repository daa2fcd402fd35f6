//! FILENAME: app/src/config.rs
// PURPOSE: Command-line and environment configuration.

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use dashboard_engine::{DashboardRequest, DimensionChain, RankingMetric, DEFAULT_TOP_N};
use engine::{Dataset, Dimension, FilterSelection, Selection, TimeBucket};
use log::LevelFilter;
use std::path::PathBuf;

/// Default row limit for the detail table.
pub const DEFAULT_MAX_DETAIL_ROWS: usize = 100;

/// What the binary writes after computing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Full dashboard view as JSON
    Dashboard,
    /// Dropdown options only, as JSON
    Options,
    /// Detail rows behind the view, as JSON
    Details,
    /// Filtered records as CSV
    Csv,
    /// Filtered records as an XLSX workbook (requires --output)
    Xlsx,
}

/// How the filter dropdowns narrow each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChainMode {
    /// Region > State > City > Category > Sub-Category
    Linear,
    /// Region > State > City, and separately Category > Sub-Category
    Split,
}

impl ChainMode {
    pub fn dimension_chain(self) -> DimensionChain {
        match self {
            ChainMode::Linear => DimensionChain::cascade(),
            ChainMode::Split => DimensionChain::split(),
        }
    }
}

/// Superstore KPI dashboard: filter, aggregate and export the order table.
#[derive(Parser, Debug, Clone)]
#[command(name = "superstore-dashboard", version, about)]
pub struct Args {
    /// Order table to load (.xlsx, .xls, .xlsb, .ods or .csv)
    #[arg(long, short = 'd', env = "SUPERSTORE_DATA")]
    pub data: PathBuf,

    /// Region filter ("All" for no filter)
    #[arg(long)]
    pub region: Option<String>,

    /// State filter
    #[arg(long)]
    pub state: Option<String>,

    /// City filter
    #[arg(long)]
    pub city: Option<String>,

    /// Category filter
    #[arg(long)]
    pub category: Option<String>,

    /// Sub-Category filter
    #[arg(long = "sub-category")]
    pub sub_category: Option<String>,

    /// First order date to include (YYYY-MM-DD); defaults to the earliest in the data
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Last order date to include (YYYY-MM-DD); defaults to the latest in the data
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Trend bucket: daily, weekly or monthly
    #[arg(long, default_value = "monthly", value_parser = parse_bucket)]
    pub bucket: TimeBucket,

    /// Ranking metric: sales, quantity, profit or margin-rate
    #[arg(long, default_value = "sales", value_parser = parse_metric)]
    pub metric: RankingMetric,

    /// Number of products in the ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Dropdown chain
    #[arg(long, value_enum, default_value_t = ChainMode::Linear)]
    pub chain: ChainMode,

    /// Output mode
    #[arg(long, value_enum, default_value_t = OutputMode::Dashboard)]
    pub mode: OutputMode,

    /// Write output to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Row limit for the detail table
    #[arg(long, default_value_t = DEFAULT_MAX_DETAIL_ROWS)]
    pub max_rows: usize,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, env = "SUPERSTORE_LOG", default_value = "warn", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Also write the unified log to this file
    #[arg(long, env = "SUPERSTORE_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Filter values given on the command line, in dimension order.
    pub fn selection(&self) -> FilterSelection {
        let mut selection = FilterSelection::new();
        let given = [
            (Dimension::Region, &self.region),
            (Dimension::State, &self.state),
            (Dimension::City, &self.city),
            (Dimension::Category, &self.category),
            (Dimension::SubCategory, &self.sub_category),
        ];
        for (dimension, value) in given {
            if let Some(value) = value {
                selection.set(dimension, Selection::from_label(value));
            }
        }
        selection
    }

    /// The request to run, with unset dates taken from the dataset span.
    pub fn to_request(&self, dataset: &Dataset) -> DashboardRequest {
        let mut request = DashboardRequest::for_dataset(dataset);
        request.selection = self.selection();
        if let Some(from) = self.from {
            request.from = from;
        }
        if let Some(to) = self.to {
            request.to = to;
        }
        request.bucket = self.bucket;
        request.metric = self.metric;
        request.top_n = self.top_n;
        request
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {}", s, e))
}

pub fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level '{}'", s))
}

pub fn parse_bucket(s: &str) -> Result<TimeBucket, String> {
    TimeBucket::from_name(s).ok_or_else(|| format!("unknown time bucket '{}'", s))
}

pub fn parse_metric(s: &str) -> Result<RankingMetric, String> {
    RankingMetric::from_name(s).ok_or_else(|| format!("unknown ranking metric '{}'", s))
}
