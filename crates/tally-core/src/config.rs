//! Analysis configuration
//!
//! Controls cleaning fill values, accepted date formats and chart layout.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/tally/config/analysis.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Options for the cleaning stage
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningOptions {
    /// Value written into missing `Subcategory` cells
    pub subcategory_fill: String,
    /// Value written into missing `Note` cells
    pub note_fill: String,
    /// chrono format strings, tried in order
    pub date_formats: Vec<String>,
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            subcategory_fill: "Unknown".to_string(),
            note_fill: "No Note".to_string(),
            date_formats: [
                "%d/%m/%Y %H:%M:%S",
                "%d/%m/%Y %H:%M",
                "%d/%m/%Y",
                "%Y-%m-%d %H:%M:%S",
                "%Y-%m-%dT%H:%M:%S",
                "%Y-%m-%d",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Chart layout and selection options
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    /// Number of points sampled on the KDE overlay
    pub kde_points: usize,
    /// How many categories the category count chart shows
    pub top_categories: usize,
    /// How many categories get a box plot
    pub box_plot_categories: usize,
    /// Unit shown on amount axes, e.g. "Amount (INR)"
    pub currency_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            histogram_bins: 50,
            kde_points: 200,
            top_categories: 10,
            box_plot_categories: 5,
            currency_label: "INR".to_string(),
        }
    }
}

impl ChartOptions {
    /// Axis label for amounts
    pub fn amount_label(&self) -> String {
        format!("Amount ({})", self.currency_label)
    }
}

/// Full analysis configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub cleaning: CleaningOptions,
    pub charts: ChartOptions,
    /// Default directory for rendered charts
    pub chart_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cleaning: CleaningOptions::default(),
            charts: ChartOptions::default(),
            chart_dir: PathBuf::from("charts"),
        }
    }
}

impl AnalysisConfig {
    /// Load from the user override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if the file does not exist)
    pub fn from_path(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document, merging it onto the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("analysis.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalysisConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            debug!("Loading analysis config from {}", path.display());
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    cleaning: Option<RawCleaning>,
    charts: Option<RawCharts>,
    output: Option<RawOutput>,
}

#[derive(Debug, Deserialize)]
struct RawCleaning {
    subcategory_fill: Option<String>,
    note_fill: Option<String>,
    date_formats: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawCharts {
    width: Option<u32>,
    height: Option<u32>,
    histogram_bins: Option<usize>,
    kde_points: Option<usize>,
    top_categories: Option<usize>,
    box_plot_categories: Option<usize>,
    currency_label: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    chart_dir: Option<PathBuf>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalysisConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalysisConfig::default();

    if let Some(cleaning) = raw.cleaning {
        if let Some(fill) = cleaning.subcategory_fill {
            config.cleaning.subcategory_fill = fill;
        }
        if let Some(fill) = cleaning.note_fill {
            config.cleaning.note_fill = fill;
        }
        if let Some(formats) = cleaning.date_formats {
            if formats.is_empty() {
                return Err(Error::Config(
                    "cleaning.date_formats must list at least one format".into(),
                ));
            }
            config.cleaning.date_formats = formats;
        }
    }

    if let Some(charts) = raw.charts {
        if let Some(width) = charts.width {
            config.charts.width = width;
        }
        if let Some(height) = charts.height {
            config.charts.height = height;
        }
        if let Some(bins) = charts.histogram_bins {
            config.charts.histogram_bins = bins;
        }
        if let Some(points) = charts.kde_points {
            config.charts.kde_points = points;
        }
        if let Some(top) = charts.top_categories {
            config.charts.top_categories = top;
        }
        if let Some(top) = charts.box_plot_categories {
            config.charts.box_plot_categories = top;
        }
        if let Some(label) = charts.currency_label {
            config.charts.currency_label = label;
        }
    }

    if let Some(output) = raw.output {
        if let Some(dir) = output.chart_dir {
            config.chart_dir = dir;
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnalysisConfig) -> Result<()> {
    let charts = &config.charts;
    if charts.width == 0 || charts.height == 0 {
        return Err(Error::Config("chart width and height must be positive".into()));
    }
    if charts.histogram_bins == 0 {
        return Err(Error::Config("charts.histogram_bins must be positive".into()));
    }
    if charts.top_categories == 0 || charts.box_plot_categories == 0 {
        return Err(Error::Config(
            "charts.top_categories and charts.box_plot_categories must be positive".into(),
        ));
    }
    Ok(())
}
