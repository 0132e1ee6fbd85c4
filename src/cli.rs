use std::path::PathBuf;

use clap::Parser;

use crate::chart::ChartKind;
use crate::config::AppConfig;
use crate::core::series::Distribution;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to config TOML (written with defaults if missing)
    #[arg(long, default_value = "memsat.toml")]
    pub config: PathBuf,

    /// Directory holding {label}_{count}.csv files (overrides config)
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory charts are written to (overrides config)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Distribution to chart; repeat for several (overrides config)
    #[arg(long = "distribution", value_enum)]
    pub distributions: Vec<Distribution>,

    /// Chart kind to render; repeat for several (overrides config)
    #[arg(long = "kind", value_enum)]
    pub kinds: Vec<ChartKind>,

    /// Skip files with malformed numbers instead of aborting
    #[arg(long, default_value_t = false)]
    pub lenient: bool,
}

impl Args {
    /// Fold command-line overrides into a loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data.dir = dir.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.chart.out_dir = dir.clone();
        }
        if !self.distributions.is_empty() {
            config.data.distributions = self.distributions.clone();
        }
        if !self.kinds.is_empty() {
            config.chart.kinds = self.kinds.clone();
        }
        if self.lenient {
            config.data.strict_parse = false;
        }
    }
}
