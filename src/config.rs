use crate::chart::ChartKind;
use crate::core::saturation::SaturationParams;
use crate::core::series::Distribution;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "DataConfig::default_dir")]
    pub dir: PathBuf,
    #[serde(default = "DataConfig::default_distributions")]
    pub distributions: Vec<Distribution>,
    #[serde(default = "DataConfig::default_processor_counts")]
    pub processor_counts: Vec<u32>,
    #[serde(default = "DataConfig::default_module_count")]
    pub module_count: usize,
    /// Abort on a malformed number instead of skipping the file.
    #[serde(default = "DataConfig::default_strict_parse")]
    pub strict_parse: bool,
}

impl DataConfig {
    fn default_dir() -> PathBuf {
        PathBuf::from(".")
    }
    fn default_distributions() -> Vec<Distribution> {
        vec![Distribution::Uniform, Distribution::Normal]
    }
    fn default_processor_counts() -> Vec<u32> {
        vec![2, 4, 8, 16, 32, 64]
    }
    fn default_module_count() -> usize {
        512
    }
    fn default_strict_parse() -> bool {
        true
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
            distributions: Self::default_distributions(),
            processor_counts: Self::default_processor_counts(),
            module_count: Self::default_module_count(),
            strict_parse: Self::default_strict_parse(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaturationConfig {
    #[serde(default = "SaturationConfig::default_threshold")]
    pub threshold: f64,
    #[serde(default = "SaturationConfig::default_window")]
    pub window: usize,
}

impl SaturationConfig {
    fn default_threshold() -> f64 {
        0.01
    }
    fn default_window() -> usize {
        10
    }

    pub fn params(&self) -> SaturationParams {
        SaturationParams {
            threshold: self.threshold,
            window: self.window,
        }
    }
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            window: Self::default_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    #[serde(default = "ChartConfig::default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "ChartConfig::default_kinds")]
    pub kinds: Vec<ChartKind>,
    /// Module indices that get a neutral guide line on annotated charts.
    #[serde(default = "ChartConfig::default_reference_markers")]
    pub reference_markers: Vec<usize>,
    #[serde(default = "ChartConfig::default_width")]
    pub width: u32,
    #[serde(default = "ChartConfig::default_height")]
    pub height: u32,
}

impl ChartConfig {
    fn default_out_dir() -> PathBuf {
        PathBuf::from(".")
    }
    fn default_kinds() -> Vec<ChartKind> {
        vec![ChartKind::Plain, ChartKind::Saturation]
    }
    fn default_reference_markers() -> Vec<usize> {
        vec![64, 128, 256]
    }
    fn default_width() -> u32 {
        1000
    }
    fn default_height() -> u32 {
        600
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            out_dir: Self::default_out_dir(),
            kinds: Self::default_kinds(),
            reference_markers: Self::default_reference_markers(),
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub saturation: SaturationConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl AppConfig {
    /// Comment out every key of a pretty-printed config, keeping section headers.
    fn commented(text: &str) -> String {
        let mut out = String::new();
        let mut in_array = false;
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                out.push('\n');
            } else if !in_array && trimmed.starts_with('[') && trimmed.ends_with(']') {
                out.push_str(line);
                out.push('\n');
            } else {
                if trimmed.ends_with('[') {
                    in_array = true;
                } else if in_array && trimmed.starts_with(']') {
                    in_array = false;
                }
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        warn!(
                            "Failed to parse config {}: {err}. Using defaults.",
                            path.display()
                        );
                    }
                },
                Err(err) => {
                    warn!(
                        "Failed to read config {}: {err}. Using defaults.",
                        path.display()
                    );
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path, Self::commented(&text)) {
                    warn!(
                        "Failed to write default config to {}: {err}",
                        path.display()
                    );
                }
            }
            Err(err) => {
                warn!("Failed to serialize default config: {err}; continuing with defaults");
            }
        }
        default_cfg
    }
}
