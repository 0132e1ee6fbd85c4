//! Chart composition: one figure per distribution and chart kind.

pub mod bitmap;
pub mod surface;

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::core::saturation::{
    SaturationError, SaturationParams, find_saturation_point, validate_positive,
};
use crate::core::series::{Distribution, SeriesError, SeriesLoader, file_label};
use surface::{FigureGuard, FigureSpec, LabelPos, MarkerStyle, PlotSurface, RenderError};

pub const X_DESC: &str = "Memory Modules";
pub const Y_DESC: &str = "Avg Access Time Tc(S)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Curves only.
    Plain,
    /// Curves plus reference guides and saturation markers.
    Saturation,
}

impl ChartKind {
    pub fn file_name(self, distribution: Distribution) -> String {
        match self {
            Self::Plain => format!("{}_chart.png", distribution.label()),
            Self::Saturation => format!("{}_chart_saturation.png", distribution.label()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error("{distribution} {processors} procs: {source}")]
    Samples {
        distribution: Distribution,
        processors: u32,
        #[source]
        source: SaturationError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("cannot create output directory {}: {source}", dir.display())]
    OutputDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub struct ChartComposer {
    loader: SeriesLoader,
    processor_counts: Vec<u32>,
    reference_markers: Vec<usize>,
    saturation: SaturationParams,
    out_dir: PathBuf,
    size: (u32, u32),
}

impl ChartComposer {
    pub fn new(config: &AppConfig) -> Self {
        let loader = SeriesLoader::new(&config.data.dir, config.data.module_count)
            .with_strict_parse(config.data.strict_parse);
        Self {
            loader,
            processor_counts: config.data.processor_counts.clone(),
            reference_markers: config.chart.reference_markers.clone(),
            saturation: config.saturation.params(),
            out_dir: config.chart.out_dir.clone(),
            size: (config.chart.width, config.chart.height),
        }
    }

    pub fn output_path(&self, distribution: Distribution, kind: ChartKind) -> PathBuf {
        self.out_dir.join(kind.file_name(distribution))
    }

    fn figure_spec(&self, distribution: Distribution) -> FigureSpec {
        FigureSpec {
            title: distribution.title(),
            x_desc: X_DESC.to_string(),
            y_desc: Y_DESC.to_string(),
            x_range: (1.0, self.loader.module_count() as f64),
            size: self.size,
        }
    }

    /// Render and save one chart. Returns the saved path, or `None` when no
    /// series for `distribution` could be loaded.
    pub fn compose<S: PlotSurface + ?Sized>(
        &self,
        surface: &mut S,
        distribution: Distribution,
        kind: ChartKind,
    ) -> Result<Option<PathBuf>, ChartError> {
        let mut figure = FigureGuard::begin(surface, self.figure_spec(distribution));

        let mut plotted = 0usize;
        for &procs in &self.processor_counts {
            let Some(series) = self.loader.load(distribution, procs)? else {
                continue;
            };
            let invalid = |source| ChartError::Samples {
                distribution,
                processors: procs,
                source,
            };
            // The y axis is logarithmic whatever the kind.
            validate_positive(&series.values).map_err(invalid)?;
            figure.line_series(&format!("{procs} procs"), series.points());
            let slot = plotted;
            plotted += 1;

            if kind != ChartKind::Saturation {
                continue;
            }
            let point =
                find_saturation_point(&series.values, &self.saturation).map_err(invalid)?;
            match point.and_then(|m| series.value_at_module(m).map(|v| (m, v))) {
                Some((module, value)) => {
                    debug!(%distribution, procs, module, "saturation point");
                    let style = MarkerStyle::Saturation { series: slot };
                    figure.vertical_marker(module as f64, style);
                    figure.label(
                        &format!("sat {procs}p @ {module}"),
                        LabelPos::At(module as f64, value),
                        style,
                    );
                }
                None => debug!(%distribution, procs, "no saturation point"),
            }
        }

        if plotted == 0 {
            warn!("No series found for {distribution}; skipping {}", kind.file_name(distribution));
            return Ok(None);
        }

        if kind == ChartKind::Saturation {
            for &module in &self.reference_markers {
                let x = module as f64;
                figure.vertical_marker(x, MarkerStyle::Reference);
                figure.label(&module.to_string(), LabelPos::Top(x), MarkerStyle::Reference);
            }
        }
        figure.legend();

        fs::create_dir_all(&self.out_dir).map_err(|source| ChartError::OutputDir {
            dir: self.out_dir.clone(),
            source,
        })?;
        let path = self.output_path(distribution, kind);
        figure.save(&path)?;
        info!("Saved: {}", file_label(&path));
        Ok(Some(path))
    }

    /// Every distribution × kind, in order, one figure at a time.
    pub fn compose_all<S: PlotSurface + ?Sized>(
        &self,
        surface: &mut S,
        distributions: &[Distribution],
        kinds: &[ChartKind],
    ) -> Result<Vec<PathBuf>, ChartError> {
        let mut saved = Vec::new();
        for &distribution in distributions {
            for &kind in kinds {
                if let Some(path) = self.compose(surface, distribution, kind)? {
                    saved.push(path);
                }
            }
        }
        Ok(saved)
    }
}
