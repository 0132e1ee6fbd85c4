//! PNG rendering of a buffered figure through `plotters`.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use super::surface::{FigureSpec, LabelPos, MarkerStyle, PlotSurface, RenderError};

const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(23, 190, 207),
];

fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

fn marker_color(style: MarkerStyle) -> RGBAColor {
    match style {
        MarkerStyle::Reference => BLACK.mix(0.45),
        MarkerStyle::Saturation { series } => series_color(series).to_rgba(),
    }
}

/// Collects drawing calls and rasterizes them on `save`.
#[derive(Default)]
pub struct BitmapSurface {
    spec: Option<FigureSpec>,
    lines: Vec<(String, Vec<(f64, f64)>)>,
    markers: Vec<(f64, MarkerStyle)>,
    labels: Vec<(String, LabelPos, MarkerStyle)>,
    legend: bool,
}

impl BitmapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log-axis bounds padded around every plotted value.
    fn y_bounds(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (_, points) in &self.lines {
            for &(_, y) in points {
                if y.is_finite() && y > 0.0 {
                    lo = lo.min(y);
                    hi = hi.max(y);
                }
            }
        }
        if !lo.is_finite() || !hi.is_finite() {
            return (1.0, 10.0);
        }
        (lo * 0.9, hi * 1.1)
    }

    fn render(&self, path: &Path, spec: &FigureSpec) -> Result<(), Box<dyn Error>> {
        let (y_lo, y_hi) = self.y_bounds();
        let (x_lo, x_hi) = spec.x_range;

        let root = BitMapBackend::new(path, spec.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title.as_str(), ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, (y_lo..y_hi).log_scale())?;

        chart
            .configure_mesh()
            .x_desc(spec.x_desc.as_str())
            .y_desc(spec.y_desc.as_str())
            .bold_line_style(BLACK.mix(0.2))
            .light_line_style(BLACK.mix(0.06))
            .x_label_formatter(&|v| format!("{v:.0}"))
            .y_label_formatter(&|v| format!("{v:.2}"))
            .draw()?;

        for &(x, style) in &self.markers {
            let color = marker_color(style);
            match style {
                MarkerStyle::Reference => {
                    chart.draw_series(std::iter::once(PathElement::new(
                        vec![(x, y_lo), (x, y_hi)],
                        color.stroke_width(1),
                    )))?;
                }
                MarkerStyle::Saturation { .. } => {
                    chart.draw_series(DashedLineSeries::new(
                        vec![(x, y_lo), (x, y_hi)],
                        6,
                        4,
                        color.stroke_width(2),
                    ))?;
                }
            }
        }

        for (idx, (label, points)) in self.lines.iter().enumerate() {
            let color = series_color(idx);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        for (text, pos, style) in &self.labels {
            let at = match *pos {
                LabelPos::At(x, y) => (x, y),
                // Slightly below the top edge so the text stays inside the plot.
                LabelPos::Top(x) => (x, y_hi / (y_hi / y_lo).powf(0.03)),
            };
            let font = ("sans-serif", 14).into_font().color(&marker_color(*style));
            chart.draw_series(std::iter::once(Text::new(text.clone(), at, font)))?;
        }

        if self.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        Ok(())
    }
}

impl PlotSurface for BitmapSurface {
    fn begin(&mut self, spec: FigureSpec) {
        self.spec = Some(spec);
    }

    fn line_series(&mut self, label: &str, points: Vec<(f64, f64)>) {
        self.lines.push((label.to_string(), points));
    }

    fn vertical_marker(&mut self, x: f64, style: MarkerStyle) {
        self.markers.push((x, style));
    }

    fn label(&mut self, text: &str, pos: LabelPos, style: MarkerStyle) {
        self.labels.push((text.to_string(), pos, style));
    }

    fn legend(&mut self) {
        self.legend = true;
    }

    fn save(&mut self, path: &Path) -> Result<(), RenderError> {
        let spec = self
            .spec
            .as_ref()
            .ok_or_else(|| RenderError::new("save called before begin"))?;
        self.render(path, spec)
            .map_err(|err| RenderError::new(format!("{}: {err}", path.display())))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
