use std::ops::{Deref, DerefMut};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Static layout of one figure.
#[derive(Clone, Debug, PartialEq)]
pub struct FigureSpec {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Inclusive module-index domain of the linear x axis.
    pub x_range: (f64, f64),
    pub size: (u32, u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Neutral guide line at a fixed module index.
    Reference,
    /// Saturation point of the series with the given palette slot.
    Saturation { series: usize },
}

/// Where a text label sits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelPos {
    /// Data coordinates (module index, access time).
    At(f64, f64),
    /// Top edge of the plot area above a module index.
    Top(f64),
}

/// Retained-mode drawing target, modelled after a "current figure".
///
/// Calls accumulate until [`save`](PlotSurface::save); [`clear`](PlotSurface::clear)
/// drops everything so the next figure starts blank.
pub trait PlotSurface {
    fn begin(&mut self, spec: FigureSpec);
    fn line_series(&mut self, label: &str, points: Vec<(f64, f64)>);
    fn vertical_marker(&mut self, x: f64, style: MarkerStyle);
    fn label(&mut self, text: &str, pos: LabelPos, style: MarkerStyle);
    fn legend(&mut self);
    fn save(&mut self, path: &Path) -> Result<(), RenderError>;
    fn clear(&mut self);
}

/// Scoped access to a surface; the figure is cleared when the guard drops.
pub struct FigureGuard<'a, S: PlotSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PlotSurface + ?Sized> FigureGuard<'a, S> {
    pub fn begin(surface: &'a mut S, spec: FigureSpec) -> Self {
        surface.begin(spec);
        Self { surface }
    }
}

impl<S: PlotSurface + ?Sized> Deref for FigureGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: PlotSurface + ?Sized> DerefMut for FigureGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: PlotSurface + ?Sized> Drop for FigureGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.clear();
    }
}
