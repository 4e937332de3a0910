//! Plot layer: the series table and the renderer it drives.
//!
//! [`PlotSeriesTableModel`](series_table::PlotSeriesTableModel) owns the
//! authoritative per-line attributes and pushes every change to a
//! [`PlotSurface`] as an explicit command.  [`EguiSurface`](egui_surface::EguiSurface)
//! is the retained surface the desktop app draws with egui_plot.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use eframe::egui::Color32;
pub use egui_plot::MarkerShape;

use crate::error::EditError;

pub mod egui_surface;
pub mod series_table;

/// Connecting-line style of a series in line mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    DashDot,
    Dotted,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::DashDot,
        LineStyle::Dotted,
    ];

    /// Short token shown in the style column.
    pub fn token(self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
            LineStyle::DashDot => "-.",
            LineStyle::Dotted => ":",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for LineStyle {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-" | "solid" => Ok(LineStyle::Solid),
            "--" | "dashed" => Ok(LineStyle::Dashed),
            "-." | "dashdot" => Ok(LineStyle::DashDot),
            ":" | "dotted" => Ok(LineStyle::Dotted),
            other => Err(EditError::UnknownStyle(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// Axis limits, `(x_min, x_max, y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Everything a surface needs to create one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: Color32,
    pub label: String,
    pub width: f32,
    pub marker_size: f32,
    /// `None` draws no connecting line.
    pub line_style: Option<LineStyle>,
    /// `None` draws no markers.
    pub marker: Option<MarkerShape>,
    pub mark_every: usize,
    /// Per-point text drawn next to each point.
    pub annotations: Option<Vec<String>>,
}

/// A plot canvas holding an ordered list of lines.
///
/// Line indices are positions in that list and match the series table rows.
pub trait PlotSurface {
    /// Append a line at the end.
    fn add_line(&mut self, line: LineSpec);
    fn remove_lines(&mut self, range: Range<usize>);
    fn line_count(&self) -> usize;

    fn set_color(&mut self, line: usize, color: Color32);
    fn set_visible(&mut self, line: usize, visible: bool);
    fn set_label(&mut self, line: usize, label: &str);
    fn set_line_style(&mut self, line: usize, style: Option<LineStyle>);
    fn set_marker(&mut self, line: usize, marker: Option<MarkerShape>);
    fn set_mark_every(&mut self, line: usize, every: usize);
    fn set_line_width(&mut self, line: usize, width: f32);
    fn set_marker_size(&mut self, line: usize, size: f32);

    fn set_grid(&mut self, on: bool);
    /// Must only be called while at least one line is visible.
    fn show_legend(&mut self, font_size: f32);
    fn remove_legend(&mut self);
    fn has_legend(&self) -> bool;
    fn set_limits(&mut self, bounds: AxisBounds);
    fn scale(&self, axis: Axis) -> AxisScale;
    fn set_font_size(&mut self, size: f32);
    /// Re-layout and redraw.
    fn refresh_layout(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_tokens() {
        for style in LineStyle::ALL {
            assert_eq!(style.token().parse::<LineStyle>(), Ok(style));
        }
        assert_eq!("dashdot".parse::<LineStyle>(), Ok(LineStyle::DashDot));
        assert_eq!("dotted".parse::<LineStyle>(), Ok(LineStyle::Dotted));
        assert!("wavy".parse::<LineStyle>().is_err());
        assert_eq!(LineStyle::Dashed.to_string(), "--");
    }
}
