use std::ops::Range;

use eframe::egui::Color32;

use super::{Axis, AxisBounds, AxisScale, LineSpec, LineStyle, MarkerShape, PlotSurface};

/// One line as the egui plot will draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLine {
    pub spec: LineSpec,
    pub visible: bool,
}

/// Retained plot state, drawn every frame by `ui::plot`.
#[derive(Debug, Clone)]
pub struct EguiSurface {
    lines: Vec<SurfaceLine>,
    grid: bool,
    legend_font: Option<f32>,
    font_size: f32,
    x_scale: AxisScale,
    y_scale: AxisScale,
    limits: Option<AxisBounds>,
    /// Limits not yet pushed to the egui plot.
    pending_limits: Option<AxisBounds>,
    generation: u64,
}

impl Default for EguiSurface {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            grid: false,
            legend_font: None,
            font_size: 14.0,
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            limits: None,
            pending_limits: None,
            generation: 0,
        }
    }
}

impl EguiSurface {
    pub fn lines(&self) -> &[SurfaceLine] {
        &self.lines
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    /// Legend font size, if the legend is shown.
    pub fn legend_font(&self) -> Option<f32> {
        self.legend_font
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn limits(&self) -> Option<AxisBounds> {
        self.limits
    }

    /// Limits set since the last call; the plot applies them once so the
    /// user can still pan and zoom afterwards.
    pub fn take_pending_limits(&mut self) -> Option<AxisBounds> {
        self.pending_limits.take()
    }

    /// Bumped by every `refresh_layout`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_scale(&mut self, axis: Axis, scale: AxisScale) {
        match axis {
            Axis::X => self.x_scale = scale,
            Axis::Y => self.y_scale = scale,
        }
    }

    /// Points of `line` in plot coordinates: log axes are drawn as log10,
    /// dropping non-positive values.
    pub fn plot_points(&self, line: &SurfaceLine) -> Vec<[f64; 2]> {
        let map = |v: f64, scale: AxisScale| match scale {
            AxisScale::Linear => Some(v),
            AxisScale::Log if v > 0.0 => Some(v.log10()),
            AxisScale::Log => None,
        };
        line.spec
            .x
            .iter()
            .zip(&line.spec.y)
            .filter_map(|(&x, &y)| Some([map(x, self.x_scale)?, map(y, self.y_scale)?]))
            .collect()
    }

    /// `limits` mapped the same way as [`plot_points`](Self::plot_points).
    pub fn plot_limits(&self, b: AxisBounds) -> ([f64; 2], [f64; 2]) {
        let map = |lo: f64, hi: f64, scale: AxisScale| match scale {
            AxisScale::Log if lo > 0.0 && hi > 0.0 => (lo.log10(), hi.log10()),
            _ => (lo, hi),
        };
        let (x0, x1) = map(b.x_min, b.x_max, self.x_scale);
        let (y0, y1) = map(b.y_min, b.y_max, self.y_scale);
        ([x0, y0], [x1, y1])
    }

    fn line_mut(&mut self, line: usize) -> Option<&mut SurfaceLine> {
        let found = self.lines.get_mut(line);
        if found.is_none() {
            log::warn!("Plot surface has no line {line}");
        }
        found
    }
}

impl PlotSurface for EguiSurface {
    fn add_line(&mut self, line: LineSpec) {
        self.lines.push(SurfaceLine {
            spec: line,
            visible: true,
        });
    }

    fn remove_lines(&mut self, range: Range<usize>) {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.drain(start..end);
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn set_color(&mut self, line: usize, color: Color32) {
        if let Some(l) = self.line_mut(line) {
            l.spec.color = color;
        }
    }

    fn set_visible(&mut self, line: usize, visible: bool) {
        if let Some(l) = self.line_mut(line) {
            l.visible = visible;
        }
    }

    fn set_label(&mut self, line: usize, label: &str) {
        if let Some(l) = self.line_mut(line) {
            l.spec.label = label.to_string();
        }
    }

    fn set_line_style(&mut self, line: usize, style: Option<LineStyle>) {
        if let Some(l) = self.line_mut(line) {
            l.spec.line_style = style;
        }
    }

    fn set_marker(&mut self, line: usize, marker: Option<MarkerShape>) {
        if let Some(l) = self.line_mut(line) {
            l.spec.marker = marker;
        }
    }

    fn set_mark_every(&mut self, line: usize, every: usize) {
        if let Some(l) = self.line_mut(line) {
            l.spec.mark_every = every.max(1);
        }
    }

    fn set_line_width(&mut self, line: usize, width: f32) {
        if let Some(l) = self.line_mut(line) {
            l.spec.width = width;
        }
    }

    fn set_marker_size(&mut self, line: usize, size: f32) {
        if let Some(l) = self.line_mut(line) {
            l.spec.marker_size = size;
        }
    }

    fn set_grid(&mut self, on: bool) {
        self.grid = on;
    }

    fn show_legend(&mut self, font_size: f32) {
        self.legend_font = Some(font_size);
    }

    fn remove_legend(&mut self) {
        self.legend_font = None;
    }

    fn has_legend(&self) -> bool {
        self.legend_font.is_some()
    }

    fn set_limits(&mut self, bounds: AxisBounds) {
        self.limits = Some(bounds);
        self.pending_limits = Some(bounds);
    }

    fn scale(&self, axis: Axis) -> AxisScale {
        match axis {
            Axis::X => self.x_scale,
            Axis::Y => self.y_scale,
        }
    }

    fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    fn refresh_layout(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(x: Vec<f64>, y: Vec<f64>) -> LineSpec {
        LineSpec {
            x,
            y,
            color: Color32::RED,
            label: "a".into(),
            width: 2.0,
            marker_size: 5.0,
            line_style: Some(LineStyle::Solid),
            marker: None,
            mark_every: 1,
            annotations: None,
        }
    }

    #[test]
    fn log_axes_drop_non_positive_points() {
        let mut surface = EguiSurface::default();
        surface.add_line(spec(vec![-1.0, 10.0, 100.0], vec![1.0, 10.0, 0.0]));
        surface.set_scale(Axis::X, AxisScale::Log);
        let line = surface.lines()[0].clone();
        assert_eq!(surface.plot_points(&line), vec![[1.0, 10.0], [2.0, 0.0]]);
        surface.set_scale(Axis::Y, AxisScale::Log);
        assert_eq!(surface.plot_points(&line), vec![[1.0, 1.0]]);
    }

    #[test]
    fn pending_limits_are_taken_once() {
        let mut surface = EguiSurface::default();
        let b = AxisBounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 2.0,
            y_max: 3.0,
        };
        surface.set_limits(b);
        assert_eq!(surface.take_pending_limits(), Some(b));
        assert_eq!(surface.take_pending_limits(), None);
        assert_eq!(surface.limits(), Some(b));
    }

    #[test]
    fn out_of_range_commands_are_ignored() {
        let mut surface = EguiSurface::default();
        surface.set_color(3, Color32::BLUE);
        surface.remove_lines(2..5);
        assert_eq!(surface.line_count(), 0);
    }
}
