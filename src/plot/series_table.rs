use eframe::egui::Color32;

use crate::color::{self, PaletteCursor};
use crate::config::PlotStyle;
use crate::data::model::AxisEntry;
use crate::data::substitute::{Scope, Substitution};
use crate::error::EditError;
use crate::events::ModelNotifier;
use crate::notify::{Notifier, UserChoice};

use super::{Axis, AxisBounds, AxisScale, LineSpec, LineStyle, MarkerShape, PlotSurface};

pub const COLUMN_COUNT: usize = 3;

pub const HEADER_TOOLTIP: &str = "Double click fields to edit.\n\
    Use :s/find/replace/ to replace in this row, or :s/find/replace/g to replace in all rows.";

/// Prefix that keeps a hidden line's label out of the legend.
const HIDDEN_PREFIX: char = '_';

/// Spacing of the synthetic x axis used for text x values.
const SYNTHETIC_STEP: f64 = 10.0;

// ---------------------------------------------------------------------------
// Series records
// ---------------------------------------------------------------------------

/// Tri-state of the visibility check box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Hidden,
    /// Connecting line, no markers.
    Line,
    /// Circular markers, no connecting line.
    Scatter,
}

impl CheckState {
    /// Hidden → Line → Scatter → Hidden.
    pub fn cycle(self) -> Self {
        match self {
            CheckState::Hidden => CheckState::Line,
            CheckState::Line => CheckState::Scatter,
            CheckState::Scatter => CheckState::Hidden,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Line,
    Scatter,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Color32,
    pub line_style: LineStyle,
    /// Kept while hidden so re-showing restores it.
    pub draw: DrawMode,
    pub visible: bool,
    /// Original x values when they were text and a synthetic axis is used.
    pub annotation: Option<Vec<String>>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Series {
    pub fn check_state(&self) -> CheckState {
        match (self.visible, self.draw) {
            (false, _) => CheckState::Hidden,
            (true, DrawMode::Line) => CheckState::Line,
            (true, DrawMode::Scatter) => CheckState::Scatter,
        }
    }

    /// Label handed to the renderer; hidden series are prefixed.
    pub fn label(&self) -> String {
        if self.visible {
            self.name.clone()
        } else {
            format!("{HIDDEN_PREFIX}{}", self.name)
        }
    }
}

/// An edit to one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellEdit {
    /// Column 0 check box.
    Check(CheckState),
    /// Name, colour or style text, depending on the column.
    Text(String),
}

/// An x value as handed over by the caller: a number, or text that may
/// or may not parse as one.
pub trait XValue {
    fn as_number(&self) -> Option<f64>;
    fn as_text(&self) -> String;
}

impl XValue for f64 {
    fn as_number(&self) -> Option<f64> {
        Some(*self)
    }
    fn as_text(&self) -> String {
        self.to_string()
    }
}

impl XValue for String {
    fn as_number(&self) -> Option<f64> {
        self.as_str().as_number()
    }
    fn as_text(&self) -> String {
        self.clone()
    }
}

impl XValue for &str {
    fn as_number(&self) -> Option<f64> {
        self.trim().parse().ok()
    }
    fn as_text(&self) -> String {
        self.to_string()
    }
}

impl XValue for AxisEntry {
    fn as_number(&self) -> Option<f64> {
        AxisEntry::as_number(self)
    }
    fn as_text(&self) -> String {
        self.to_string()
    }
}

// ---------------------------------------------------------------------------
// The table model
// ---------------------------------------------------------------------------

/// Three-column table (name, colour, style) bound row-for-row to the lines
/// of a [`PlotSurface`].
///
/// The series records here are authoritative; the surface only ever
/// receives commands derived from them.
#[derive(Debug)]
pub struct PlotSeriesTableModel<S: PlotSurface> {
    surface: S,
    series: Vec<Series>,
    palette: PaletteCursor,
    style: PlotStyle,
    grid_on: bool,
    legend_on: bool,
    /// Always equals the number of visible series.
    visible_count: usize,
    events: ModelNotifier,
}

impl<S: PlotSurface> PlotSeriesTableModel<S> {
    /// Model using the process-wide palette cursor.
    pub fn new(surface: S, style: PlotStyle) -> Self {
        Self::with_palette(surface, style, PaletteCursor::global())
    }

    /// Model with its own palette cursor.  Clears any lines already on `surface`.
    pub fn with_palette(mut surface: S, style: PlotStyle, palette: PaletteCursor) -> Self {
        if surface.has_legend() {
            surface.remove_legend();
        }
        let n = surface.line_count();
        if n > 0 {
            surface.remove_lines(0..n);
        }
        Self {
            surface,
            series: Vec::new(),
            palette,
            style,
            grid_on: false,
            legend_on: false,
            visible_count: 0,
            events: ModelNotifier::default(),
        }
    }

    pub fn events(&mut self) -> &mut ModelNotifier {
        &mut self.events
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Replace the style constants and reapply them.
    pub fn set_style(&mut self, style: PlotStyle) {
        self.style = style;
        self.restyle();
        self.surface.refresh_layout();
    }

    // -- reads -------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.series.len()
    }

    pub fn column_count(&self) -> usize {
        COLUMN_COUNT
    }

    pub fn header(&self, col: usize) -> Option<&'static str> {
        match col {
            0 => Some("Name"),
            1 => Some("#RGBA"),
            2 => Some("Style"),
            _ => None,
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn series(&self, row: usize) -> Option<&Series> {
        self.series.get(row)
    }

    pub fn check_state(&self, row: usize) -> Option<CheckState> {
        self.series.get(row).map(Series::check_state)
    }

    pub fn name(&self, row: usize) -> Option<&str> {
        self.series.get(row).map(|s| s.name.as_str())
    }

    pub fn color_hex(&self, row: usize) -> Option<String> {
        self.series.get(row).map(|s| color::to_hex(s.color))
    }

    pub fn style_token(&self, row: usize) -> Option<&'static str> {
        self.series.get(row).map(|s| s.line_style.token())
    }

    /// `(x, y)` as plotted.
    pub fn series_data(&self, row: usize) -> Option<(&[f64], &[f64])> {
        self.series
            .get(row)
            .map(|s| (s.x.as_slice(), s.y.as_slice()))
    }

    pub fn annotation(&self, row: usize) -> Option<&[String]> {
        self.series.get(row)?.annotation.as_deref()
    }

    /// Display text of a cell.
    pub fn cell_text(&self, row: usize, col: usize) -> Option<String> {
        match col {
            0 => self.name(row).map(str::to_string),
            1 => self.color_hex(row),
            2 => self.style_token(row).map(str::to_string),
            _ => None,
        }
    }

    pub fn grid(&self) -> bool {
        self.grid_on
    }

    pub fn legend(&self) -> bool {
        self.legend_on
    }

    // -- structural changes ------------------------------------------------

    /// Add one series per `(name, x, y)` triple, up to the shortest input.
    ///
    /// Text x values that do not parse trigger one question per batch
    /// (unless answered "to all"): accept to plot against a synthetic
    /// negative axis `-10n, ..., -10` with the text kept as annotations, or
    /// decline to drop the series.  Returns the number of series added.
    pub fn append_row<N, X>(
        &mut self,
        names: &[N],
        xs: &[Vec<X>],
        ys: &[Vec<f64>],
        notifier: &mut dyn Notifier,
    ) -> usize
    where
        N: AsRef<str>,
        X: XValue,
    {
        let count = names.len().min(xs.len()).min(ys.len());
        let mut answer: Option<UserChoice> = None;
        let mut prepared = Vec::with_capacity(count);

        for ((name, x_raw), y_raw) in names.iter().zip(xs).zip(ys) {
            let name = name.as_ref();
            let numeric: Option<Vec<f64>> = x_raw.iter().map(XValue::as_number).collect();
            let (mut x, mut annotation) = match numeric {
                Some(x) => (x, None),
                None => {
                    let choice = match answer {
                        Some(c) if c.is_sticky() => c,
                        _ => {
                            let c = notifier.ask(
                                "Invalid X-Axis Data.",
                                "Texts instead of numbers found in x-axis data.\n\
                                 This will lead to wacky plot behavior. Still use them?",
                                &[
                                    UserChoice::Yes,
                                    UserChoice::No,
                                    UserChoice::YesToAll,
                                    UserChoice::NoToAll,
                                ],
                                UserChoice::No,
                            );
                            answer = Some(c);
                            c
                        }
                    };
                    if !choice.accepts() {
                        log::info!("Dropping series '{name}': x values are not numeric");
                        continue;
                    }
                    let n = x_raw.len();
                    let synthetic = (0..n)
                        .map(|k| -SYNTHETIC_STEP * (n - k) as f64)
                        .collect();
                    (synthetic, Some(x_raw.iter().map(XValue::as_text).collect::<Vec<_>>()))
                }
            };

            let len = x.len().min(y_raw.len());
            if len == 0 {
                log::info!("Dropping series '{name}': no data points");
                continue;
            }
            x.truncate(len);
            if let Some(a) = annotation.as_mut() {
                a.truncate(len);
            }
            prepared.push((name.to_string(), x, y_raw[..len].to_vec(), annotation));
        }

        if prepared.is_empty() {
            return 0;
        }

        let added = prepared.len();
        let first = self.series.len();
        {
            let _insert = self.events.insert_rows(first, first + added - 1);
            for (name, x, y, annotation) in prepared {
                let series = Series {
                    name,
                    color: self.palette.next_color(),
                    line_style: LineStyle::Solid,
                    draw: DrawMode::Line,
                    visible: true,
                    annotation,
                    x,
                    y,
                };
                self.surface.add_line(LineSpec {
                    x: series.x.clone(),
                    y: series.y.clone(),
                    color: series.color,
                    label: series.label(),
                    width: self.style.line_width,
                    marker_size: self.style.marker_size(),
                    line_style: Some(series.line_style),
                    marker: None,
                    mark_every: self.style.mark_every(series.x.len()),
                    annotations: series.annotation.clone(),
                });
                self.series.push(series);
                self.visible_count += 1;
            }
        }
        self.refresh_legend();
        self.surface.refresh_layout();
        added
    }

    /// Remove `count` series starting at `row`, together with their lines.
    pub fn remove_range(&mut self, row: usize, count: usize) -> bool {
        if count == 0 || row + count > self.series.len() {
            return false;
        }
        let removed_visible = self.series[row..row + count]
            .iter()
            .filter(|s| s.visible)
            .count();
        if removed_visible == self.visible_count && self.surface.has_legend() {
            self.surface.remove_legend();
        }
        {
            let _remove = self.events.remove_rows(row, row + count - 1);
            self.series.drain(row..row + count);
            self.surface.remove_lines(row..row + count);
            self.visible_count -= removed_visible;
        }
        self.refresh_legend();
        self.surface.refresh_layout();
        true
    }

    // -- cell edits --------------------------------------------------------

    pub fn set_cell(&mut self, row: usize, col: usize, edit: CellEdit) -> bool {
        self.set_cells(vec![(row, col, edit)])
    }

    /// Apply a batch of edits.  Rejected edits are skipped; the rest apply.
    /// One change notification spans every affected row.
    pub fn set_cells(&mut self, edits: Vec<(usize, usize, CellEdit)>) -> bool {
        let mut span: Option<(usize, usize)> = None;
        for (row, col, edit) in edits {
            match self.apply_edit(row, col, edit) {
                Ok((first, last)) => {
                    span = Some(match span {
                        Some((a, b)) => (a.min(first), b.max(last)),
                        None => (first, last),
                    });
                }
                Err(e) => log::debug!("Rejected edit at ({row}, {col}): {e}"),
            }
        }
        let Some((first, last)) = span else {
            return false;
        };
        self.events.data_changed(first, last);
        self.refresh_legend();
        self.surface.refresh_layout();
        true
    }

    /// Returns the inclusive row span touched.
    fn apply_edit(
        &mut self,
        row: usize,
        col: usize,
        edit: CellEdit,
    ) -> Result<(usize, usize), EditError> {
        if row >= self.series.len() || col >= COLUMN_COUNT {
            return Err(EditError::OutOfRange { row, col });
        }
        match (col, edit) {
            (0, CellEdit::Check(state)) => {
                self.set_check_state(row, state);
                Ok((row, row))
            }
            (0, CellEdit::Text(text)) => self.rename(row, &text),
            (1, CellEdit::Text(text)) => {
                let c = color::parse_color(&text).ok_or(EditError::InvalidColor(text))?;
                self.series[row].color = c;
                self.surface.set_color(row, c);
                Ok((row, row))
            }
            (2, CellEdit::Text(text)) => {
                let style: LineStyle = text.parse()?;
                let series = &mut self.series[row];
                if series.draw == DrawMode::Scatter {
                    return Err(EditError::StyleOnScatter);
                }
                series.line_style = style;
                self.surface.set_line_style(row, Some(style));
                Ok((row, row))
            }
            _ => Err(EditError::NotEditable { row, col }),
        }
    }

    fn set_check_state(&mut self, row: usize, state: CheckState) {
        let series = &mut self.series[row];
        match state {
            CheckState::Hidden => {
                if !series.visible {
                    return;
                }
                // The legend must go before the last visible line does.
                if self.visible_count == 1 && self.surface.has_legend() {
                    self.surface.remove_legend();
                }
                self.visible_count -= 1;
                series.visible = false;
                self.surface.set_visible(row, false);
                self.surface.set_label(row, &series.label());
            }
            CheckState::Line | CheckState::Scatter => {
                if !series.visible {
                    self.visible_count += 1;
                    series.visible = true;
                    self.surface.set_visible(row, true);
                    self.surface.set_label(row, &series.label());
                }
                if state == CheckState::Line {
                    series.draw = DrawMode::Line;
                    self.surface.set_line_style(row, Some(series.line_style));
                    self.surface.set_marker(row, None);
                } else {
                    series.draw = DrawMode::Scatter;
                    self.surface.set_line_style(row, None);
                    self.surface.set_marker(row, Some(MarkerShape::Circle));
                }
            }
        }
    }

    /// Plain rename, or `:s/find/replace/[g]` over this row or every row.
    /// Results that would be empty or start with `_` are not applied.
    fn rename(&mut self, row: usize, text: &str) -> Result<(usize, usize), EditError> {
        let Some(sub) = Substitution::parse(text)? else {
            if !valid_name(text) {
                return Err(EditError::InvalidName(text.to_string()));
            }
            self.series[row].name = text.to_string();
            self.surface.set_label(row, &self.series[row].label());
            return Ok((row, row));
        };

        let rows = match sub.scope {
            Scope::All => 0..self.series.len(),
            Scope::Row => row..row + 1,
        };
        let mut span: Option<(usize, usize)> = None;
        for i in rows {
            let series = &mut self.series[i];
            let renamed = sub.apply(&series.name);
            if renamed == series.name || !valid_name(&renamed) {
                continue;
            }
            series.name = renamed;
            self.surface.set_label(i, &series.label());
            span = Some(match span {
                Some((first, _)) => (first, i),
                None => (i, i),
            });
        }
        span.ok_or(EditError::NoMatch)
    }

    // -- plot-wide settings ------------------------------------------------

    pub fn set_grid(&mut self, on: bool) {
        self.grid_on = on;
        self.surface.set_grid(on);
        self.surface.refresh_layout();
    }

    pub fn set_legend(&mut self, on: bool) {
        self.legend_on = on;
        self.refresh_legend();
        self.surface.refresh_layout();
    }

    /// Show the legend iff it is enabled and something is visible.
    pub fn refresh_legend(&mut self) {
        if self.surface.has_legend() {
            self.surface.remove_legend();
        }
        if self.visible_count > 0 && self.legend_on {
            self.surface.show_legend(self.style.font_size);
        }
    }

    /// Fit the axes to the visible series.  Linear axes get a margin of
    /// `x_margin` / `y_margin` of the range on each side; log axes none.
    /// Returns all zeros, without touching the limits, if nothing is visible.
    pub fn autoscale(&mut self) -> AxisBounds {
        let mut visible = self
            .series
            .iter()
            .filter(|s| s.visible && !s.x.is_empty())
            .peekable();
        if visible.peek().is_none() {
            return AxisBounds::default();
        }

        let mut b = AxisBounds {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for s in visible {
            for &x in &s.x {
                b.x_min = b.x_min.min(x);
                b.x_max = b.x_max.max(x);
            }
            for &y in &s.y {
                b.y_min = b.y_min.min(y);
                b.y_max = b.y_max.max(y);
            }
        }

        if self.surface.scale(Axis::X) == AxisScale::Linear {
            let pad = (b.x_max - b.x_min) * self.style.x_margin;
            b.x_min -= pad;
            b.x_max += pad;
        }
        if self.surface.scale(Axis::Y) == AxisScale::Linear {
            let pad = (b.y_max - b.y_min) * self.style.y_margin;
            b.y_min -= pad;
            b.y_max += pad;
        }
        self.surface.set_limits(b);
        b
    }

    /// Reapply line width, marker size and marker decimation to every
    /// line, and the font size to the axes.
    pub fn restyle(&mut self) {
        for (i, s) in self.series.iter().enumerate() {
            self.surface.set_line_width(i, self.style.line_width);
            self.surface.set_marker_size(i, self.style.marker_size());
            self.surface.set_mark_every(i, self.style.mark_every(s.x.len()));
        }
        self.surface.set_font_size(self.style.font_size);
        self.refresh_legend();
    }

    /// Autoscale, restyle and redraw.
    pub fn redraw_all(&mut self) -> AxisBounds {
        let bounds = self.autoscale();
        self.restyle();
        self.surface.refresh_layout();
        bounds
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with(HIDDEN_PREFIX)
}
