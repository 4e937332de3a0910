use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::PlotStyle;
use crate::data::axis_list::AxisListModel;
use crate::data::export::write_grid;
use crate::data::files::FileCollectionModel;
use crate::notify::Notifier;
use crate::plot::egui_surface::EguiSurface;
use crate::plot::series_table::{CellEdit, PlotSeriesTableModel};
use crate::plot::{Axis, AxisScale};

// ---------------------------------------------------------------------------
// Inline editing
// ---------------------------------------------------------------------------

/// Which cell an inline editor is open on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// A row of the axis list.
    Axis(usize),
    /// A text column of the series table.
    Series { row: usize, col: usize },
}

/// An open inline editor and its text.
#[derive(Debug, Clone)]
pub struct CellEditor {
    pub target: EditTarget,
    pub text: String,
    /// Keyboard focus was handed to the editor.
    pub focused: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded raw data files, in load order.
    pub files: FileCollectionModel,

    /// Row of `files` whose axis list is shown.
    pub selected_file: Option<usize>,

    /// `true`: axis rows are wavelengths (time traces).  `false`: times (spectra).
    pub by_wavelength: bool,

    /// Selected rows of the axis list.
    pub selected_rows: BTreeSet<usize>,

    /// Plotted series and the surface they are drawn on.
    pub series: PlotSeriesTableModel<EguiSurface>,

    /// Selected rows of the series table.
    pub selected_series: BTreeSet<usize>,

    /// At most one inline editor is open at a time.
    pub editor: Option<CellEditor>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_style(PlotStyle::from_env())
    }
}

impl AppState {
    pub fn with_style(style: PlotStyle) -> Self {
        let mut series = PlotSeriesTableModel::new(EguiSurface::default(), style);
        series.set_legend(true);
        series.restyle();
        Self {
            files: FileCollectionModel::new(),
            selected_file: None,
            by_wavelength: true,
            selected_rows: BTreeSet::new(),
            series,
            selected_series: BTreeSet::new(),
            editor: None,
            status_message: None,
        }
    }

    // -- files -------------------------------------------------------------

    /// Load every path; invalid files are reported through `notifier` and
    /// skipped.  Selects the first newly added file if nothing is selected.
    pub fn open_files(&mut self, paths: Vec<PathBuf>, notifier: &mut dyn Notifier) -> usize {
        let before = self.files.row_count();
        let mut added = 0;
        for path in paths {
            if self.files.append_file(path, notifier) {
                added += 1;
            }
        }
        log::info!("Opened {added} file(s), {} total", self.files.row_count());
        self.status_message = Some(format!("{added} file(s) loaded"));
        if added > 0 && self.selected_file.is_none() {
            self.select_file(before);
        }
        added
    }

    /// Show `row`'s axis list in the current orientation.
    pub fn select_file(&mut self, row: usize) {
        let by_wavelength = self.by_wavelength;
        let Some(file) = self.files.file_mut(row) else {
            return;
        };
        file.gen_model(by_wavelength);
        self.selected_file = Some(row);
        self.selected_rows.clear();
        self.editor = None;
    }

    pub fn set_orientation(&mut self, by_wavelength: bool) {
        self.by_wavelength = by_wavelength;
        self.selected_rows.clear();
        self.editor = None;
        if let Some(file) = self.selected_file.and_then(|r| self.files.file_mut(r)) {
            file.gen_model(by_wavelength);
        }
    }

    pub fn axis_model(&self) -> Option<&AxisListModel> {
        self.files.file(self.selected_file?)?.model()
    }

    pub fn axis_model_mut(&mut self) -> Option<&mut AxisListModel> {
        self.files.file_mut(self.selected_file?)?.model_mut()
    }

    /// Remove files in `rows`.  The selection moves off removed files.
    pub fn remove_files(&mut self, rows: &BTreeSet<usize>) {
        for &row in rows.iter().rev() {
            self.files.remove_range(row, 1);
        }
        self.selected_file = self.selected_file.and_then(|sel| {
            if rows.contains(&sel) {
                None
            } else {
                Some(sel - rows.range(..sel).count())
            }
        });
        self.selected_rows.clear();
        self.editor = None;
    }

    /// Write the selected file's grid to `path` in its original layout.
    pub fn export_selected(&self, path: &Path) -> Result<()> {
        let file = self
            .selected_file
            .and_then(|r| self.files.file(r))
            .context("no file selected")?;
        write_grid(path, file.grid(), file.layout())
            .with_context(|| format!("exporting {}", file.file_name()))
    }

    // -- axis list -----------------------------------------------------------

    /// Apply an inline edit to an axis row; reports rejections in the status line.
    pub fn edit_axis_value(&mut self, row: usize, text: &str) -> bool {
        let Some(model) = self.axis_model_mut() else {
            return false;
        };
        match model.try_set_primary_value(row, text) {
            Ok(n) => {
                self.status_message = Some(format!("{n} value(s) changed"));
                true
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                false
            }
        }
    }

    /// Plot every selected axis row as a new series, named
    /// `"<file> <axis value>"`.
    pub fn plot_selected(&mut self, notifier: &mut dyn Notifier) -> usize {
        let Some(file) = self.selected_file.and_then(|r| self.files.file(r)) else {
            return 0;
        };
        let Some(model) = file.model() else {
            return 0;
        };
        let file_name = file.file_name();
        let mut names = Vec::new();
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for &row in &self.selected_rows {
            let (Some(value), Some(payload)) =
                (model.primary_text(row), model.auxiliary_payload(row))
            else {
                continue;
            };
            names.push(format!("{file_name} {value}"));
            xs.push(payload.x);
            ys.push(payload.y);
        }
        let added = self.series.append_row(&names, &xs, &ys, notifier);
        if added > 0 {
            self.series.autoscale();
        }
        self.status_message = Some(format!("{added} series plotted"));
        added
    }

    // -- series table ----------------------------------------------------------

    /// Apply an inline edit to a series table cell.
    pub fn edit_series_cell(&mut self, row: usize, col: usize, text: String) -> bool {
        let ok = self.series.set_cell(row, col, CellEdit::Text(text));
        if !ok {
            self.status_message = Some(format!(
                "Edit of '{}' rejected",
                self.series.header(col).unwrap_or("?")
            ));
        }
        ok
    }

    pub fn remove_series(&mut self, rows: &BTreeSet<usize>) {
        for &row in rows.iter().rev() {
            self.series.remove_range(row, 1);
        }
        self.selected_series.clear();
        self.editor = None;
    }

    pub fn set_log_scale(&mut self, axis: Axis, log: bool) {
        let scale = if log { AxisScale::Log } else { AxisScale::Linear };
        self.series.surface_mut().set_scale(axis, scale);
        self.series.autoscale();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DataFile, Grid, Layout};
    use crate::notify::LogNotifier;

    fn state_with_file() -> AppState {
        let mut state = AppState::with_style(PlotStyle::default());
        let grid = Grid {
            z: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
            wavelengths: vec![400.0, 450.0, 500.0],
            times: vec![0.0, 1.5],
            ..Default::default()
        };
        assert!(state.files.append(DataFile::from_grid("run.csv", grid, Layout::TimeMajor)));
        state.select_file(0);
        state
    }

    #[test]
    fn plots_time_traces_for_selected_wavelengths() {
        let mut state = state_with_file();
        state.selected_rows.extend([0, 2]);
        assert_eq!(state.plot_selected(&mut LogNotifier), 2);
        assert_eq!(state.series.name(0), Some("run.csv 400"));
        assert_eq!(
            state.series.series_data(1),
            Some((&[0.0, 1.5][..], &[3.0, 6.0][..]))
        );
    }

    #[test]
    fn orientation_switch_plots_spectra() {
        let mut state = state_with_file();
        state.set_orientation(false);
        assert_eq!(state.axis_model().map(AxisListModel::row_count), Some(2));
        state.selected_rows.insert(1);
        state.plot_selected(&mut LogNotifier);
        assert_eq!(state.series.name(0), Some("run.csv 1.5"));
        assert_eq!(
            state.series.series_data(0),
            Some((&[400.0, 450.0, 500.0][..], &[4.0, 5.0, 6.0][..]))
        );
    }

    #[test]
    fn removing_selected_file_clears_selection() {
        let mut state = state_with_file();
        state.remove_files(&BTreeSet::from([0]));
        assert_eq!(state.selected_file, None);
        assert!(state.axis_model().is_none());
    }

    #[test]
    fn axis_edit_reports_status() {
        let mut state = state_with_file();
        assert!(state.edit_axis_value(0, ":s/4/6/g"));
        assert_eq!(state.axis_model().and_then(|m| m.primary_value(0)), Some(600.0));
        assert_eq!(state.axis_model().and_then(|m| m.primary_value(1)), Some(650.0));
        assert!(!state.edit_axis_value(0, "abc"));
        assert!(state.status_message.is_some());
    }
}
