use std::fmt;
use std::path::{Path, PathBuf};

use crate::notify::Notifier;

use super::axis_list::AxisListModel;
use super::loader;

// ---------------------------------------------------------------------------
// Grid – the normalised intensity matrix
// ---------------------------------------------------------------------------

/// Row layout of the file a grid was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// One line per time point (`Time,Wavelength` / `.txt`).
    #[default]
    TimeMajor,
    /// One line per wavelength (`Wavelength,Time`).
    WavelengthMajor,
}

/// Intensity grid, always time-major: `z[i][j]` is the intensity at
/// `times[i]` and `wavelengths[j]`.
///
/// A `.txt` header may name its columns with text instead of numbers.  The
/// header tokens are then kept verbatim in `wavelength_labels` and the
/// matching `wavelengths` entries are NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub z: Vec<Vec<f64>>,
    pub wavelengths: Vec<f64>,
    pub times: Vec<f64>,
    pub wavelength_labels: Option<Vec<String>>,
}

impl Grid {
    /// All three parts are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.z.is_empty() && !self.wavelengths.is_empty() && !self.times.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.z.iter().map(Vec::len).sum()
    }

    /// Spectrum at time index `i`.
    pub fn spectrum(&self, i: usize) -> Option<&[f64]> {
        self.z.get(i).map(Vec::as_slice)
    }

    /// The wavelength axis as shown to the user: header text where the file
    /// had some, numbers otherwise.
    pub fn wavelength_entries(&self) -> Vec<AxisEntry> {
        match &self.wavelength_labels {
            Some(labels) => labels.iter().map(|l| AxisEntry::parse(l)).collect(),
            None => self.wavelengths.iter().copied().map(AxisEntry::Number).collect(),
        }
    }

    /// Time trace at wavelength index `j`.
    pub fn trace(&self, j: usize) -> Option<Vec<f64>> {
        if j >= self.wavelengths.len() {
            return None;
        }
        self.z.iter().map(|row| row.get(j).copied()).collect()
    }
}

/// One axis value, numeric or a free-text column name.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisEntry {
    Number(f64),
    Text(String),
}

impl AxisEntry {
    /// Numbers parse, anything else is kept as text.
    pub fn parse(token: &str) -> Self {
        match token.trim().parse::<f64>() {
            Ok(v) => AxisEntry::Number(v),
            Err(_) => AxisEntry::Text(token.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AxisEntry::Number(v) => Some(*v),
            AxisEntry::Text(_) => None,
        }
    }
}

impl fmt::Display for AxisEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisEntry::Number(v) => write!(f, "{v}"),
            AxisEntry::Text(t) => f.write_str(t),
        }
    }
}

// ---------------------------------------------------------------------------
// DataFile – one loaded raw file
// ---------------------------------------------------------------------------

/// A parsed raw data file plus its lazily built list model.
#[derive(Debug)]
pub struct DataFile {
    path: PathBuf,
    grid: Grid,
    layout: Layout,
    model: Option<AxisListModel>,
}

impl DataFile {
    /// Parse `path`.  Failures are reported through `notifier` and give an
    /// invalid (empty) file rather than an error.
    pub fn open(path: impl Into<PathBuf>, notifier: &mut dyn Notifier) -> Self {
        let path = path.into();
        let (grid, layout) = loader::load_grid(&path, notifier);
        Self::from_grid(path, grid, layout)
    }

    pub fn from_grid(path: impl Into<PathBuf>, grid: Grid, layout: Layout) -> Self {
        Self {
            path: path.into(),
            grid,
            layout,
            model: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base name of the file, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_valid(&self) -> bool {
        self.grid.is_valid()
    }

    /// The file's list model, built on first use.
    ///
    /// Later calls only re-orient the same instance, so subscriptions made on
    /// it stay attached for the lifetime of the file.
    pub fn gen_model(&mut self, by_wavelength: bool) -> &mut AxisListModel {
        if let Some(model) = &mut self.model {
            model.set_type(by_wavelength);
        }
        let grid = &self.grid;
        self.model
            .get_or_insert_with(|| AxisListModel::new(grid, by_wavelength))
    }

    /// The list model, if [`gen_model`](Self::gen_model) has been called.
    pub fn model(&self) -> Option<&AxisListModel> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut AxisListModel> {
        self.model.as_mut()
    }
}
