use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming a JSON file with [`PlotStyle`] overrides.
pub const STYLE_ENV: &str = "RUSTY_SPECTRA_STYLE";

/// Global plot styling constants applied by `restyle` and `autoscale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub font_size: f32,
    pub line_width: f32,
    /// Above this many points, only every `len / max_markers`-th marker is drawn.
    pub max_markers: usize,
    /// Marker size relative to the line width.
    pub marker_ratio: f32,
    /// Fraction of the data range added on each side of a linear axis.
    pub x_margin: f64,
    pub y_margin: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            line_width: 2.0,
            max_markers: 100,
            marker_ratio: 2.5,
            x_margin: 0.02,
            y_margin: 0.02,
        }
    }
}

impl PlotStyle {
    pub fn marker_size(&self) -> f32 {
        self.line_width * self.marker_ratio
    }

    /// Marker decimation for a series of `points` points.
    pub fn mark_every(&self, points: usize) -> usize {
        if points < self.max_markers || self.max_markers == 0 {
            1
        } else {
            points / self.max_markers
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading style file {}", path.display()))?;
        serde_json::from_str(&text).context("parsing style JSON")
    }

    /// Style from `$RUSTY_SPECTRA_STYLE`, or the defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(STYLE_ENV) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(style) => {
                log::info!("Loaded plot style from {}", Path::new(&path).display());
                style
            }
            Err(e) => {
                log::warn!("Ignoring {STYLE_ENV}: {e:#}");
                Self::default()
            }
        }
    }
}
