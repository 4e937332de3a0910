//! Viewer for time-resolved spectroscopy datasets: a wavelength × time grid
//! of intensities, browsed as time traces or spectra and plotted through an
//! editable series table.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod notify;
pub mod plot;
pub mod state;
pub mod ui;
