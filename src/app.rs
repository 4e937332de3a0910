use eframe::egui;

use crate::notify::DialogNotifier;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustySpectraApp {
    pub state: AppState,
    notifier: DialogNotifier,
}

impl eframe::App for RustySpectraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &mut self.notifier);
        });

        // ---- Left side panel: files and axis list ----
        egui::SidePanel::left("data_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.notifier);
            });

        // ---- Bottom panel: series table ----
        egui::TopBottomPanel::bottom("series_panel")
            .default_height(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::series_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let by_wavelength = self.state.by_wavelength;
            plot::series_plot(ui, self.state.series.surface_mut(), by_wavelength);
        });
    }
}
