use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::PlotStyle;
use crate::notify::Notifier;
use crate::plot::series_table::{CellEdit, CheckState, HEADER_TOOLTIP};
use crate::plot::{Axis, AxisScale, PlotSurface};
use crate::state::{AppState, CellEditor, EditTarget};

use super::plot::swatch;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, notifier: &mut dyn Notifier) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, notifier);
                ui.close_menu();
            }
            let can_export = state.selected_file.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export…")).clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let mut grid = state.series.grid();
        if ui.checkbox(&mut grid, "Grid").changed() {
            state.series.set_grid(grid);
        }
        let mut legend = state.series.legend();
        if ui.checkbox(&mut legend, "Legend").changed() {
            state.series.set_legend(legend);
        }
        for (axis, label) in [(Axis::X, "Log X"), (Axis::Y, "Log Y")] {
            let mut log = state.series.surface().scale(axis) == AxisScale::Log;
            if ui.checkbox(&mut log, label).changed() {
                state.set_log_scale(axis, log);
            }
        }

        ui.separator();

        if ui.button("Autoscale").clicked() {
            state.series.autoscale();
        }
        if ui
            .button("Restyle")
            .on_hover_text("Reload the plot style and redraw everything")
            .clicked()
        {
            state.series.set_style(PlotStyle::from_env());
            state.series.redraw_all();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::LIGHT_RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – files and the axis list
// ---------------------------------------------------------------------------

/// Render the files list and the selected file's axis list.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, notifier: &mut dyn Notifier) {
    ui.heading("Files");
    ui.separator();
    files_list(ui, state);

    ui.add_space(8.0);
    ui.heading("Axis");
    ui.separator();
    axis_list(ui, state, notifier);
}

fn files_list(ui: &mut Ui, state: &mut AppState) {
    if state.files.is_empty() {
        ui.label("No files loaded.");
        return;
    }

    let mut select = None;
    let mut remove = BTreeSet::new();
    ScrollArea::vertical()
        .id_salt("files")
        .max_height(160.0)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for row in 0..state.files.row_count() {
                let (Some(text), Some(tip)) =
                    (state.files.summary_text(row), state.files.detail_tooltip(row))
                else {
                    continue;
                };
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        remove.insert(row);
                    }
                    let selected = state.selected_file == Some(row);
                    if ui.selectable_label(selected, text).on_hover_text(tip).clicked() {
                        select = Some(row);
                    }
                });
            }
        });

    if let Some(row) = select {
        state.select_file(row);
    }
    if !remove.is_empty() {
        state.remove_files(&remove);
    }
}

fn axis_list(ui: &mut Ui, state: &mut AppState, notifier: &mut dyn Notifier) {
    let mut by_wavelength = state.by_wavelength;
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut by_wavelength, true, "Time traces");
        ui.radio_value(&mut by_wavelength, false, "Spectra");
    });
    if by_wavelength != state.by_wavelength {
        state.set_orientation(by_wavelength);
    }

    let Some(rows) = state.axis_model().map(|m| m.row_count()) else {
        ui.label("Select a file.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.selected_rows = (0..rows).collect();
        }
        if ui.small_button("None").clicked() {
            state.selected_rows.clear();
        }
        let n = state.selected_rows.len();
        if ui
            .add_enabled(n > 0, egui::Button::new(format!("Plot selected ({n})")))
            .clicked()
        {
            state.plot_selected(notifier);
        }
    });

    let mut commit = None;
    ScrollArea::vertical()
        .id_salt("axis")
        .auto_shrink([false, false])
        .show_rows(ui, 18.0, rows, |ui: &mut Ui, range| {
            let AppState {
                files,
                selected_file,
                selected_rows,
                editor,
                ..
            } = state;
            let Some(model) = selected_file.and_then(|r| files.file(r)?.model()) else {
                return;
            };
            for row in range {
                let target = EditTarget::Axis(row);
                if let Some(text) = edit_in_place(ui, editor, target) {
                    commit = Some((row, text));
                    continue;
                }
                if is_editing(editor, target) {
                    continue;
                }
                let (Some(value), Some(edit)) = (model.primary_text(row), model.edit_text(row))
                else {
                    continue;
                };
                let tip = model.tooltip_summary(row).unwrap_or_default();
                let selected = selected_rows.contains(&row);
                let resp = ui
                    .selectable_label(selected, value)
                    .on_hover_text(tip);
                if resp.double_clicked() {
                    open_editor(editor, target, edit);
                } else if resp.clicked() && !selected_rows.remove(&row) {
                    selected_rows.insert(row);
                }
            }
        });

    if let Some((row, text)) = commit {
        state.edit_axis_value(row, &text);
    }
}

// ---------------------------------------------------------------------------
// Series table
// ---------------------------------------------------------------------------

enum SeriesAction {
    Check(usize, CheckState),
    Edit(usize, usize, String),
    Remove(usize),
}

/// Render the plotted series: visibility, name, colour and style per row.
pub fn series_panel(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Series");
        let n = state.selected_series.len();
        if ui
            .add_enabled(n > 0, egui::Button::new(format!("Remove selected ({n})")))
            .clicked()
        {
            let rows = state.selected_series.clone();
            state.remove_series(&rows);
        }
    });

    let rows = state.series.row_count();
    if rows == 0 {
        ui.label("Nothing plotted yet.");
        return;
    }

    let mut actions = Vec::new();
    let AppState {
        series,
        selected_series,
        editor,
        ..
    } = state;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(28.0))
        .column(Column::exact(28.0))
        .column(Column::remainder().at_least(140.0).clip(true))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::exact(24.0))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|_| {});
            for col in 0..series.column_count() {
                header.col(|ui| {
                    ui.strong(series.header(col).unwrap_or_default())
                        .on_hover_text(HEADER_TOOLTIP);
                });
            }
            header.col(|_| {});
        })
        .body(|body| {
            body.rows(20.0, rows, |mut row| {
                let i = row.index();
                row.set_selected(selected_series.contains(&i));

                row.col(|ui| {
                    if ui.selectable_label(selected_series.contains(&i), i.to_string()).clicked()
                        && !selected_series.remove(&i)
                    {
                        selected_series.insert(i);
                    }
                });

                let check = series.check_state(i).unwrap_or(CheckState::Hidden);
                row.col(|ui| {
                    let (symbol, tip) = match check {
                        CheckState::Hidden => ("☐", "Hidden"),
                        CheckState::Line => ("━", "Line"),
                        CheckState::Scatter => ("•", "Scatter"),
                    };
                    if ui.button(symbol).on_hover_text(tip).clicked() {
                        actions.push(SeriesAction::Check(i, check.cycle()));
                    }
                });

                for col in 0..series.column_count() {
                    row.col(|ui| {
                        if col == 1 {
                            if let Some(c) = series.series(i).map(|s| s.color) {
                                swatch(ui, c);
                            }
                        }
                        let target = EditTarget::Series { row: i, col };
                        if let Some(text) = edit_in_place(ui, editor, target) {
                            actions.push(SeriesAction::Edit(i, col, text));
                        } else if !is_editing(editor, target) {
                            let text = series.cell_text(i, col).unwrap_or_default();
                            let resp = ui.add(
                                egui::Label::new(text.as_str())
                                    .sense(egui::Sense::click())
                                    .truncate(),
                            );
                            if resp.double_clicked() {
                                open_editor(editor, target, text);
                            }
                        }
                    });
                }

                row.col(|ui| {
                    if ui.small_button("✖").on_hover_text("Remove").clicked() {
                        actions.push(SeriesAction::Remove(i));
                    }
                });
            });
        });

    for action in actions {
        match action {
            SeriesAction::Check(row, check) => {
                state.series.set_cell(row, 0, CellEdit::Check(check));
            }
            SeriesAction::Edit(row, col, text) => {
                state.edit_series_cell(row, col, text);
            }
            SeriesAction::Remove(row) => state.remove_series(&BTreeSet::from([row])),
        }
    }
}

// ---------------------------------------------------------------------------
// Inline editor
// ---------------------------------------------------------------------------

fn is_editing(editor: &Option<CellEditor>, target: EditTarget) -> bool {
    editor.as_ref().is_some_and(|e| e.target == target)
}

fn open_editor(editor: &mut Option<CellEditor>, target: EditTarget, text: String) {
    *editor = Some(CellEditor {
        target,
        text,
        focused: false,
    });
}

/// Draw the editor if it is open on `target`.  Returns the text when the
/// user confirms with Enter; losing focus any other way cancels.
fn edit_in_place(ui: &mut Ui, editor: &mut Option<CellEditor>, target: EditTarget) -> Option<String> {
    let ed = editor.as_mut().filter(|e| e.target == target)?;
    let resp = ui.add(egui::TextEdit::singleline(&mut ed.text).desired_width(f32::INFINITY));
    if !ed.focused {
        resp.request_focus();
        ed.focused = true;
    }
    if !resp.lost_focus() {
        return None;
    }
    let confirmed = ui.input(|i| i.key_pressed(egui::Key::Enter));
    let text = editor.take().map(|e| e.text)?;
    confirmed.then_some(text)
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, notifier: &mut dyn Notifier) {
    let files = rfd::FileDialog::new()
        .set_title("Open raw data")
        .add_filter("Raw data", &["csv", "txt"])
        .add_filter("Comma separated", &["csv"])
        .add_filter("Whitespace separated", &["txt"])
        .pick_files();

    if let Some(paths) = files {
        state.open_files(paths, notifier);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let Some(name) = state
        .selected_file
        .and_then(|r| state.files.file(r))
        .map(|f| f.file_name())
    else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export raw data")
        .set_file_name(format!("copy_of_{name}"))
        .add_filter("Raw data", &["csv", "txt"])
        .save_file();

    if let Some(path) = file {
        match state.export_selected(&path) {
            Ok(()) => {
                log::info!("Exported to {}", path.display());
                state.status_message = Some(format!("Exported {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
