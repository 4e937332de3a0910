use eframe::egui::{self, Align2, FontId, RichText, TextStyle, Ui};
use egui_plot::{Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Points, Text};

use crate::plot::egui_surface::{EguiSurface, SurfaceLine};
use crate::plot::{Axis, AxisScale, LineStyle, PlotSurface};

// ---------------------------------------------------------------------------
// Series plot (central panel)
// ---------------------------------------------------------------------------

/// Render the series plot in the central panel.
pub fn series_plot(ui: &mut Ui, surface: &mut EguiSurface, by_wavelength: bool) {
    if surface.line_count() == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file, select rows and press \"Plot selected\"");
        });
        return;
    }

    let (x_label, y_label) = if by_wavelength {
        ("Time", "Intensity")
    } else {
        ("Wavelength", "Intensity")
    };
    let pending = surface.take_pending_limits();
    let surface: &EguiSurface = surface;
    let font_size = surface.font_size();

    ui.scope(|ui: &mut Ui| {
        // Axis labels and the legend follow the configured font size.
        let style = ui.style_mut();
        style
            .text_styles
            .insert(TextStyle::Body, FontId::proportional(font_size));
        style
            .text_styles
            .insert(TextStyle::Small, FontId::proportional(font_size * 0.8));

        let mut plot = Plot::new("series_plot")
            .x_axis_label(axis_label(x_label, surface.scale(Axis::X)))
            .y_axis_label(axis_label(y_label, surface.scale(Axis::Y)))
            .show_grid(surface.grid())
            .allow_boxed_zoom(true)
            .allow_drag(true)
            .allow_scroll(true)
            .allow_zoom(true);
        if surface.scale(Axis::X) == AxisScale::Log {
            plot = plot.x_axis_formatter(|mark, _range| log_tick(mark.value));
        }
        if surface.scale(Axis::Y) == AxisScale::Log {
            plot = plot.y_axis_formatter(|mark, _range| log_tick(mark.value));
        }
        if let Some(size) = surface.legend_font() {
            plot = plot.legend(
                Legend::default().text_style(TextStyle::Name("legend".into())),
            );
            ui.style_mut().text_styles.insert(
                TextStyle::Name("legend".into()),
                FontId::proportional(size),
            );
        }

        plot.show(ui, |plot_ui| {
            for line in surface.lines().iter().filter(|l| l.visible) {
                draw_line(plot_ui, surface, line);
            }
            if let Some(bounds) = pending {
                let (min, max) = surface.plot_limits(bounds);
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }
        });
    });
}

fn draw_line(plot_ui: &mut egui_plot::PlotUi, surface: &EguiSurface, line: &SurfaceLine) {
    let spec = &line.spec;
    let points = surface.plot_points(line);

    if let Some(style) = spec.line_style {
        plot_ui.line(
            Line::new(PlotPoints::from(points.clone()))
                .name(&spec.label)
                .color(spec.color)
                .width(spec.width)
                .style(egui_style(style, spec.width)),
        );
    }

    if let Some(shape) = spec.marker {
        let marked: Vec<[f64; 2]> = points
            .iter()
            .step_by(spec.mark_every.max(1))
            .copied()
            .collect();
        let mut markers = Points::new(marked)
            .shape(shape)
            .radius(spec.marker_size / 2.0)
            .color(spec.color)
            .filled(true);
        // One legend entry per series.
        if spec.line_style.is_none() {
            markers = markers.name(&spec.label);
        }
        plot_ui.points(markers);
    }

    if let Some(annotations) = &spec.annotations {
        for (p, text) in points.iter().zip(annotations) {
            plot_ui.text(
                Text::new(PlotPoint::new(p[0], p[1]), RichText::new(text).color(spec.color))
                    .anchor(Align2::LEFT_BOTTOM),
            );
        }
    }
}

/// egui_plot has no dash-dot pattern; a long dash stands in for it.
fn egui_style(style: LineStyle, width: f32) -> egui_plot::LineStyle {
    match style {
        LineStyle::Solid => egui_plot::LineStyle::Solid,
        LineStyle::Dashed => egui_plot::LineStyle::Dashed { length: 4.0 * width },
        LineStyle::DashDot => egui_plot::LineStyle::Dashed { length: 8.0 * width },
        LineStyle::Dotted => egui_plot::LineStyle::Dotted { spacing: 2.0 * width },
    }
}

fn axis_label(name: &str, scale: AxisScale) -> String {
    match scale {
        AxisScale::Linear => name.to_string(),
        AxisScale::Log => format!("{name} (log)"),
    }
}

fn log_tick(exponent: f64) -> String {
    let value = 10f64.powf(exponent);
    if (1e-3..1e4).contains(&value.abs()) {
        format!("{value:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        format!("{value:.1e}")
    }
}

/// Colour swatch drawn next to a series row.
pub fn swatch(ui: &mut Ui, color: egui::Color32) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 2.0, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_ticks_are_readable() {
        assert_eq!(log_tick(0.0), "1");
        assert_eq!(log_tick(2.0), "100");
        assert_eq!(log_tick(-1.0), "0.1");
        assert_eq!(log_tick(6.0), "1.0e6");
    }
}
