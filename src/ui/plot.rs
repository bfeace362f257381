use eframe::egui::{Color32, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{MAXIMA_COLOR, MINIMA_COLOR};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Channel plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected channel's smoothed curve with its extrema.
pub fn channel_plot(ui: &mut Ui, state: &AppState) {
    let Some((name, channel, frames)) = state.current_channel() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a tracker CSV to view channels  (File → Open…)");
        });
        return;
    };

    // x axis: frame numbers when available, sample index otherwise.
    let x_at = |i: usize| frames.map_or(i as f64, |f| f[i]);

    let color = state
        .colors
        .as_ref()
        .map(|c| c.color_for(name))
        .unwrap_or(Color32::LIGHT_BLUE);

    Plot::new("channel_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Frame")
        .y_axis_label(name)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = channel
                .values
                .iter()
                .enumerate()
                .map(|(i, &v)| [x_at(i), v])
                .collect();
            plot_ui.line(Line::new(points).name(name).color(color).width(1.5));

            if !state.show_extrema {
                return;
            }

            let markers = |indices: &[usize]| -> Vec<[f64; 2]> {
                indices
                    .iter()
                    .filter_map(|&i| channel.values.get(i).map(|&v| [x_at(i), v]))
                    .collect()
            };
            plot_ui.points(
                Points::new(markers(&channel.maxima))
                    .name("maxima")
                    .shape(MarkerShape::Up)
                    .filled(true)
                    .radius(4.0)
                    .color(MAXIMA_COLOR),
            );
            plot_ui.points(
                Points::new(markers(&channel.minima))
                    .name("minima")
                    .shape(MarkerShape::Down)
                    .filled(true)
                    .radius(4.0)
                    .color(MINIMA_COLOR),
            );
        });
}

// ---------------------------------------------------------------------------
// Extrema table (bottom panel)
// ---------------------------------------------------------------------------

/// Keyframe candidates of the selected channel, merged in frame order.
pub fn extrema_table(ui: &mut Ui, state: &AppState) {
    let Some((name, channel, frames)) = state.current_channel() else {
        ui.label("No channel selected.");
        return;
    };

    let mut rows: Vec<(usize, bool)> = channel
        .maxima
        .iter()
        .map(|&i| (i, true))
        .chain(channel.minima.iter().map(|&i| (i, false)))
        .collect();
    rows.sort_unstable();

    ui.strong(format!(
        "{name}: {} maxima, {} minima",
        channel.maxima.len(),
        channel.minima.len()
    ));

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Index");
            });
            header.col(|ui| {
                ui.strong("Frame");
            });
            header.col(|ui| {
                ui.strong("Kind");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let (i, is_max) = rows[row.index()];
                row.col(|ui| {
                    ui.label(i.to_string());
                });
                row.col(|ui| {
                    let frame = frames.map_or(i as f64, |f| f[i]);
                    ui.label(format!("{frame}"));
                });
                row.col(|ui| {
                    if is_max {
                        ui.colored_label(MAXIMA_COLOR, "max");
                    } else {
                        ui.colored_label(MINIMA_COLOR, "min");
                    }
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", channel.values[i]));
                });
            });
        });
}
