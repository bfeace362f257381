use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use facs_smooth::data::filter::validate_window;
use facs_smooth::DatasetKind;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – parameters, datasets, channels
// ---------------------------------------------------------------------------

/// Render the left parameter / channel panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Smoothing");
    ui.separator();

    egui::Grid::new("params").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Window size");
        ui.add(egui::DragValue::new(&mut state.params.window_size).range(1..=101));
        ui.end_row();

        ui.label("Polynomial order");
        ui.add(egui::DragValue::new(&mut state.params.polyorder).range(0..=100));
        ui.end_row();
    });

    let valid = match validate_window(state.params.window_size, state.params.polyorder) {
        Ok(()) => true,
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
            false
        }
    };

    ui.add_space(4.0);
    ui.strong("Datasets");
    for kind in DatasetKind::ALL {
        ui.checkbox(state.params.datasets.flag_mut(kind), kind.label());
    }

    ui.add_space(4.0);
    let can_run = valid && state.source.is_some() && !state.params.datasets.kinds().is_empty();
    if ui.add_enabled(can_run, egui::Button::new("Process")).clicked() {
        state.reprocess();
    }
    ui.separator();

    // ---- Dataset shown ----
    ui.strong("Show");
    let current = state.dataset;
    egui::ComboBox::from_id_salt("show_dataset")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in DatasetKind::ALL {
                // Only datasets holding samples from the current file.
                if !state.store.get(kind).is_some_and(|ds| !ds.is_empty()) {
                    continue;
                }
                if ui.selectable_label(current == kind, kind.label()).clicked() {
                    state.set_dataset(kind);
                }
            }
        });
    ui.checkbox(&mut state.show_extrema, "Show maxima / minima");
    ui.separator();

    // ---- Channel list ----
    let Some(ds) = state.store.get(state.dataset) else {
        ui.label("Dataset not loaded.");
        return;
    };
    if ds.is_empty() {
        ui.label("No samples.");
        return;
    }

    let entries: Vec<(String, usize)> = ds
        .iter()
        .filter(|(_, c)| c.kind().is_smoothed())
        .map(|(name, c)| (name.to_string(), c.maxima.len() + c.minima.len()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (name, extrema) in entries {
                let selected = state.channel.as_deref() == Some(name.as_str());
                let mut text = RichText::new(format!("{name}  ({extrema})"));
                if let Some(colors) = &state.colors {
                    text = text.color(colors.color_for(&name));
                }
                if ui.selectable_label(selected, text).clicked() {
                    state.channel = Some(name);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export JSON…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reset").clicked() {
                state.reset();
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(path), Some(summary)) = (&state.source, &state.summary) {
            ui.label(format!(
                "{}: {} frames, {} rejected",
                path.file_name().unwrap_or_default().to_string_lossy(),
                summary.ingest.accepted,
                summary.ingest.rejected
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tracker CSV")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dataset as JSON")
        .add_filter("JSON", &["json"])
        .set_file_name("facs.json")
        .save_file();

    if let Some(path) = file {
        state.export_json(&path);
    }
}
