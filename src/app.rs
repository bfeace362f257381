use eframe::egui;

use facs_smooth::AppConfig;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FacsViewerApp {
    pub state: AppState,
}

impl FacsViewerApp {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl FacsViewerApp {
    /// Open the first CSV dropped onto the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        });
        if let Some(path) = dropped {
            log::info!("dropped {}", path.display());
            self.state.open(path);
        }
    }
}

impl eframe::App for FacsViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: parameters and channels ----
        egui::SidePanel::left("channel_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: extrema table ----
        egui::TopBottomPanel::bottom("extrema_panel")
            .default_height(160.0)
            .resizable(true)
            .show(ctx, |ui| {
                plot::extrema_table(ui, &self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::channel_plot(ui, &self.state);
        });
    }
}
