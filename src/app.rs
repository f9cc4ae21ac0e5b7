use eframe::egui;

use crate::analysis::client::AnalysisClient;
use crate::config::Config;
use crate::data::loader;
use crate::data::model::SourceFile;
use crate::state::AppState;
use crate::ui::{panels, results, table};
use crate::worker::Worker;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EpiAlertApp {
    pub state: AppState,
    pub worker: Worker,
}

impl EpiAlertApp {
    pub fn new(ctx: &egui::Context, config: &Config, client: AnalysisClient) -> Self {
        let mut app = Self {
            state: AppState::default(),
            worker: Worker::new(client, Some(ctx.clone())),
        };

        if let Some(path) = &config.file {
            match loader::read_source(path) {
                Ok(file) => app.worker.decode(&mut app.state, file),
                Err(e) => {
                    log::error!("Failed to open {}: {e:#}", path.display());
                    app.state.status_message = Some(format!("Error: {e:#}"));
                }
            }
        }
        app
    }

    /// Files dropped onto the window replace the current dataset.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };

        let source = match (file.bytes, file.path) {
            (Some(bytes), _) => Ok(SourceFile::new(file.name, bytes)),
            (None, Some(path)) => loader::read_source(&path),
            (None, None) => return,
        };
        match source {
            Ok(source) => self.worker.decode(&mut self.state, source),
            Err(e) => {
                log::error!("Failed to read dropped file: {e:#}");
                self.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for EpiAlertApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.worker.poll(&mut self.state);
        self.handle_dropped_files(ctx);

        // ---- Top panel: title, menu, status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.worker);
        });

        // ---- Bottom panel: instructions + footer ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui);
        });

        // ---- Left side panel: file, columns, method, run ----
        egui::SidePanel::left("selection_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.worker);
            });

        // ---- Central panel: result above data table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::result_view(ui, &self.state, self.worker.client().base_url());
            table::data_table(ui, &self.state);
        });
    }
}
