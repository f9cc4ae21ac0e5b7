use eframe::egui::{self, Ui};

use crate::state::AppState;

const RESULT_WIDTH: f32 = 600.0;

/// Show the bound result, if any, above the data.
pub fn result_view(ui: &mut Ui, state: &AppState, base_url: &str) {
    let Some(result) = &state.result else {
        return;
    };

    ui.heading(result.label());
    if state.file_name() != Some(result.source_file.as_str()) {
        ui.weak(format!("from {}", result.source_file));
    }
    ui.add(egui::Image::from_uri(result.display_uri(base_url)).max_width(RESULT_WIDTH));
    ui.separator();
}
