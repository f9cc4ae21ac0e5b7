use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 18.0;

/// Render the loaded dataset. Short rows are padded with blank cells.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) if ds.has_columns() => ds,
        Some(_) => {
            ui.label("The file has no columns.");
            return;
        }
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view its data  (File → Open…)");
            });
            return;
        }
    };

    if dataset.is_empty() {
        ui.weak("Header only, no data rows.");
    }

    let n_cols = dataset.column_count();
    TableBuilder::new(ui)
        .id_salt("data_table")
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0).clip(true), n_cols)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in &dataset.header {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, dataset.len(), |mut row| {
                let r = row.index();
                for c in 0..n_cols {
                    row.col(|ui: &mut Ui| {
                        ui.label(dataset.cell(r, c).to_string());
                    });
                }
            });
        });
}
