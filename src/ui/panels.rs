use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::method::Method;
use crate::data::loader::{self, SUPPORTED_EXTENSIONS};
use crate::state::{AppState, Phase};
use crate::worker::Worker;

const INSTRUCTIONS: [&str; 4] = [
    "Step 1: Upload the dataset file.",
    "Step 2: Select the desired method for analysis.",
    "Step 3: Click the \"Run\" button to start the process.",
    "Step 4: View the results displayed below.",
];

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the file / column / method controls and the Run button.
pub fn side_panel(ui: &mut Ui, state: &mut AppState, worker: &Worker) {
    // ---- File ----
    if ui.button("Choose file…").clicked() {
        open_file_dialog(state, worker);
    }
    ui.horizontal(|ui: &mut Ui| {
        ui.label(state.file_name().unwrap_or("No file chosen"));
        if let Some(name) = &state.loading {
            ui.spinner();
            ui.weak(format!("reading {name}"));
        }
    });
    ui.separator();

    // ---- Column pickers (only when the file has columns) ----
    let header = state
        .dataset
        .as_ref()
        .map(|ds| ds.header.clone())
        .unwrap_or_default();

    if !header.is_empty() {
        if let Some(index) = column_picker(ui, "x_column", "X Column", &header, state.selection.primary) {
            if let Err(e) = state.set_primary(index) {
                state.status_message = Some(e.to_string());
            }
        }

        if state.secondary_visible() {
            if let Some(index) = column_picker(ui, "y_column", "Y Column", &header, state.selection.secondary) {
                if let Err(e) = state.set_secondary(index) {
                    state.status_message = Some(e.to_string());
                }
            }
        }
        ui.add_space(8.0);
    }

    // ---- Method picker ----
    ui.strong("Method");
    let current = state.selection.method.map(Method::name).unwrap_or("");
    egui::ComboBox::from_id_salt("method")
        .width(300.0)
        .selected_text(current)
        .show_ui(ui, |ui: &mut Ui| {
            for method in Method::ALL {
                if ui
                    .selectable_label(state.selection.method == Some(method), method.name())
                    .clicked()
                {
                    state.set_method(method);
                }
            }
        });
    ui.add_space(12.0);

    // ---- Run ----
    let submitting = state.phase() == Phase::Submitting;
    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(!submitting, egui::Button::new("Run")).clicked() {
            worker.submit(state);
        }
        if let Some(pending) = state.submission() {
            ui.spinner();
            ui.weak(format!("{} on {}", pending.method, pending.source_file));
        }
    });
}

/// Combo box over header positions. Returns the newly picked position.
fn column_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    header: &[String],
    selected: Option<usize>,
) -> Option<usize> {
    let mut picked = None;
    ui.strong(label);
    let selected_text = selected
        .and_then(|i| header.get(i))
        .cloned()
        .unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .width(300.0)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            for (index, name) in header.iter().enumerate() {
                if ui.selectable_label(selected == Some(index), name).clicked() {
                    picked = Some(index);
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title, menu and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, worker: &Worker) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new("EpiAlertR").strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            // No standalone package is published yet.
            ui.label(RichText::new("Download the Standalone EpiAlertR Package").underline().color(Color32::LIGHT_BLUE));
        });
    });

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state, worker);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} rows, {} columns", ds.len(), ds.column_count()));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui) {
    egui::CollapsingHeader::new(RichText::new("Instructions").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for step in INSTRUCTIONS {
                ui.small(step);
            }
        });
    ui.vertical_centered(|ui: &mut Ui| {
        ui.small("All rights reserved © 2025 Tata Institute for Genetics and Society");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState, worker: &Worker) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", SUPPORTED_EXTENSIONS)
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .add_filter("Spreadsheets", &["xls", "xlsx", "xlsm", "xlsb", "ods"])
        .pick_file();

    if let Some(path) = file {
        match loader::read_source(&path) {
            Ok(source) => worker.decode(state, source),
            Err(e) => {
                log::error!("Failed to open file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
