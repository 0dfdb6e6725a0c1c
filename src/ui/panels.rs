use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – dataset toggles
// ---------------------------------------------------------------------------

/// Render the left dataset panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Datasets");
    ui.separator();

    if state.datasets.is_empty() {
        ui.label("No dataset processed.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, dataset) in state.datasets.iter().enumerate() {
                let color = state.colors.color_for(idx);
                let mut checked = state.visible.contains(&idx);
                let text = RichText::new(&dataset.name).color(color);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(idx);
                }

                let flow = &dataset.cutflow;
                egui::CollapsingHeader::new(format!(
                    "{} / {} selected",
                    flow.selected, flow.total
                ))
                .id_salt(idx)
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    ui.label(format!("lepton cut: {}", flow.lepton));
                    ui.label(format!("jet cut: {}", flow.jets));
                    ui.label(format!("b-tag cut: {}", flow.btag));
                    ui.label(format!("with trijet: {}", flow.selected));
                });
            }
        });

    if let Some(idx) = toggled {
        state.toggle(idx);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        let flow = state.visible_cutflow();
        ui.label(format!(
            "Total number of events: {}   Number of selected events: {}",
            flow.total, flow.selected
        ));

        ui.separator();

        if ui
            .selectable_label(state.show_flow_bins, "Under/overflow")
            .clicked()
        {
            state.show_flow_bins = !state.show_flow_bins;
        }
    });
}
