// src/ui/action_bar.rs
use eframe::egui;
use crate::state::{DashboardState, Locale, Phase};
use crate::ui::UiAction;

pub fn show_action_bar(ui: &mut egui::Ui, state: &DashboardState, actions: &mut Vec<UiAction>) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            if ui.button("📂 Choose File…").clicked() {
                actions.push(UiAction::PickFile);
            }

            match state.selection() {
                Some(selection) => ui.label(&selection.file_name),
                None => ui.weak("No file chosen"),
            };
            if state.phase() == Phase::Selected {
                ui.weak("(not analyzed yet)");
            }

            ui.add_space(8.0);

            if ui.button("Analyze Report").clicked() {
                actions.push(UiAction::Analyze);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                // right_to_left lays out in reverse
                for locale in Locale::ALL.into_iter().rev() {
                    if ui.selectable_label(state.locale() == locale, locale.button_label()).clicked() {
                        actions.push(UiAction::SetLocale(locale));
                    }
                }
            });
        });
    });
}
