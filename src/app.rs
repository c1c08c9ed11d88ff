// src/app.rs
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use eframe::egui;
use rfd::FileDialog;
use tracing::{info, warn};

use crate::analysis::AnalysisService;
use crate::config::Settings;
use crate::file::{load_selection, selection_from_drop};
use crate::state::DashboardState;
use crate::ui::dashboard::show_dashboard_view;
use crate::ui::{admit_actions, UiAction};
use crate::view::{compose, DashboardView};
use crate::workflow::{ServiceStatus, Workflow};

const EXTRA_FONT: &str = "extra";

pub struct DashboardApp {
    state: DashboardState,
    workflow: Workflow,
    settings: Settings,
    // Projection of the stored result, keyed by its sequence number
    view: Option<(u64, DashboardView)>,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, service: Arc<dyn AnalysisService>) -> Self {
        if let Some(path) = &settings.font_path {
            match install_font(&cc.egui_ctx, path) {
                Ok(()) => info!(path = %path.display(), "loaded extra font"),
                Err(e) => warn!(error = %e, "extra font not loaded"),
            }
        }

        let workflow = Workflow::new(service).with_repaint(cc.egui_ctx.clone());
        workflow.check_service();

        Self {
            state: DashboardState::new(settings.default_locale),
            workflow,
            settings,
            view: None,
        }
    }

    fn pick_file(&mut self) {
        let file_dialog = FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .set_title("Choose Financial Report");

        if let Some(path) = file_dialog.pick_file() {
            self.select_path(&path);
        }
    }

    fn select_path(&mut self, path: &Path) {
        match load_selection(path) {
            Ok(selection) => {
                info!(file = %selection.file_name, bytes = selection.len(), "file selected");
                self.state.set_selection(selection);
            }
            Err(e) => {
                self.state.last_error = Some(format!("Error reading file: {:#}", e));
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if self.state.input_blocked() {
            return;
        }
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Only one selection exists at a time; the last file dropped wins.
        if let Some(file) = dropped.last() {
            match selection_from_drop(file) {
                Ok(selection) => self.state.set_selection(selection),
                Err(e) => self.state.last_error = Some(format!("Error reading file: {:#}", e)),
            }
        }
    }

    fn refresh_view(&mut self) {
        let Some(stored) = self.state.result() else {
            self.view = None;
            return;
        };
        if self.view.as_ref().map(|(seq, _)| *seq) != Some(stored.seq) {
            let view = DashboardView::project(&stored.result, &self.settings.currency_symbol);
            self.view = Some((stored.seq, view));
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::PickFile => self.pick_file(),
            UiAction::Analyze => {
                self.workflow.analyze(&mut self.state);
            }
            UiAction::SetLocale(locale) => self.state.set_locale(locale),
            UiAction::Export => self.workflow.trigger_export(),
        }
    }

    fn show_header(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading("Financial Health Dashboard");
                ui.weak("Business performance & risk analysis");
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                match self.workflow.service_status() {
                    ServiceStatus::Unknown => {
                        ui.weak("service: checking…");
                    }
                    ServiceStatus::Online(message) => {
                        ui.colored_label(egui::Color32::from_rgb(0x2E, 0x7D, 0x32), "service: online")
                            .on_hover_text(message);
                    }
                    ServiceStatus::Offline(reason) => {
                        ui.colored_label(egui::Color32::from_rgb(0xC6, 0x28, 0x28), "service: offline")
                            .on_hover_text(reason);
                    }
                }
            });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.workflow.poll(&mut self.state);
        self.handle_dropped_files(ctx);
        self.refresh_view();

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.show_header(ui);
        });

        let sections = compose(
            self.view.as_ref().map(|(_, view)| view),
            self.state.is_pending(),
            self.settings.show_pending_indicator,
        );

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_source("dashboard_scroll")
                    .show(ui, |ui| {
                        ui.add_enabled_ui(!self.state.input_blocked(), |ui| {
                            show_dashboard_view(
                                ui,
                                &sections,
                                self.view.as_ref().map(|(_, view)| view),
                                &self.state,
                            )
                        })
                        .inner
                    })
                    .inner
            })
            .inner;

        for action in admit_actions(&self.state, actions) {
            self.apply(action);
        }

        // Blocking notice for an analyze attempt without a file
        if let Some(notice) = self.state.notice.clone() {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(&notice);
                    if ui.button("OK").clicked() {
                        self.state.dismiss_notice();
                    }
                });
        }

        let error_msg = self.state.last_error.clone();
        if let Some(error) = error_msg {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&error);
                    if ui.button("OK").clicked() {
                        self.state.dismiss_error();
                    }
                });
        }

        if self.state.in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

fn install_font(ctx: &egui::Context, path: &Path) -> Result<()> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read font {}", path.display()))?;

    let mut fonts = egui::FontDefinitions::default();
    fonts.font_data.insert(EXTRA_FONT.to_owned(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families
            .entry(family)
            .or_default()
            .push(EXTRA_FONT.to_owned());
    }
    ctx.set_fonts(fonts);
    Ok(())
}
