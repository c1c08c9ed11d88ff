// src/ui/dashboard.rs
use eframe::egui;
use egui::{Color32, RichText};

use crate::state::{DashboardState, StoredResult};
use crate::ui::action_bar::show_action_bar;
use crate::ui::charts::{show_category_chart, show_revenue_expense_chart};
use crate::ui::UiAction;
use crate::view::{CardStyle, DashboardView, MetricCard, Section};

const BADGE_FILL: Color32 = Color32::from_rgb(0x2E, 0x7D, 0x32);

pub fn show_dashboard_view(
    ui: &mut egui::Ui,
    sections: &[Section],
    view: Option<&DashboardView>,
    state: &DashboardState,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    for section in sections {
        match (section, view) {
            (Section::ActionBar, _) => show_action_bar(ui, state, &mut actions),
            (Section::PendingIndicator, _) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Analyzing…");
                });
            }
            (Section::Summary, Some(view)) => show_summary(ui, view, state.result()),
            (Section::CreditScore, Some(view)) => card(ui, "Credit Score", |ui| {
                ui.add(egui::ProgressBar::new(view.credit.fill).text(view.credit.text.as_str()));
            }),
            (Section::Forecast, Some(view)) => card(ui, "Forecast & Benchmark", |ui| {
                ui.horizontal(|ui| {
                    ui.strong("Next Month Revenue:");
                    ui.label(&view.forecast.next_period);
                });
                ui.horizontal(|ui| {
                    ui.strong("Industry:");
                    ui.label(&view.forecast.industry);
                });
            }),
            (Section::Risk, Some(view)) => card(ui, "Risk Level", |ui| {
                ui.strong(&view.risk_level);
            }),
            (Section::FinancialPosition, Some(view)) => card(ui, "Financial Position", |ui| {
                egui::Grid::new("financial_position_grid")
                    .num_columns(2)
                    .spacing([24.0, 4.0])
                    .show(ui, |ui| {
                        for (label, value) in &view.position {
                            ui.label(*label);
                            ui.strong(value);
                            ui.end_row();
                        }
                    });
            }),
            (Section::RisksAndSuggestions, Some(view)) => card(ui, "Risks & Suggestions", |ui| {
                for risk in &view.risks {
                    ui.label(format!("⚠ {}", risk));
                }
                for suggestion in &view.suggestions {
                    ui.label(format!("• {}", suggestion));
                }
            }),
            (Section::TimeSeries, Some(view)) => card(ui, "Revenue vs Expense", |ui| {
                show_revenue_expense_chart(ui, &view.series);
            }),
            (Section::Categories, Some(view)) => {
                if let Some(categories) = &view.categories {
                    card(ui, "Expense Categories", |ui| show_category_chart(ui, categories));
                }
            }
            (Section::Insights, Some(view)) => card(ui, "AI Insights", |ui| {
                ui.add(egui::Label::new(&view.insights).wrap(true));
            }),
            (Section::Export, Some(_)) => {
                ui.vertical_centered(|ui| {
                    if ui.button("Export PDF Report").clicked() {
                        actions.push(UiAction::Export);
                    }
                });
            }
            // Result sections are only composed when a view exists
            (_, None) => {}
        }
        ui.add_space(8.0);
    }

    actions
}

fn card(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.heading(title);
        ui.add_space(4.0);
        add_contents(ui);
    });
}

fn show_summary(ui: &mut egui::Ui, view: &DashboardView, stored: Option<&StoredResult>) {
    if let Some(stored) = stored {
        ui.weak(format!(
            "{} · analyzed {} · {}",
            stored.file_name,
            stored.received_at.format("%Y-%m-%d %H:%M:%S"),
            stored.locale.code()
        ));
    }

    ui.columns(view.cards.len().max(1), |columns| {
        for (column, metric) in columns.iter_mut().zip(&view.cards) {
            column.group(|ui| {
                ui.set_width(ui.available_width());
                show_metric(ui, metric);
            });
        }
    });
}

fn show_metric(ui: &mut egui::Ui, metric: &MetricCard) {
    ui.label(RichText::new(metric.label).heading());
    match metric.style {
        CardStyle::Metric => {
            ui.label(RichText::new(&metric.value).size(22.0).strong());
        }
        CardStyle::Badge => {
            egui::Frame::none()
                .fill(BADGE_FILL)
                .rounding(6.0)
                .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                .show(ui, |ui| {
                    ui.label(RichText::new(&metric.value).color(Color32::WHITE).strong());
                });
        }
    }
}
