// src/ui/charts.rs
use eframe::egui;
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::analysis::ChartPoint;
use crate::view::CategoryBar;

const REVENUE_STROKE: Color32 = Color32::from_rgb(0x2E, 0x7D, 0x32);
const EXPENSE_STROKE: Color32 = Color32::from_rgb(0xC6, 0x28, 0x28);
const CATEGORY_FILL: Color32 = Color32::from_rgb(0x19, 0x76, 0xD2);

/// Revenue and expense as two filled areas, one category slot per date.
pub fn show_revenue_expense_chart(ui: &mut egui::Ui, series: &[ChartPoint]) {
    let revenue: PlotPoints = series.iter()
        .enumerate()
        .map(|(i, point)| [i as f64, point.revenue])
        .collect();
    let expense: PlotPoints = series.iter()
        .enumerate()
        .map(|(i, point)| [i as f64, point.expense])
        .collect();
    let dates: Vec<String> = series.iter().map(|point| point.date.clone()).collect();

    Plot::new("revenue_expense_chart")
        .height(300.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(0.0)
        .x_axis_formatter(move |x, _, _| slot_label(&dates, x))
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(revenue)
                .name("revenue")
                .color(REVENUE_STROKE)
                .width(2.0)
                .fill(0.0_f32));
            plot_ui.line(Line::new(expense)
                .name("expense")
                .color(EXPENSE_STROKE)
                .width(2.0)
                .fill(0.0_f32));
        });
}

pub fn show_category_chart(ui: &mut egui::Ui, categories: &[CategoryBar]) {
    let names: Vec<String> = categories.iter().map(|category| category.name.clone()).collect();

    Plot::new("expense_categories_chart")
        .height(300.0)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .include_y(0.0)
        .x_axis_formatter(move |x, _, _| slot_label(&names, x))
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = categories.iter()
                .enumerate()
                .map(|(i, category)| {
                    Bar::new(i as f64, category.value)
                        .name(&category.name)
                        .width(0.6)
                        .fill(CATEGORY_FILL)
                })
                .collect();

            plot_ui.bar_chart(BarChart::new(bars)
                .name("value")
                .color(CATEGORY_FILL));
        });
}

/// Axis text for a grid mark: the label of the slot the mark sits on, empty
/// between slots and outside the data.
fn slot_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}
