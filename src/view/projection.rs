// src/view/projection.rs
//! Shapes an [`AnalysisResult`] into what each dashboard widget draws.
//! Everything here is pure: the same result always projects to the same view.

use crate::analysis::{AnalysisResult, ChartPoint, ExpenseCategories};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStyle {
    Metric,
    Badge,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub style: CardStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditBar {
    /// Share of the bar to fill; the score read as a percentage.
    pub fill: f32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPanel {
    pub next_period: String,
    pub industry: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub cards: Vec<MetricCard>,
    pub credit: CreditBar,
    pub forecast: ForecastPanel,
    pub risk_level: String,
    pub series: Vec<ChartPoint>,
    /// `None` when the service sent no categories, or an empty map.
    pub categories: Option<Vec<CategoryBar>>,
    pub position: Vec<(&'static str, String)>,
    pub risks: Vec<String>,
    pub suggestions: Vec<String>,
    pub insights: String,
}

impl DashboardView {
    pub fn project(result: &AnalysisResult, currency: &str) -> Self {
        let money = |value: f64| format!("{}{}", currency, format_number(value));

        let cards = vec![
            MetricCard { label: "Revenue", value: money(result.revenue), style: CardStyle::Metric },
            MetricCard { label: "Expense", value: money(result.expense), style: CardStyle::Metric },
            MetricCard { label: "Profit", value: money(result.profit), style: CardStyle::Metric },
            MetricCard { label: "Health Score", value: out_of_hundred(result.health_score), style: CardStyle::Badge },
        ];

        let credit = CreditBar {
            fill: result.credit_score as f32 / 100.0,
            text: out_of_hundred(result.credit_score),
        };

        let forecast = ForecastPanel {
            next_period: money(result.forecast),
            industry: format!("{} ({})", result.industry, result.benchmark),
        };

        let mut position = Vec::new();
        if let Some(margin) = result.margin {
            position.push(("Profit Margin", format!("{}%", format_number(margin))));
        }
        let amounts = [
            ("Receivables", result.receivable),
            ("Payables", result.payable),
            ("Inventory", result.inventory),
            ("Loans", result.loan_total),
            ("GST Collected", result.gst_collected),
            ("GST Paid", result.gst_paid),
        ];
        for (label, amount) in amounts {
            if let Some(amount) = amount {
                position.push((label, money(amount)));
            }
        }

        Self {
            cards,
            credit,
            forecast,
            risk_level: result.risk_level.clone(),
            series: result.chart_data.clone(),
            categories: result.expense_categories.as_ref().and_then(category_bars),
            position,
            risks: result.risks.clone(),
            suggestions: result.suggestions.clone(),
            insights: result.ai_insights.clone(),
        }
    }

    pub fn has_position(&self) -> bool {
        !self.position.is_empty()
    }

    pub fn has_risk_notes(&self) -> bool {
        !self.risks.is_empty() || !self.suggestions.is_empty()
    }
}

/// One bar per category, in the order the service listed them.
pub fn category_bars(categories: &ExpenseCategories) -> Option<Vec<CategoryBar>> {
    if categories.is_empty() {
        return None;
    }
    Some(categories
        .iter()
        .map(|(name, value)| CategoryBar { name: name.to_string(), value })
        .collect())
}

fn out_of_hundred(score: i32) -> String {
    format!("{}/100", score)
}

/// Whole amounts print without a fractional part: `100000`, `1250.5`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // avoids "-0"
        return "0".to_string();
    }
    format!("{}", value)
}
