// src/view/layout.rs
use super::DashboardView;

/// Dashboard sections in the order they are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ActionBar,
    PendingIndicator,
    Summary,
    CreditScore,
    Forecast,
    Risk,
    FinancialPosition,
    RisksAndSuggestions,
    TimeSeries,
    Categories,
    Insights,
    Export,
}

pub fn compose(view: Option<&DashboardView>, pending: bool, show_pending_indicator: bool) -> Vec<Section> {
    let mut sections = vec![Section::ActionBar];
    if pending && show_pending_indicator {
        sections.push(Section::PendingIndicator);
    }

    let Some(view) = view else {
        return sections;
    };

    sections.extend([Section::Summary, Section::CreditScore, Section::Forecast, Section::Risk]);
    if view.has_position() {
        sections.push(Section::FinancialPosition);
    }
    if view.has_risk_notes() {
        sections.push(Section::RisksAndSuggestions);
    }
    sections.push(Section::TimeSeries);
    if view.categories.is_some() {
        sections.push(Section::Categories);
    }
    sections.extend([Section::Insights, Section::Export]);
    sections
}
