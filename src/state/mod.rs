// src/state/mod.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, ServiceError};

pub mod selection;

pub use selection::{Locale, Selection};

pub const NO_SELECTION_NOTICE: &str = "Please upload a file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Selected,
    Pending,
    ResultPresent,
}

/// Snapshot of the inputs taken when an analysis is started. Later changes
/// to the selection or locale do not reach a request already issued.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub seq: u64,
    pub selection: Selection,
    pub locale: Locale,
}

#[derive(Debug, Clone)]
struct InFlight {
    locale: Locale,
    file_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredResult {
    pub seq: u64,
    pub locale: Locale,
    pub file_name: String,
    pub received_at: DateTime<Local>,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Failed,
    /// A newer analysis already completed.
    Stale,
}

// Core application state
#[derive(Debug, Default)]
pub struct DashboardState {
    selection: Option<Selection>,
    locale: Locale,
    result: Option<StoredResult>,

    next_seq: u64,
    applied_seq: u64,
    in_flight: BTreeMap<u64, InFlight>,

    pub notice: Option<String>,
    pub last_error: Option<String>,
}

impl DashboardState {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Self::default()
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn result(&self) -> Option<&StoredResult> {
        self.result.as_ref()
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.keys().any(|&seq| seq > self.applied_seq)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn phase(&self) -> Phase {
        if self.is_pending() {
            Phase::Pending
        } else if self.result.is_some() {
            Phase::ResultPresent
        } else if self.selection.is_some() {
            Phase::Selected
        } else {
            Phase::Empty
        }
    }

    /// Starts an analysis of the current selection. Without one, raises the
    /// blocking notice and returns `None`.
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest> {
        let Some(selection) = self.selection.clone() else {
            self.notice = Some(NO_SELECTION_NOTICE.to_string());
            return None;
        };

        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight.insert(seq, InFlight {
            locale: self.locale,
            file_name: selection.file_name.clone(),
        });
        info!(seq, locale = %self.locale, file = %selection.file_name, "analysis requested");

        Some(AnalysisRequest {
            seq,
            selection,
            locale: self.locale,
        })
    }

    /// Applies the outcome of request `seq` unless a newer request has
    /// already completed. A failure keeps the previous result on screen.
    pub fn complete_analysis(&mut self, seq: u64, outcome: Result<AnalysisResult, ServiceError>) -> Completion {
        let request = self.in_flight.remove(&seq);

        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "discarding stale analysis completion");
            return Completion::Stale;
        }
        self.applied_seq = seq;

        match outcome {
            Ok(result) => {
                let (locale, file_name) = request
                    .map(|r| (r.locale, r.file_name))
                    .unwrap_or((self.locale, String::new()));
                info!(seq, %locale, "analysis result applied");
                self.result = Some(StoredResult {
                    seq,
                    locale,
                    file_name,
                    received_at: Local::now(),
                    result,
                });
                self.last_error = None;
                Completion::Applied
            }
            Err(err) => {
                warn!(seq, error = %err, "analysis failed");
                self.last_error = Some(err.to_string());
                Completion::Failed
            }
        }
    }

    /// The notice blocks the dashboard until the user acknowledges it.
    pub fn input_blocked(&self) -> bool {
        self.notice.is_some()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::model::fixtures::sample_result;

    fn csv(name: &str) -> Selection {
        Selection::new(name, b"date,revenue,expense\n".to_vec())
    }

    fn result_with_revenue(revenue: f64) -> AnalysisResult {
        AnalysisResult {
            revenue,
            ..sample_result()
        }
    }

    #[test]
    fn starts_empty_with_configured_locale() {
        let state = DashboardState::new(Locale::Hi);
        assert_eq!(state.phase(), Phase::Empty);
        assert_eq!(state.locale(), Locale::Hi);
        assert!(state.result().is_none());
    }

    #[test]
    fn analyze_without_selection_raises_notice_only() {
        let mut state = DashboardState::new(Locale::En);
        assert!(state.begin_analysis().is_none());
        assert_eq!(state.notice.as_deref(), Some(NO_SELECTION_NOTICE));
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.phase(), Phase::Empty);
        assert!(state.input_blocked());

        state.dismiss_notice();
        assert!(state.notice.is_none());
        assert!(!state.input_blocked());
    }

    #[test]
    fn request_snapshots_current_inputs() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));
        state.set_locale(Locale::Hi);
        assert_eq!(state.phase(), Phase::Selected);

        let request = state.begin_analysis().unwrap();
        assert_eq!(request.locale, Locale::Hi);
        assert_eq!(request.selection, csv("jan.csv"));
        assert_eq!(state.phase(), Phase::Pending);

        state.set_selection(csv("feb.csv"));
        state.set_locale(Locale::En);
        assert_eq!(request.selection.file_name, "jan.csv");
        assert_eq!(request.locale, Locale::Hi);
    }

    #[test]
    fn success_replaces_result() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));

        let first = state.begin_analysis().unwrap();
        assert_eq!(state.complete_analysis(first.seq, Ok(result_with_revenue(1.0))), Completion::Applied);
        assert_eq!(state.phase(), Phase::ResultPresent);

        let second = state.begin_analysis().unwrap();
        assert_eq!(state.phase(), Phase::Pending);
        assert_eq!(state.result().unwrap().result.revenue, 1.0);

        state.complete_analysis(second.seq, Ok(result_with_revenue(2.0)));
        let stored = state.result().unwrap();
        assert_eq!(stored.result.revenue, 2.0);
        assert_eq!(stored.seq, second.seq);
        assert_eq!(stored.file_name, "jan.csv");
    }

    #[test]
    fn late_older_response_is_discarded() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));
        let slow = state.begin_analysis().unwrap();
        let fast = state.begin_analysis().unwrap();
        assert!(fast.seq > slow.seq);

        assert_eq!(state.complete_analysis(fast.seq, Ok(result_with_revenue(2.0))), Completion::Applied);
        assert_eq!(state.complete_analysis(slow.seq, Ok(result_with_revenue(1.0))), Completion::Stale);

        assert_eq!(state.result().unwrap().result.revenue, 2.0);
        assert_eq!(state.in_flight(), 0);
        assert_eq!(state.phase(), Phase::ResultPresent);
    }

    #[test]
    fn older_request_still_outstanding_is_not_pending() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));
        let _slow = state.begin_analysis().unwrap();
        let fast = state.begin_analysis().unwrap();
        state.complete_analysis(fast.seq, Ok(sample_result()));

        assert_eq!(state.in_flight(), 1);
        assert_eq!(state.phase(), Phase::ResultPresent);
    }

    #[test]
    fn failure_keeps_previous_result_and_surfaces_message() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));
        let first = state.begin_analysis().unwrap();
        state.complete_analysis(first.seq, Ok(result_with_revenue(1.0)));

        let second = state.begin_analysis().unwrap();
        let outcome = state.complete_analysis(
            second.seq,
            Err(ServiceError::Rejected("CSV must contain date, revenue, expense columns".into())),
        );
        assert_eq!(outcome, Completion::Failed);
        assert_eq!(state.result().unwrap().result.revenue, 1.0);
        assert_eq!(
            state.last_error.as_deref(),
            Some("CSV must contain date, revenue, expense columns")
        );

        let third = state.begin_analysis().unwrap();
        state.complete_analysis(third.seq, Ok(result_with_revenue(3.0)));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn failure_newer_than_success_blocks_the_older_success() {
        let mut state = DashboardState::new(Locale::En);
        state.set_selection(csv("jan.csv"));
        let older = state.begin_analysis().unwrap();
        let newer = state.begin_analysis().unwrap();

        state.complete_analysis(newer.seq, Err(ServiceError::Rejected("bad file".into())));
        assert_eq!(state.complete_analysis(older.seq, Ok(sample_result())), Completion::Stale);
        assert!(state.result().is_none());
    }
}
