// src/workflow/mod.rs
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use eframe::egui;
use tracing::{debug, info, warn};

use crate::analysis::{AnalysisResult, AnalysisService, ServiceError};
use crate::state::{AnalysisRequest, Completion, DashboardState};

struct Finished {
    seq: u64,
    outcome: Result<AnalysisResult, ServiceError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Online(String),
    Offline(String),
}

/// Runs analysis requests on worker threads and hands their outcomes back
/// to the UI thread, which applies them in `poll`.
pub struct Workflow {
    service: Arc<dyn AnalysisService>,
    sender: Sender<Finished>,
    receiver: Receiver<Finished>,
    repaint: Option<egui::Context>,
    status: Arc<Mutex<ServiceStatus>>,
}

impl Workflow {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            service,
            sender,
            receiver,
            repaint: None,
            status: Arc::new(Mutex::new(ServiceStatus::Unknown)),
        }
    }

    /// Workers wake the UI through this context when they finish.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    /// Validates the selection and issues exactly one request. Returns the
    /// sequence number of the issued request.
    pub fn analyze(&self, state: &mut DashboardState) -> Option<u64> {
        let request = state.begin_analysis()?;
        let seq = request.seq;
        self.dispatch(request);
        Some(seq)
    }

    fn dispatch(&self, request: AnalysisRequest) {
        let seq = request.seq;
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let repaint = self.repaint.clone();

        let spawned = thread::Builder::new()
            .name(format!("analyze-{}", seq))
            .spawn(move || {
                let outcome = service.analyze(&request.selection, request.locale);
                // The receiver only goes away when the app is closing.
                let _ = sender.send(Finished { seq, outcome });
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            });

        if let Err(err) = spawned {
            warn!(seq, error = %err, "could not start analysis worker");
            let _ = self.sender.send(Finished {
                seq,
                outcome: Err(ServiceError::Worker(err)),
            });
        }
    }

    /// Applies every completion that arrived since the last call.
    pub fn poll(&self, state: &mut DashboardState) -> usize {
        let mut applied = 0;
        while let Ok(finished) = self.receiver.try_recv() {
            if state.complete_analysis(finished.seq, finished.outcome) != Completion::Stale {
                applied += 1;
            }
        }
        applied
    }

    /// Asks the service for its report and forgets about it.
    pub fn trigger_export(&self) {
        let service = Arc::clone(&self.service);
        let spawned = thread::Builder::new()
            .name("export".to_string())
            .spawn(move || match service.export() {
                Ok(()) => debug!("export requested"),
                Err(err) => warn!(error = %err, "export request failed"),
            });

        if let Err(err) = spawned {
            warn!(error = %err, "could not start export worker");
        }
    }

    /// Checks in the background whether the service answers.
    pub fn check_service(&self) {
        let service = Arc::clone(&self.service);
        let status = Arc::clone(&self.status);
        let repaint = self.repaint.clone();

        let spawned = thread::Builder::new()
            .name("health-check".to_string())
            .spawn(move || {
                let outcome = match service.ping() {
                    Ok(message) => {
                        info!(%message, "analysis service reachable");
                        ServiceStatus::Online(message)
                    }
                    Err(err) => {
                        warn!(error = %err, "analysis service unreachable");
                        ServiceStatus::Offline(err.to_string())
                    }
                };
                if let Ok(mut slot) = status.lock() {
                    *slot = outcome;
                }
                if let Some(ctx) = repaint {
                    ctx.request_repaint();
                }
            });

        if let Err(err) = spawned {
            warn!(error = %err, "could not start service health check");
        }
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or(ServiceStatus::Unknown)
    }
}
