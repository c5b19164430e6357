//! ResearchController owns the lifecycle of buyer-discovery submissions for
//! one user session.
//!
//! The observable lifecycle is a small state machine:
//! `Idle → Validating → Requesting → Succeeded | Failed`, and a finished
//! controller accepts the next `submit` to run the same path again. At most
//! one submission is in flight at a time; concurrent calls are rejected with
//! [`ResearchError::RequestInFlight`] without disturbing the one that is
//! running.
//!
//! The controller holds its state behind a `std::sync::Mutex` that is locked
//! only for short, non-awaiting sections, so it can be shared across tasks as
//! a plain `Arc<ResearchController>`.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::client::ResearchService;
use crate::error::ResearchError;
use crate::models::{BuyerId, BuyerProspect, ResearchRequest, ResearchResult};
use crate::summary::DiscoverySummary;

/// Observable phase of the current (or most recent) submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResearchPhase {
    /// Nothing has been submitted yet.
    #[default]
    Idle,
    /// Input is being validated; no request has been issued.
    Validating,
    /// Exactly one request is outstanding.
    Requesting,
    /// The last submission stored a result.
    Succeeded,
    /// The last submission failed; the error is kept for display.
    Failed(ResearchError),
}

impl ResearchPhase {
    /// True between acceptance of a submission and its resolution.
    pub fn is_busy(&self) -> bool {
        matches!(self, ResearchPhase::Validating | ResearchPhase::Requesting)
    }
}

/// Mediates between a presentation surface and the research service.
pub struct ResearchController {
    service: Arc<dyn ResearchService>,
    products: Option<Vec<String>>,
    state: Mutex<ControllerState>,
}

#[derive(Default)]
struct ControllerState {
    phase: ResearchPhase,
    outcome: Option<StoredResult>,
    selected: Option<BuyerId>,
}

struct StoredResult {
    result: ResearchResult,
    received_at: DateTime<Utc>,
}

impl ResearchController {
    /// Create a controller over any [`ResearchService`] implementation.
    pub fn new(service: Arc<dyn ResearchService>) -> Self {
        Self {
            service,
            products: None,
            state: Mutex::new(ControllerState::default()),
        }
    }

    /// Attach a product-category hint that is carried on every request.
    pub fn with_products(mut self, products: Vec<String>) -> Self {
        self.products = Some(products);
        self
    }

    /// Submit a raw website URL for buyer discovery.
    ///
    /// The canonical observation point is [`phase`](Self::phase); the
    /// returned `Result` mirrors it for callers that await the submission.
    /// On success the previous result is replaced wholesale and any prospect
    /// selection is cleared. Validation failures never reach the network.
    pub async fn submit(&self, raw_url: &str) -> Result<(), ResearchError> {
        self.begin()?;
        let request_id = Uuid::new_v4();

        let request = match ResearchRequest::from_website(raw_url, self.products.clone()) {
            Ok(request) => request,
            Err(err) => {
                warn!(%request_id, error = %err, "rejected research submission");
                self.fail(err.clone());
                return Err(err);
            }
        };

        info!(
            %request_id,
            company = %request.company_name,
            website = %request.company_website,
            "dispatching research request"
        );
        self.set_phase(ResearchPhase::Requesting);

        match self.service.discover_buyers(&request).await {
            Ok(result) => {
                info!(
                    %request_id,
                    buyers = result.discovered_buyers.len(),
                    "research request succeeded"
                );
                self.succeed(result);
                Ok(())
            }
            Err(err) => {
                warn!(%request_id, error = %err, "research request failed");
                self.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Focus one prospect for detail display. String and numeric forms of
    /// the same integer id select the same prospect; an id that matches
    /// nothing simply leaves [`selected_buyer`](Self::selected_buyer) empty.
    pub fn select_buyer(&self, id: impl Into<BuyerId>) {
        self.state.lock().unwrap().selected = Some(id.into());
    }

    /// Clear the focused prospect.
    pub fn clear_selection(&self) {
        self.state.lock().unwrap().selected = None;
    }

    pub fn phase(&self) -> ResearchPhase {
        self.state.lock().unwrap().phase.clone()
    }

    /// Result of the most recent successful submission. Stays available
    /// while a newer submission is still running.
    pub fn result(&self) -> Option<ResearchResult> {
        self.state
            .lock()
            .unwrap()
            .outcome
            .as_ref()
            .map(|o| o.result.clone())
    }

    /// When the stored result was received.
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.state
            .lock()
            .unwrap()
            .outcome
            .as_ref()
            .map(|o| o.received_at)
    }

    /// The focused prospect, resolved against the stored result.
    pub fn selected_buyer(&self) -> Option<BuyerProspect> {
        let state = self.state.lock().unwrap();
        let outcome = state.outcome.as_ref()?;
        let id = state.selected.as_ref()?;
        outcome.result.buyer(id).cloned()
    }

    /// Headline numbers over the stored result, if any.
    pub fn summary(&self) -> Option<DiscoverySummary> {
        self.state
            .lock()
            .unwrap()
            .outcome
            .as_ref()
            .map(|o| o.result.summary())
    }

    /// Accept a new submission unless one is already outstanding.
    fn begin(&self) -> Result<(), ResearchError> {
        let mut state = self.state.lock().unwrap();
        if state.phase.is_busy() {
            return Err(ResearchError::RequestInFlight);
        }
        state.phase = ResearchPhase::Validating;
        Ok(())
    }

    fn set_phase(&self, phase: ResearchPhase) {
        self.state.lock().unwrap().phase = phase;
    }

    fn succeed(&self, result: ResearchResult) {
        let mut state = self.state.lock().unwrap();
        state.phase = ResearchPhase::Succeeded;
        state.outcome = Some(StoredResult {
            result,
            received_at: Utc::now(),
        });
        // the previous selection pointed into the replaced list
        state.selected = None;
    }

    fn fail(&self, err: ResearchError) {
        self.state.lock().unwrap().phase = ResearchPhase::Failed(err);
    }
}
