//! Client-side workflow for measuring tool-path distances against a remote
//! measurement server: upload, present, plot, reset.

use std::sync::Arc;

use shared::domain::DisplayUnit;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info};

pub mod error;
pub mod image_store;
pub mod plot;
pub mod presenter;
pub mod reset;
pub mod session;
pub mod transport;
pub mod units;
pub mod upload;
pub mod view;

pub use error::{Endpoint, WorkflowError};
pub use image_store::{BlobImageStore, ImageHandle, ImageStore, ImageStoreError, PlotImage};
pub use presenter::{MeasuredResult, Presentation, ResultPresenter};
pub use session::Generation;
pub use transport::{HttpMeasureApi, MeasureApi, UploadRequest};
pub use units::UnitConverter;
pub use view::{FormValues, Panel, SelectedFile, TextSlot, ViewSurface};

use plot::PlotCoordinator;
use reset::ResetController;
use session::SessionState;
use upload::UploadCoordinator;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Diagnostic stream of everything the coordinator did or refused to do.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    UploadCompleted {
        generation: Generation,
        distance_mm: f64,
        points: usize,
    },
    PlotDisplayed {
        generation: Generation,
        handle: ImageHandle,
    },
    Superseded {
        generation: Generation,
        stage: Endpoint,
    },
    Failed {
        generation: Generation,
        endpoint: Option<Endpoint>,
        status: Option<u16>,
        message: String,
    },
    UnitChanged {
        unit: DisplayUnit,
    },
    Reset {
        generation: Generation,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result presented and plot displayed.
    Completed,
    /// A newer submission or a reset arrived first; nothing was applied.
    Superseded,
}

pub struct WorkflowCoordinator {
    uploads: UploadCoordinator,
    plots: PlotCoordinator,
    view: Arc<dyn ViewSurface>,
    session: Mutex<SessionState>,
    events: broadcast::Sender<WorkflowEvent>,
}

impl WorkflowCoordinator {
    pub fn new(
        api: Arc<dyn MeasureApi>,
        view: Arc<dyn ViewSurface>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self::new_with_unit(api, view, images, DisplayUnit::default())
    }

    pub fn new_with_unit(
        api: Arc<dyn MeasureApi>,
        view: Arc<dyn ViewSurface>,
        images: Arc<dyn ImageStore>,
        unit: DisplayUnit,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            uploads: UploadCoordinator::new(api.clone()),
            plots: PlotCoordinator::new(api),
            view,
            session: Mutex::new(SessionState::new(images, unit)),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.events.subscribe()
    }

    pub async fn current_unit(&self) -> DisplayUnit {
        self.session.lock().await.unit()
    }

    pub async fn last_result(&self) -> Option<MeasuredResult> {
        self.session.lock().await.last_result().cloned()
    }

    pub async fn current_plot(&self) -> Option<ImageHandle> {
        self.session.lock().await.plot().cloned()
    }

    /// Reads the form from the view and runs the full workflow.
    pub async fn submit(&self) -> Result<SubmitOutcome, WorkflowError> {
        let form = self.view.read_form();
        self.submit_form(form).await
    }

    pub async fn submit_form(&self, form: FormValues) -> Result<SubmitOutcome, WorkflowError> {
        let generation = self.session.lock().await.advance_generation();
        match self.run_submission(generation, form).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.report_failure(generation, &err).await;
                Err(err)
            }
        }
    }

    /// Re-renders the cached result in `unit`. Never touches the network.
    pub async fn change_unit(&self, unit: DisplayUnit) -> Option<Presentation> {
        let mut session = self.session.lock().await;
        if session.select_unit(unit) {
            info!(%unit, "units: display unit changed");
        }
        let _ = self.events.send(WorkflowEvent::UnitChanged { unit });
        let result = session.last_result()?;
        Some(ResultPresenter::present(self.view.as_ref(), result, unit))
    }

    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        let generation = ResetController::reset(self.view.as_ref(), &mut session);
        info!(%generation, "reset: view and session cleared");
        let _ = self.events.send(WorkflowEvent::Reset { generation });
    }

    async fn run_submission(
        &self,
        generation: Generation,
        form: FormValues,
    ) -> Result<SubmitOutcome, WorkflowError> {
        let request = UploadCoordinator::build_request(form)?;
        info!(
            %generation,
            filename = %request.file.filename,
            start_line = %request.start_line,
            end_line = %request.end_line,
            "upload: submitting"
        );
        let result = self.uploads.submit(request).await?;

        let plot_request = {
            let mut session = self.session.lock().await;
            if !session.is_current(generation) {
                return Ok(self.superseded(generation, Endpoint::Upload));
            }
            self.view.set_text(TextSlot::Error, "");
            self.view.set_visible(Panel::Error, false);
            ResultPresenter::present(self.view.as_ref(), &result, session.unit());

            let _ = self.events.send(WorkflowEvent::UploadCompleted {
                generation,
                distance_mm: result.response.distance_mm,
                points: result.response.coordinates.len(),
            });
            let plot_request = result.response.plot_request();
            session.store_result(result);
            plot_request
        };

        let image = self.plots.fetch(&plot_request).await?;

        let mut session = self.session.lock().await;
        if !session.is_current(generation) {
            return Ok(self.superseded(generation, Endpoint::Plot));
        }
        let handle = PlotCoordinator::show(self.view.as_ref(), session.plot_slot_mut(), image)?;
        info!(%generation, %handle, "plot: displayed");
        let _ = self
            .events
            .send(WorkflowEvent::PlotDisplayed { generation, handle });
        Ok(SubmitOutcome::Completed)
    }

    fn superseded(&self, generation: Generation, stage: Endpoint) -> SubmitOutcome {
        debug!(%generation, %stage, "discarding stale response");
        let _ = self
            .events
            .send(WorkflowEvent::Superseded { generation, stage });
        SubmitOutcome::Superseded
    }

    async fn report_failure(&self, generation: Generation, err: &WorkflowError) {
        let session = self.session.lock().await;
        if !session.is_current(generation) {
            debug!(%generation, error = %err, "ignoring failure of stale submission");
            return;
        }
        error!(%generation, error = %err, "measurement workflow failed");
        self.view.set_text(TextSlot::Error, &err.user_message());
        self.view.set_visible(Panel::Error, true);
        let _ = self.events.send(WorkflowEvent::Failed {
            generation,
            endpoint: err.endpoint(),
            status: err.status(),
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
