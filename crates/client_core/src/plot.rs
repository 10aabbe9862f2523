//! Requests the rendered path and swaps it onto the plot surface.

use std::sync::Arc;

use shared::protocol::PlotRequest;
use tracing::info;

use crate::{
    error::WorkflowError,
    image_store::{ImageHandle, PlotImage, PlotSlot},
    transport::MeasureApi,
    view::{Panel, ViewSurface},
};

pub struct PlotCoordinator {
    api: Arc<dyn MeasureApi>,
}

impl PlotCoordinator {
    pub fn new(api: Arc<dyn MeasureApi>) -> Self {
        Self { api }
    }

    pub async fn fetch(&self, request: &PlotRequest) -> Result<PlotImage, WorkflowError> {
        let image = self.api.plot(request).await?;
        info!(
            size_bytes = image.bytes.len(),
            mime_type = image.mime_type,
            "plot: image received"
        );
        Ok(image)
    }

    /// The previous handle is released inside the slot before the new one is
    /// attached to the view.
    pub fn show(
        view: &dyn ViewSurface,
        slot: &mut PlotSlot,
        image: PlotImage,
    ) -> Result<ImageHandle, WorkflowError> {
        let handle = slot.replace(image)?.clone();
        view.set_image_source(Some(&handle));
        view.set_visible(Panel::Plot, true);
        Ok(handle)
    }
}
