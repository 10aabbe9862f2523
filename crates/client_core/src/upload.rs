//! Packages the form into an upload request and interprets the reply.

use std::sync::Arc;

use shared::domain::LineNumber;
use tracing::info;

use crate::{
    error::WorkflowError,
    presenter::MeasuredResult,
    transport::{MeasureApi, UploadRequest},
    view::FormValues,
};

fn parse_line(field: &'static str, value: &str) -> Result<LineNumber, WorkflowError> {
    value
        .trim()
        .parse::<i64>()
        .map(LineNumber)
        .map_err(|_| WorkflowError::InvalidLineNumber {
            field,
            value: value.to_string(),
        })
}

pub struct UploadCoordinator {
    api: Arc<dyn MeasureApi>,
}

impl UploadCoordinator {
    pub fn new(api: Arc<dyn MeasureApi>) -> Self {
        Self { api }
    }

    /// Line numbers must be integers but are otherwise passed through as
    /// typed: the server owns range checking.
    pub fn build_request(form: FormValues) -> Result<UploadRequest, WorkflowError> {
        let file = form.file.ok_or(WorkflowError::NoFileSelected)?;
        Ok(UploadRequest {
            file,
            start_line: parse_line("start_line", &form.start_line)?,
            end_line: parse_line("end_line", &form.end_line)?,
        })
    }

    pub async fn submit(&self, request: UploadRequest) -> Result<MeasuredResult, WorkflowError> {
        let response = self.api.upload(&request).await?;
        info!(
            distance_mm = response.distance_mm,
            points = response.coordinates.len(),
            is_ncg = response.is_ncg,
            "upload: measurement received"
        );
        Ok(MeasuredResult {
            start_line: request.start_line,
            end_line: request.end_line,
            response,
        })
    }
}

#[cfg(test)]
#[path = "tests/upload_tests.rs"]
mod tests;
