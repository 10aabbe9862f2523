//! HTTP access to the measurement server.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use shared::{
    domain::LineNumber,
    error::ApiErrorBody,
    protocol::{PlotRequest, UploadResponse},
};
use tracing::debug;
use url::Url;

use crate::{
    error::{Endpoint, WorkflowError},
    image_store::PlotImage,
    view::SelectedFile,
};

pub const DEFAULT_UPLOAD_PATH: &str = "/api/upload";
pub const DEFAULT_PLOT_PATH: &str = "/api/plot";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: SelectedFile,
    pub start_line: LineNumber,
    pub end_line: LineNumber,
}

#[async_trait]
pub trait MeasureApi: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, WorkflowError>;
    async fn plot(&self, request: &PlotRequest) -> Result<PlotImage, WorkflowError>;
}

pub struct HttpMeasureApi {
    http: Client,
    upload_url: Url,
    plot_url: Url,
}

impl HttpMeasureApi {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_endpoints(server_url, DEFAULT_UPLOAD_PATH, DEFAULT_PLOT_PATH, None)
    }

    pub fn with_endpoints(
        server_url: &str,
        upload_path: &str,
        plot_path: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base = Url::parse(server_url)
            .with_context(|| format!("invalid server url '{server_url}'"))?;
        let upload_url = base
            .join(upload_path)
            .with_context(|| format!("invalid upload path '{upload_path}'"))?;
        let plot_url = base
            .join(plot_path)
            .with_context(|| format!("invalid plot path '{plot_path}'"))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;

        Ok(Self {
            http,
            upload_url,
            plot_url,
        })
    }

    pub fn upload_url(&self) -> &Url {
        &self.upload_url
    }

    pub fn plot_url(&self) -> &Url {
        &self.plot_url
    }
}

async fn ensure_success(endpoint: Endpoint, response: Response) -> Result<Response, WorkflowError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    Err(WorkflowError::HttpStatus {
        endpoint,
        status: status.as_u16(),
        message: ApiErrorBody::message_from_body(&body),
    })
}

fn network(endpoint: Endpoint) -> impl FnOnce(reqwest::Error) -> WorkflowError {
    move |source| WorkflowError::Network { endpoint, source }
}

/// Sniffs the payload so that an HTML error page served with 200 is not
/// handed to the view as an image.
pub fn decode_plot_image(bytes: Vec<u8>) -> Result<PlotImage, WorkflowError> {
    let format = image::guess_format(&bytes).map_err(|err| WorkflowError::Decode {
        endpoint: Endpoint::Plot,
        reason: err.to_string(),
    })?;
    Ok(PlotImage {
        bytes,
        mime_type: format.to_mime_type(),
    })
}

#[async_trait]
impl MeasureApi for HttpMeasureApi {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadResponse, WorkflowError> {
        let file = Part::bytes(request.file.bytes.clone()).file_name(request.file.filename.clone());
        let form = Form::new()
            .part("file", file)
            .text("start_line", request.start_line.to_string())
            .text("end_line", request.end_line.to_string());

        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(network(Endpoint::Upload))?;
        let response = ensure_success(Endpoint::Upload, response).await?;
        let body = response.bytes().await.map_err(network(Endpoint::Upload))?;
        debug!(size_bytes = body.len(), "upload: response body received");

        serde_json::from_slice(&body).map_err(|err| WorkflowError::Decode {
            endpoint: Endpoint::Upload,
            reason: err.to_string(),
        })
    }

    async fn plot(&self, request: &PlotRequest) -> Result<PlotImage, WorkflowError> {
        let response = self
            .http
            .post(self.plot_url.clone())
            .json(request)
            .send()
            .await
            .map_err(network(Endpoint::Plot))?;
        let response = ensure_success(Endpoint::Plot, response).await?;
        let body = response.bytes().await.map_err(network(Endpoint::Plot))?;
        debug!(size_bytes = body.len(), "plot: image received");

        decode_plot_image(body.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
