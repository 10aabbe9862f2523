use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    image_store::ImageHandle,
    view::{FormValues, Panel, SelectedFile, TextSlot, ViewSurface},
};

/// Smallest byte string `image::guess_format` recognizes as PNG.
pub(crate) const TEST_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[derive(Default)]
struct ViewState {
    form: FormValues,
    texts: HashMap<TextSlot, String>,
    visible: HashSet<Panel>,
    image: Option<ImageHandle>,
    form_clears: usize,
}

/// View double that records the last value written to every slot.
#[derive(Default)]
pub(crate) struct RecordingView {
    state: Mutex<ViewState>,
}

impl RecordingView {
    pub(crate) fn with_form(form: FormValues) -> Self {
        let view = Self::default();
        view.set_form(form);
        view
    }

    pub(crate) fn set_form(&self, form: FormValues) {
        self.state.lock().expect("view").form = form;
    }

    pub(crate) fn text(&self, slot: TextSlot) -> String {
        self.state
            .lock()
            .expect("view")
            .texts
            .get(&slot)
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn is_visible(&self, panel: Panel) -> bool {
        self.state.lock().expect("view").visible.contains(&panel)
    }

    pub(crate) fn image(&self) -> Option<ImageHandle> {
        self.state.lock().expect("view").image.clone()
    }

    pub(crate) fn form_clears(&self) -> usize {
        self.state.lock().expect("view").form_clears
    }

    pub(crate) fn form(&self) -> FormValues {
        self.state.lock().expect("view").form.clone()
    }
}

impl ViewSurface for RecordingView {
    fn read_form(&self) -> FormValues {
        self.form()
    }

    fn clear_form(&self) {
        let mut state = self.state.lock().expect("view");
        state.form = FormValues::default();
        state.form_clears += 1;
    }

    fn set_text(&self, slot: TextSlot, text: &str) {
        self.state
            .lock()
            .expect("view")
            .texts
            .insert(slot, text.to_string());
    }

    fn set_visible(&self, panel: Panel, visible: bool) {
        let mut state = self.state.lock().expect("view");
        if visible {
            state.visible.insert(panel);
        } else {
            state.visible.remove(&panel);
        }
    }

    fn set_image_source(&self, source: Option<&ImageHandle>) {
        self.state.lock().expect("view").image = source.cloned();
    }
}

pub(crate) fn sample_form(start_line: i64, end_line: i64) -> FormValues {
    FormValues::new(
        SelectedFile::new("part.ngc", b"G00 X0 Y0\nG01 X10 Y0\n".to_vec()),
        start_line,
        end_line,
    )
}

pub(crate) fn upload_body(distance: f64) -> Value {
    json!({
        "distance": distance,
        "coordinates": [[0, 0.0, 0.0, null, null], [1, distance, 0.0, null, null]],
        "width": 5,
        "length": 10,
        "is_ncg": false
    })
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Status(u16, String),
    Image(Vec<u8>),
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Json(body) => Json(body).into_response(),
            Reply::Status(status, body) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            )
                .into_response(),
            Reply::Image(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        }
    }
}

#[derive(Debug, Clone)]
struct Script {
    delay: Duration,
    reply: Reply,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RecordedUpload {
    pub filename: Option<String>,
    pub file: Vec<u8>,
    pub start_line: String,
    pub end_line: String,
}

#[derive(Default)]
struct FakeServerState {
    uploads: Vec<RecordedUpload>,
    plots: Vec<Value>,
    upload_scripts: HashMap<String, Script>,
    plot_scripts: HashMap<String, Script>,
}

/// Scriptable stand-in for the measurement server. Upload replies are keyed
/// by `start_line`, plot replies by the serialized `coordinates`.
#[derive(Clone, Default)]
pub(crate) struct FakeServer {
    state: Arc<Mutex<FakeServerState>>,
}

impl FakeServer {
    pub(crate) fn on_upload(&self, start_line: i64, delay: Duration, reply: Reply) -> &Self {
        self.state
            .lock()
            .expect("server")
            .upload_scripts
            .insert(start_line.to_string(), Script { delay, reply });
        self
    }

    pub(crate) fn on_plot(&self, coordinates: &Value, delay: Duration, reply: Reply) -> &Self {
        self.state
            .lock()
            .expect("server")
            .plot_scripts
            .insert(coordinates.to_string(), Script { delay, reply });
        self
    }

    pub(crate) fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.lock().expect("server").uploads.clone()
    }

    pub(crate) fn plots(&self) -> Vec<Value> {
        self.state.lock().expect("server").plots.clone()
    }

    fn upload_script(&self, upload: RecordedUpload) -> Script {
        let mut state = self.state.lock().expect("server");
        let script = state
            .upload_scripts
            .get(upload.start_line.trim())
            .cloned()
            .unwrap_or(Script {
                delay: Duration::ZERO,
                reply: Reply::Json(upload_body(12.3456)),
            });
        state.uploads.push(upload);
        script
    }

    fn plot_script(&self, body: Value) -> Script {
        let mut state = self.state.lock().expect("server");
        let key = body["coordinates"].to_string();
        let script = state.plot_scripts.get(&key).cloned().unwrap_or(Script {
            delay: Duration::ZERO,
            reply: Reply::Image(TEST_PNG.to_vec()),
        });
        state.plots.push(body);
        script
    }
}

async fn handle_upload(State(server): State<FakeServer>, mut multipart: Multipart) -> Reply {
    let mut upload = RecordedUpload::default();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap_or_default();
        match name.as_str() {
            "file" => {
                upload.filename = filename;
                upload.file = data.to_vec();
            }
            "start_line" => upload.start_line = String::from_utf8_lossy(&data).into_owned(),
            "end_line" => upload.end_line = String::from_utf8_lossy(&data).into_owned(),
            _ => {}
        }
    }
    let script = server.upload_script(upload);
    tokio::time::sleep(script.delay).await;
    script.reply
}

async fn handle_plot(State(server): State<FakeServer>, Json(body): Json<Value>) -> Reply {
    let script = server.plot_script(body);
    tokio::time::sleep(script.delay).await;
    script.reply
}

pub(crate) async fn spawn_measure_server() -> anyhow::Result<(String, FakeServer)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server = FakeServer::default();
    let app = Router::new()
        .route("/api/upload", post(handle_upload))
        .route("/api/plot", post(handle_plot))
        .with_state(server.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), server))
}

/// Address that refuses connections.
pub(crate) async fn closed_server_url() -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}"))
}
