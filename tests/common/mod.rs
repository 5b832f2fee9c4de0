//! Test fixture: an in-process gateway router wired to mock image and
//! recognition servers listening on ephemeral loopback ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use infernum_gateway::{Gateway, GatewayConfig, RecognitionJob, router};

/// What the mock recognition service does with a job.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Copy every input file into the output dir, prefixed with `out_`.
    CopyInputs,
    /// Create the output dir and write these file names into it.
    WriteFiles(Vec<String>),
    /// Answer with this status without touching the filesystem.
    Fail(StatusCode),
    /// Answer 200 OK without creating the output dir.
    NoOutput,
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
    jobs: Arc<Mutex<Vec<RecognitionJob>>>,
}

/// Mock recognition service.
pub struct MockRecognizer {
    pub url: String,
    calls: Arc<AtomicUsize>,
    jobs: Arc<Mutex<Vec<RecognitionJob>>>,
}

impl MockRecognizer {
    pub async fn spawn(behavior: Behavior) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let jobs = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            behavior,
            calls: calls.clone(),
            jobs: jobs.clone(),
        };
        let app = Router::new().route("/", post(recognize)).with_state(state);
        let addr = serve(app).await;

        Self {
            url: format!("http://{}/", addr),
            calls,
            jobs,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn jobs(&self) -> Vec<RecognitionJob> {
        self.jobs.lock().unwrap().clone()
    }
}

async fn recognize(
    State(state): State<MockState>,
    Json(job): Json<RecognitionJob>,
) -> StatusCode {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.jobs.lock().unwrap().push(job.clone());

    match state.behavior {
        Behavior::CopyInputs => {
            std::fs::create_dir_all(&job.output_dir).unwrap();
            for entry in std::fs::read_dir(&job.input_dir).unwrap() {
                let entry = entry.unwrap();
                let name = format!("out_{}", entry.file_name().to_string_lossy());
                std::fs::copy(entry.path(), PathBuf::from(&job.output_dir).join(name)).unwrap();
            }
            StatusCode::OK
        }
        Behavior::WriteFiles(names) => {
            std::fs::create_dir_all(&job.output_dir).unwrap();
            for name in names {
                std::fs::write(PathBuf::from(&job.output_dir).join(name), b"result").unwrap();
            }
            StatusCode::OK
        }
        Behavior::Fail(status) => status,
        Behavior::NoOutput => StatusCode::OK,
    }
}

/// Mock image host. `GET /images/{name}` answers `image:{name}`; every other
/// path is a 404.
pub struct MockImageHost {
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl MockImageHost {
    pub async fn spawn() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/images/{name}", get(image))
            .with_state(hits.clone());
        let addr = serve(app).await;

        Self {
            base: format!("http://{}", addr),
            hits,
        }
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("{}/images/{}", self.base, name)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn image(State(hits): State<Arc<AtomicUsize>>, Path(name): Path<String>) -> String {
    hits.fetch_add(1, Ordering::SeqCst);
    format!("image:{name}")
}

/// Serves `app` on an ephemeral loopback port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }
}

/// A gateway router with its own temporary input and output roots.
pub struct TestFixture {
    pub router: Router,
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub async fn new(recognition_url: &str) -> Self {
        Self::with_config(recognition_url, |_| {}).await
    }

    pub async fn with_config(
        recognition_url: &str,
        tweak: impl FnOnce(&mut GatewayConfig),
    ) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut config = GatewayConfig {
            input_root: temp_dir.path().join("input"),
            output_root: temp_dir.path().join("output"),
            recognition_url: recognition_url.to_string(),
            ..Default::default()
        };
        tweak(&mut config);
        let config = config.prepare_roots().await.expect("Failed to create roots");

        let input_root = config.input_root.clone();
        let output_root = config.output_root.clone();
        let gateway = Gateway::new(config).expect("Failed to build gateway");

        Self {
            router: router(Arc::new(gateway)),
            input_root,
            output_root,
            temp_dir,
        }
    }

    pub async fn recognize(&self, image_urls: &[String]) -> TestResponse {
        let body = serde_json::json!({ "image_urls": image_urls }).to_string();
        self.post_raw("/recognize", &body).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .header("Origin", "http://example.com")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Origin", "http://example.com")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            bytes,
        }
    }

    /// Job directories created under the input root.
    pub fn input_jobs(&self) -> Vec<String> {
        let mut jobs: Vec<String> = std::fs::read_dir(&self.input_root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        jobs.sort();
        jobs
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status,
            $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            String::from_utf8_lossy(&$response.bytes)
        );
    };
}
