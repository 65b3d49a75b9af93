use anyhow::{Context, Result};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A request the fake media server received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub stream_path: String,
    pub endpoint: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// How the fake media server answers a request.
#[derive(Debug, Clone)]
pub struct FakeReply {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl FakeReply {
    pub fn answer(body: &str) -> Self {
        Self {
            status: 201,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> FakeReply + Send + Sync>;

#[derive(Clone)]
struct FakeState {
    responder: Responder,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Stand-in for the media server's WHIP/WHEP endpoints, bound to 127.0.0.1.
pub struct FakeMediaServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl FakeMediaServer {
    pub async fn start<F>(responder: F) -> Result<Self>
    where
        F: Fn(&RecordedRequest) -> FakeReply + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            responder: Arc::new(responder),
            requests: Arc::clone(&requests),
        };

        let app = Router::new()
            .route("/{stream_path}/{endpoint}", post(handle_sdp))
            .with_state(state);

        let (base_url, handle) = serve(app).await?;
        Ok(Self {
            base_url,
            requests,
            handle,
        })
    }

    /// Media server that answers every offer with `answer`.
    pub async fn answering(answer: &'static str) -> Result<Self> {
        Self::start(move |_| FakeReply::answer(answer)).await
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }
}

impl Drop for FakeMediaServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_sdp(
    State(state): State<FakeState>,
    Path((stream_path, endpoint)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let request = RecordedRequest {
        stream_path,
        endpoint,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    };
    tracing::debug!("[FakeMediaServer] {:?}", request);

    let reply = (state.responder)(&request);
    state.requests.lock().await.push(request);

    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, reply.body)
}

/// Stand-in for the credential discovery service.
pub struct FakeDiscovery {
    pub url: String,
    handle: JoinHandle<()>,
}

impl FakeDiscovery {
    pub async fn start(status: u16, body: &'static str) -> Result<Self> {
        let app = Router::new().route(
            "/",
            get(move || async move {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }),
        );

        let (base_url, handle) = serve(app).await?;
        Ok(Self {
            url: format!("{}/", base_url),
            handle,
        })
    }
}

impl Drop for FakeDiscovery {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve(app: Router) -> Result<(String, JoinHandle<()>)> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("Failed to bind fake server")?;
    let addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::warn!("[FakeServer] stopped: {}", e);
        }
    });

    Ok((format!("http://{}", addr), handle))
}
