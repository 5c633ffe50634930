#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    response::Response,
};
use blog_client::{ApiClient, ClientConfig, MemoryTokenStore, TokenState};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// A request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone)]
struct Stub {
    status: u16,
    body: Option<String>,
    delay: Option<Duration>,
}

#[derive(Clone, Default)]
struct MockState {
    stubs: Arc<Mutex<HashMap<(String, String), Stub>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// MockBackend
///
/// In-process stand-in for the blog API on an ephemeral port. Responses are
/// stubbed per method and path; every request is recorded.
pub struct MockBackend {
    pub address: String,
    state: MockState,
}

impl MockBackend {
    pub async fn spawn() -> Self {
        let state = MockState::default();
        let router = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        MockBackend { address, state }
    }

    fn stub(&self, method: &str, path: &str, stub: Stub) {
        self.state
            .stubs
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), stub);
    }

    pub fn stub_json(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.stub(
            method,
            path,
            Stub {
                status,
                body: Some(body.to_string()),
                delay: None,
            },
        );
    }

    pub fn stub_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.stub(
            method,
            path,
            Stub {
                status,
                body: Some(body.to_string()),
                delay: None,
            },
        );
    }

    pub fn stub_empty(&self, method: &str, path: &str, status: u16) {
        self.stub(
            method,
            path,
            Stub {
                status,
                body: None,
                delay: None,
            },
        );
    }

    pub fn stub_delayed(&self, method: &str, path: &str, delay: Duration, body: serde_json::Value) {
        self.stub(
            method,
            path,
            Stub {
                status: 200,
                body: Some(body.to_string()),
                delay: Some(delay),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.address.clone(),
            ..ClientConfig::default()
        }
    }

    pub fn client(&self, tokens: TokenState) -> ApiClient {
        ApiClient::new(self.config(), tokens).expect("client should build")
    }

    /// Client with a stored token.
    pub fn logged_in_client(&self) -> ApiClient {
        self.client(Arc::new(MemoryTokenStore::with_token("test-token")))
    }

    /// Client with empty token storage.
    pub fn anonymous_client(&self) -> ApiClient {
        self.client(Arc::new(MemoryTokenStore::new()))
    }
}

async fn respond(State(state): State<MockState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body,
    });

    let stub = state
        .stubs
        .lock()
        .unwrap()
        .get(&(method, path))
        .cloned()
        .unwrap_or(Stub {
            status: 404,
            body: Some(r#"{"error":"no stub"}"#.to_string()),
            delay: None,
        });

    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let builder = axum::http::Response::builder().status(StatusCode::from_u16(stub.status).unwrap());
    match stub.body {
        Some(text) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(text))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Raw HTTP/1.1 responder for one connection: writes the status line and a
/// `Content-Length` larger than `partial`, sends `partial`, waits `hold`, then
/// closes the socket with the body unfinished. Returns a client config
/// pointing at it.
pub async fn spawn_unfinished_body(
    status: u16,
    content_length: usize,
    partial: &'static str,
    hold: Duration,
) -> ClientConfig {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let address = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let head = format!(
            "HTTP/1.1 {status} X\r\ncontent-type: application/json\r\ncontent-length: {content_length}\r\n\r\n{partial}"
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(hold).await;
    });

    ClientConfig {
        api_base_url: address,
        ..ClientConfig::default()
    }
}
