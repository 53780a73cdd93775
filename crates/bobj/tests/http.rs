//! Fetching meshes over HTTP from a local server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use bobj::decode::encode::MeshEncoder;
use bobj::decode::{Components, DecodeState};
use bobj::{
    Client, ClientOptions, DecodeError, Error, IndexBuffer, IndexWidth, MemoryCache, NoCache,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn scenario_bytes() -> Vec<u8> {
    MeshEncoder::new(IndexWidth::U8)
        .components(Components::UV)
        .scale(1.5)
        .encode(&[1, 2, 3, 4, 5, 6], &[0, 1, 0])
        .unwrap()
}

/// A server answering every request with the same response, writing the
/// body `piece` bytes at a time.
struct TestServer {
    url: String,
    requests: Arc<AtomicUsize>,
    last_request: Arc<Mutex<String>>,
}

impl TestServer {
    async fn start(status_line: &'static str, body: Vec<u8>, piece: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/mesh.bobj", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);
        let last_request = Arc::new(Mutex::new(String::new()));
        let captured = Arc::clone(&last_request);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let body = body.clone();
                let captured = Arc::clone(&captured);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        let n = socket.read(&mut buf).await.unwrap();
                        if n == 0 {
                            return;
                        }
                        request.extend_from_slice(&buf[..n]);
                    }
                    *captured.lock() = String::from_utf8_lossy(&request).into_owned();

                    let head = format!(
                        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        body.len()
                    );
                    socket.write_all(head.as_bytes()).await.unwrap();
                    for part in body.chunks(piece.max(1)) {
                        socket.write_all(part).await.unwrap();
                        socket.flush().await.unwrap();
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    }
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            url,
            requests,
            last_request,
        }
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Value of the `User-Agent` header in the last request, if any.
    fn last_user_agent(&self) -> Option<String> {
        let request = self.last_request.lock();
        request.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("user-agent")
                .then(|| value.trim().to_owned())
        })
    }
}

#[tokio::test]
async fn fetch_mesh_streamed_in_small_pieces() {
    init_tracing();
    let server = TestServer::start("200 OK", scenario_bytes(), 3).await;

    let mesh = Client::new().fetch_mesh(&server.url).await.unwrap();
    assert_eq!(mesh.vertex_words(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(mesh.indices(), &IndexBuffer::U8(vec![0, 1, 0]));
    assert!((mesh.header().scale - 1.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn fetch_mesh_uses_cache() {
    init_tracing();
    let server = TestServer::start("200 OK", scenario_bytes(), 64).await;
    let client = Client::with_cache(MemoryCache::new());

    let first = client.fetch_mesh(&server.url).await.unwrap();
    let second = client.load(&server.url).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_fetch_error() {
    init_tracing();
    let server = TestServer::start("404 Not Found", b"missing".to_vec(), 64).await;

    let err = Client::new().fetch_mesh(&server.url).await.unwrap_err();
    assert!(err.is_transport());
    match err {
        Error::Status { url, status } => {
            assert_eq!(url, server.url);
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_body_is_a_fetch_error() {
    init_tracing();
    let server = TestServer::start("200 OK", Vec::new(), 64).await;

    let err = Client::new().fetch_mesh(&server.url).await.unwrap_err();
    assert!(matches!(err, Error::MissingBody { ref url } if *url == server.url));
}

#[tokio::test]
async fn truncated_body_is_an_incomplete_stream() {
    init_tracing();
    let bytes = scenario_bytes();
    let server = TestServer::start("200 OK", bytes[..31].to_vec(), 4).await;

    let err = Client::new().fetch_mesh(&server.url).await.unwrap_err();
    assert!(!err.is_transport());
    assert!(err.to_string().contains(&server.url));
    assert_eq!(
        err.decode_error(),
        Some(&DecodeError::IncompleteStream {
            state: DecodeState::VertexData,
            consumed: 31,
        })
    );
}

#[tokio::test]
async fn connection_failure_is_a_fetch_error() {
    init_tracing();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/mesh.bobj", listener.local_addr().unwrap());
    drop(listener);

    let err = Client::new().fetch_mesh(&url).await.unwrap_err();
    assert!(matches!(err, Error::Http { url: ref failed, .. } if *failed == url));
}

#[tokio::test]
async fn every_constructor_sends_the_user_agent() {
    init_tracing();
    let server = TestServer::start("200 OK", scenario_bytes(), 64).await;

    let client = Client::new();
    client.fetch_mesh(&server.url).await.unwrap();
    assert_eq!(
        server.last_user_agent().as_deref(),
        Some(client.options().user_agent.as_str())
    );

    let cached = Client::with_cache(MemoryCache::new());
    cached.fetch_mesh(&server.url).await.unwrap();
    assert_eq!(
        server.last_user_agent().as_deref(),
        Some(concat!("bobj/", env!("CARGO_PKG_VERSION")))
    );

    let options = ClientOptions {
        user_agent: "mesh-viewer/2".to_owned(),
        ..ClientOptions::default()
    };
    let custom = Client::with_options(NoCache, options).unwrap();
    custom.fetch_mesh(&server.url).await.unwrap();
    assert_eq!(server.last_user_agent().as_deref(), Some("mesh-viewer/2"));
}
