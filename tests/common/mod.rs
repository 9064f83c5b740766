//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pdf_relay::config::RelayConfig;
use pdf_relay::entropy::Entropy;
use pdf_relay::fetcher::{FetchSettings, PdfFetcher};
use pdf_relay::resilience::{JitteredBackoff, Sleeper};
use pdf_relay::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const PDF_BODY: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

/// What a mock origin answers with.
#[derive(Clone)]
pub struct OriginReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
    /// Pause before writing anything back.
    pub delay: Duration,
    /// Pause after the headers and first body bytes.
    pub body_stall: Duration,
}

impl OriginReply {
    pub fn pdf(body: &[u8]) -> Self {
        Self {
            status: 200,
            content_type: Some("application/pdf"),
            body: body.to_vec(),
            delay: Duration::ZERO,
            body_stall: Duration::ZERO,
        }
    }

    pub fn html() -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8"),
            body: b"<html>blocked</html>".to_vec(),
            delay: Duration::ZERO,
            body_stall: Duration::ZERO,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: b"nope".to_vec(),
            delay: Duration::ZERO,
            body_stall: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send headers and the first four body bytes, then go quiet.
    pub fn stalled_body(mut self, stall: Duration) -> Self {
        self.body_stall = stall;
        self
    }
}

/// A running programmable origin.
pub struct MockOrigin {
    pub addr: SocketAddr,
    hits: Arc<AtomicU32>,
    requests: Arc<Mutex<Vec<Vec<(String, String)>>>>,
}

impl MockOrigin {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Value of `name` (lowercase) on every request received, in order.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|headers| {
                headers
                    .iter()
                    .find(|(k, _)| k == name)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// Start an origin whose reply depends on the 1-based request number.
pub async fn start_programmable_origin<F>(f: F) -> MockOrigin
where
    F: Fn(u32) -> OriginReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicU32::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let origin = MockOrigin {
        addr,
        hits: hits.clone(),
        requests: requests.clone(),
    };

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let hits = hits.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let headers = read_request_headers(&mut socket).await;
                        requests.lock().unwrap().push(headers);
                        let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
                        let reply = f(n);

                        tokio::time::sleep(reply.delay).await;

                        let mut head = format!("HTTP/1.1 {}\r\n", status_line(reply.status));
                        if let Some(ct) = reply.content_type {
                            head.push_str(&format!("Content-Type: {}\r\n", ct));
                        }
                        head.push_str(&format!(
                            "Content-Length: {}\r\nConnection: close\r\n\r\n",
                            reply.body.len()
                        ));
                        let _ = socket.write_all(head.as_bytes()).await;
                        let split = reply.body.len().min(4);
                        let _ = socket.write_all(&reply.body[..split]).await;
                        let _ = socket.flush().await;
                        tokio::time::sleep(reply.body_stall).await;
                        let _ = socket.write_all(&reply.body[split..]).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    origin
}

/// Start an origin that always gives the same reply.
pub async fn start_origin(reply: OriginReply) -> MockOrigin {
    start_programmable_origin(move |_| reply.clone()).await
}

async fn read_request_headers(socket: &mut tokio::net::TcpStream) -> Vec<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf)
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect()
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        429 => "429 Too Many Requests",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Entropy that replays scripted values, then falls back to the range start.
#[derive(Default)]
pub struct ScriptedEntropy {
    indexes: Mutex<VecDeque<usize>>,
    delays: Mutex<VecDeque<Duration>>,
}

impl ScriptedEntropy {
    pub fn new(indexes: &[usize], delays: &[Duration]) -> Self {
        Self {
            indexes: Mutex::new(indexes.iter().copied().collect()),
            delays: Mutex::new(delays.iter().copied().collect()),
        }
    }
}

impl Entropy for ScriptedEntropy {
    fn pick_index(&self, _len: usize) -> usize {
        self.indexes.lock().unwrap().pop_front().unwrap_or(0)
    }

    fn duration_between(&self, min: Duration, _max: Duration) -> Duration {
        self.delays.lock().unwrap().pop_front().unwrap_or(min)
    }
}

/// Sleeper that records requested pauses and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.slept.lock().unwrap().push(duration);
        Box::pin(std::future::ready(()))
    }
}

/// Default-shaped settings with a shorter per-attempt timeout.
pub fn settings_with_timeout(timeout: Duration) -> FetchSettings {
    FetchSettings {
        max_attempts: 3,
        attempt_timeout: timeout,
        backoff: JitteredBackoff::default(),
    }
}

pub fn fetcher(
    settings: FetchSettings,
    entropy: Arc<dyn Entropy>,
    sleeper: Arc<dyn Sleeper>,
) -> Arc<PdfFetcher> {
    let client = reqwest::Client::builder()
        .timeout(settings.attempt_timeout)
        .no_proxy()
        .build()
        .unwrap();
    Arc::new(PdfFetcher::with_client(client, settings, entropy, sleeper))
}

/// Start the relay on an ephemeral port around `fetcher`.
pub async fn start_relay(fetcher: Arc<PdfFetcher>) -> (SocketAddr, Shutdown) {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::with_fetcher(config, fetcher);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
