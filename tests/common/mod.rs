//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What a mock target answers for one request.
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
    /// Pause between the response head and the body.
    pub body_delay: Duration,
}

impl Reply {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            delay: Duration::ZERO,
            body_delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Send the head right away and hold the body back for `delay`.
    #[allow(dead_code)]
    pub fn stall_body(mut self, delay: Duration) -> Self {
        self.body_delay = delay;
        self
    }
}

/// Start a programmable mock target on an ephemeral port.
///
/// `f` receives the request path and decides the reply.
pub async fn start_programmable_target<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        serve_one(socket, f.as_ref()).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A target whose `/health` reports UP and whose `/work` always succeeds.
#[allow(dead_code)]
pub async fn start_healthy_target(uptime_secs: u64) -> SocketAddr {
    start_programmable_target(move |path| async move {
        match path.as_str() {
            "/health" => Reply::ok(format!(
                r#"{{"status":"UP","uptime_sec":{uptime_secs},"version":"1.0.0"}}"#
            )),
            "/work" => Reply::ok("done!"),
            _ => Reply::status(404, "not found"),
        }
    })
    .await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn serve_one<F, Fut>(mut socket: TcpStream, f: &F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Reply>,
{
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let reply = f(path).await;
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let preamble = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reply.status,
        reason(reply.status),
        reply.body.len(),
    );
    if reply.body_delay.is_zero() {
        let _ = socket.write_all(format!("{preamble}{}", reply.body).as_bytes()).await;
    } else {
        if socket.write_all(preamble.as_bytes()).await.is_err() {
            return;
        }
        let _ = socket.flush().await;
        tokio::time::sleep(reply.body_delay).await;
        let _ = socket.write_all(reply.body.as_bytes()).await;
    }
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
