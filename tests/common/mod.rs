//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use replica_race::dispatch::Endpoint;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable mock backend with async support.
///
/// The closure decides status and body per request; awaiting forever
/// simulates a replica that never answers. Returns the bound address.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(addr: &str, f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let local_addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut request = [0u8; 1024];
                        let _ = socket.read(&mut request).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    local_addr
}

/// Start a backend that writes `raw` verbatim and closes the connection.
#[allow(dead_code)]
pub async fn start_raw_backend(addr: &str, raw: &'static str) -> SocketAddr {
    let listener = TcpListener::bind(addr).await.unwrap();
    let local_addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    local_addr
}

/// Backend answering `status` with `body` after `delay`.
#[allow(dead_code)]
pub async fn start_delayed_backend(delay: Duration, status: u16, body: &'static str) -> SocketAddr {
    start_programmable_backend("127.0.0.1:0", move || async move {
        tokio::time::sleep(delay).await;
        (status, body.to_string())
    })
    .await
}

/// Backend that accepts requests and never answers.
#[allow(dead_code)]
pub async fn start_hanging_backend() -> SocketAddr {
    start_programmable_backend("127.0.0.1:0", || std::future::pending()).await
}

/// An address with nothing listening on it.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

#[allow(dead_code)]
pub fn endpoint(addr: SocketAddr) -> Endpoint {
    format!("http://{}", addr).parse().unwrap()
}
