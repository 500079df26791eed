//! Dispatcher behaviour against real (mock) replicas over TCP.

use std::time::{Duration, Instant};

use replica_race::dispatch::{fetch_raw, Dispatcher, RequestSpec, ResponseEnvelope};

mod common;

fn dispatcher() -> Dispatcher {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    Dispatcher::with_client(client)
}

#[tokio::test]
async fn test_one_slow_success_among_failures() {
    let a = common::start_delayed_backend(Duration::ZERO, 503, "Service unavailable").await;
    let b = common::start_delayed_backend(Duration::from_millis(150), 200, "7").await;
    let c = common::start_delayed_backend(Duration::ZERO, 503, "Service unavailable").await;
    let endpoints = [a, b, c].map(common::endpoint);

    let start = Instant::now();
    let envelope = dispatcher()
        .dispatch(&RequestSpec::default(), &endpoints, Duration::from_secs(10))
        .await;
    let elapsed = start.elapsed();

    assert_eq!(envelope, ResponseEnvelope::success("7"));
    assert!(elapsed >= Duration::from_millis(150), "too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(1), "too late: {:?}", elapsed);
}

#[tokio::test]
async fn test_all_stalling_returns_unavailable_at_deadline() {
    let endpoints = [
        common::start_hanging_backend().await,
        common::start_hanging_backend().await,
        common::start_hanging_backend().await,
    ]
    .map(common::endpoint);

    let start = Instant::now();
    let envelope = dispatcher()
        .dispatch(&RequestSpec::default(), &endpoints, Duration::from_secs(2))
        .await;
    let elapsed = start.elapsed();

    assert_eq!(envelope, ResponseEnvelope::unavailable());
    assert!(elapsed >= Duration::from_secs(2), "too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2500), "too late: {:?}", elapsed);
}

#[tokio::test]
async fn test_all_failing_returns_quickly() {
    let endpoints = [
        common::start_delayed_backend(Duration::ZERO, 503, "").await,
        common::start_delayed_backend(Duration::ZERO, 500, "boom").await,
        common::closed_addr().await,
    ]
    .map(common::endpoint);

    let start = Instant::now();
    let envelope = dispatcher()
        .dispatch(&RequestSpec::default(), &endpoints, Duration::from_secs(10))
        .await;

    assert_eq!(envelope, ResponseEnvelope::unavailable());
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_fastest_success_wins() {
    let endpoints = [
        common::start_delayed_backend(Duration::from_millis(600), 200, "slow").await,
        common::start_delayed_backend(Duration::from_millis(50), 200, "fast").await,
        common::start_hanging_backend().await,
    ]
    .map(common::endpoint);

    let envelope = dispatcher()
        .dispatch(&RequestSpec::default(), &endpoints, Duration::from_secs(5))
        .await;
    assert_eq!(envelope.body, "fast");
}

#[tokio::test]
async fn test_truncated_body_counts_as_failed_attempt() {
    let truncated = common::start_raw_backend(
        "127.0.0.1:0",
        "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n12",
    )
    .await;
    let healthy = common::start_delayed_backend(Duration::from_millis(200), 200, "21").await;

    let envelope = dispatcher()
        .dispatch(
            &RequestSpec::default(),
            &[common::endpoint(truncated), common::endpoint(healthy)],
            Duration::from_secs(5),
        )
        .await;
    assert_eq!(envelope, ResponseEnvelope::success("21"));

    let envelope = dispatcher()
        .dispatch(&RequestSpec::default(), &[common::endpoint(truncated)], Duration::from_secs(5))
        .await;
    assert_eq!(envelope, ResponseEnvelope::unavailable());
}

#[tokio::test]
async fn test_single_fetch_reports_real_status_and_body() {
    let endpoint = common::endpoint(
        common::start_delayed_backend(Duration::ZERO, 503, "Service unavailable").await,
    );
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let (status, body) = fetch_raw(&client, &RequestSpec::default(), &endpoint, Duration::from_secs(2))
        .await
        .unwrap();
    let envelope = ResponseEnvelope::answered(status.as_u16(), body);

    assert_eq!(envelope.to_string(), "\"Service unavailable\" (503)");
    assert!(!envelope.present);
}
