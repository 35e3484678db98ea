//! Integration tests for the outbound sender failure modes.
//!
//! Each failure case points the relay at a loopback endpoint that
//! misbehaves in one specific way and checks the exact reply text.

use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use partner_relay::models::PartnerEndpoint;
use partner_relay::relay::{OutboundSender, SendOutcome};

use super::test_helpers::{read_log, spawn_router, test_config, test_relay};

fn sent_lines(log: &str) -> usize {
    log.lines().filter(|line| line.contains("] You: ")).count()
}

#[tokio::test]
async fn send_without_partner_reports_error() {
    let temp = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(temp.path()));

    let reply = relay.send_message("hi").await;

    assert_eq!(reply, "Error: Partner URL not set. Use set_partner_url first.");
    assert!(!relay.config().log_path.exists());
}

#[tokio::test]
async fn non_ok_status_is_reported_and_not_logged() {
    let temp = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(temp.path()));
    let router = Router::new().route(
        "/receive_message",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let (base_url, ct) = spawn_router(router).await;

    relay.set_partner(&base_url).await;
    let reply = relay.send_message("hi").await;

    assert_eq!(reply, "Failed to send message. Status: 500");
    assert_eq!(sent_lines(&read_log(&relay.config().log_path)), 0);

    ct.cancel();
}

#[tokio::test]
async fn only_200_counts_as_delivered() {
    let temp = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(temp.path()));
    let router = Router::new().route("/receive_message", post(|| async { StatusCode::CREATED }));
    let (base_url, ct) = spawn_router(router).await;

    relay.set_partner(&base_url).await;
    let reply = relay.send_message("hi").await;

    assert_eq!(reply, "Failed to send message. Status: 201");
    assert_eq!(sent_lines(&read_log(&relay.config().log_path)), 0);

    ct.cancel();
}

#[tokio::test]
async fn slow_partner_times_out() {
    let temp = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(temp.path()));
    let router = Router::new().route(
        "/receive_message",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let (base_url, ct) = spawn_router(router).await;

    relay.set_partner(&base_url).await;
    let reply = relay.send_message("hi").await;

    assert_eq!(
        reply,
        "Error: Request timed out. Check if partner's server is running."
    );
    assert_eq!(sent_lines(&read_log(&relay.config().log_path)), 0);

    ct.cancel();
}

#[tokio::test]
async fn closed_port_reports_connect_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(temp.path()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    relay.set_partner(&format!("http://127.0.0.1:{port}")).await;
    let reply = relay.send_message("hi").await;

    assert_eq!(
        reply,
        "Error: Could not connect to partner. Check the URL and network."
    );
    assert_eq!(sent_lines(&read_log(&relay.config().log_path)), 0);
}

#[tokio::test]
async fn sender_posts_configured_payload() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = test_config(temp.path());
    let (tx, mut rx) = tokio::sync::mpsc::channel::<serde_json::Value>(1);
    let router = Router::new().route(
        "/receive_message",
        post(move |axum::Json(body): axum::Json<serde_json::Value>| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(body).await;
                StatusCode::OK
            }
        }),
    );
    let (base_url, ct) = spawn_router(router).await;

    let log = partner_relay::persistence::LogStore::new(config.log_path.clone());
    let sender = OutboundSender::new(config.outbound.clone(), log).expect("sender");
    let partner = PartnerEndpoint::parse(&base_url).expect("endpoint");
    let outcome = sender.send(Some(&partner), "ping").await;

    assert_eq!(outcome, SendOutcome::Delivered("ping".into()));
    assert!(outcome.is_delivered());
    let body = rx.recv().await.expect("payload received");
    assert_eq!(body, serde_json::json!({ "message": "ping", "from_user": "Partner" }));

    ct.cancel();
}
