//! End-to-end tests between two relays on loopback.
//!
//! Relay A sends through relay B's inbound listener; both logs are
//! checked afterwards.

use std::sync::Arc;

use partner_relay::relay::Relay;

use super::test_helpers::{read_log, spawn_inbound, test_config, test_relay};

#[tokio::test]
async fn message_reaches_partner_log_and_sender_log() {
    let dir_a = tempfile::tempdir().expect("tempdir a");
    let dir_b = tempfile::tempdir().expect("tempdir b");
    let relay_a = test_relay(test_config(dir_a.path()));
    let relay_b = test_relay(test_config(dir_b.path()));
    let (base_b, ct) = spawn_inbound(Arc::clone(&relay_b)).await;

    let set_reply = relay_a.set_partner(&base_b).await;
    assert_eq!(set_reply, format!("Partner URL set to: {base_b}"));

    let reply = relay_a.send_message("hello").await;
    assert_eq!(reply, "Message sent successfully: hello");

    let log_b = read_log(&relay_b.config().log_path);
    assert_eq!(log_b.lines().count(), 1);
    assert!(log_b.trim_end().ends_with("] Partner: hello"));

    let log_a = read_log(&relay_a.config().log_path);
    let lines: Vec<&str> = log_a.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(&format!("] System: Partner URL set to: {base_b}")));
    assert!(lines[1].ends_with("] You: hello"));

    ct.cancel();
}

#[tokio::test]
async fn get_messages_reflects_both_directions() {
    let dir_a = tempfile::tempdir().expect("tempdir a");
    let dir_b = tempfile::tempdir().expect("tempdir b");
    let relay_a = test_relay(test_config(dir_a.path()));
    let relay_b = test_relay(test_config(dir_b.path()));
    let (base_a, ct_a) = spawn_inbound(Arc::clone(&relay_a)).await;
    let (base_b, ct_b) = spawn_inbound(Arc::clone(&relay_b)).await;

    relay_a.set_partner(&base_b).await;
    relay_b.set_partner(&base_a).await;
    relay_a.send_message("ping").await;
    relay_b.send_message("pong").await;

    let recent = relay_a.recent_messages();
    let lines: Vec<&str> = recent.lines().collect();
    assert_eq!(lines[0], "Recent messages:");
    assert!(lines[2].ends_with("] You: ping"));
    assert!(lines[3].ends_with("] Partner: pong"));
    assert!(recent.ends_with('\n'));

    ct_a.cancel();
    ct_b.cancel();
}

#[tokio::test]
async fn localhost_partner_gets_local_port() {
    let dir_a = tempfile::tempdir().expect("tempdir a");
    let dir_b = tempfile::tempdir().expect("tempdir b");
    let relay_b = test_relay(test_config(dir_b.path()));
    let (base_b, ct) = spawn_inbound(Arc::clone(&relay_b)).await;
    let port: u16 = base_b
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("port in base url");

    let mut config_a = test_config(dir_a.path());
    config_a.outbound.local_port = Some(port);
    let relay_a = Arc::new(Relay::new(Arc::new(config_a)).expect("relay a"));

    relay_a.set_partner("http://localhost").await;
    let reply = relay_a.send_message("via localhost").await;

    assert_eq!(reply, "Message sent successfully: via localhost");
    assert!(read_log(&relay_b.config().log_path).contains("] Partner: via localhost"));

    ct.cancel();
}

#[tokio::test]
async fn empty_partner_url_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let relay = test_relay(test_config(dir.path()));

    let reply = relay.set_partner("  ").await;

    assert!(reply.starts_with("Error setting partner URL: "));
    assert!(relay.partner().get().await.is_none());
    assert_eq!(relay.recent_messages(), "No messages found");
}
