use partner_relay::persistence::{LogStore, RecentMessages};

fn store() -> (tempfile::TempDir, LogStore) {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = LogStore::new(temp.path().join("messaging.log"));
    (temp, store)
}

#[test]
fn append_writes_bracketed_line() {
    let (_temp, store) = store();

    let entry = store
        .append("Partner", "hi", Some("2025-01-01 10:00:00"))
        .expect("append");

    assert_eq!(entry.sender, "Partner");
    let contents = std::fs::read_to_string(store.path()).expect("read log");
    assert_eq!(contents, "[2025-01-01 10:00:00] Partner: hi\n");
}

#[test]
fn append_generates_timestamp_when_absent() {
    let (_temp, store) = store();

    let entry = store.append("You", "hello", None).expect("append");

    assert_eq!(entry.timestamp.len(), "2025-01-01 10:00:00".len());
    let contents = std::fs::read_to_string(store.path()).expect("read log");
    assert_eq!(contents, format!("[{}] You: hello\n", entry.timestamp));
}

#[test]
fn append_flattens_embedded_newlines() {
    let (_temp, store) = store();

    store
        .append("Partner", "line one\nline two", Some("2025-01-01 10:00:00"))
        .expect("append");

    let contents = std::fs::read_to_string(store.path()).expect("read log");
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.contains("line one line two"));
}

#[test]
fn appends_preserve_order() {
    let (_temp, store) = store();

    store.append_raw("=== header ===").expect("header");
    store.append("You", "first", Some("2025-01-01 10:00:00")).expect("first");
    store.append("Partner", "second", Some("2025-01-01 10:00:01")).expect("second");

    let contents = std::fs::read_to_string(store.path()).expect("read log");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines,
        vec![
            "=== header ===",
            "[2025-01-01 10:00:00] You: first",
            "[2025-01-01 10:00:01] Partner: second",
        ]
    );
}

#[test]
fn read_recent_on_missing_log_reports_no_log() {
    let (_temp, store) = store();
    assert_eq!(store.read_recent(10).expect("read"), RecentMessages::NoLog);
}

#[test]
fn read_recent_returns_all_lines_when_fewer_than_n() {
    let (_temp, store) = store();
    store.append("You", "a", Some("t1")).expect("append");
    store.append("Partner", "b", Some("t2")).expect("append");

    let recent = store.read_recent(10).expect("read");
    assert_eq!(
        recent,
        RecentMessages::Lines(vec!["[t1] You: a".into(), "[t2] Partner: b".into()])
    );
}

#[test]
fn read_recent_returns_last_n_in_file_order() {
    let (_temp, store) = store();
    for i in 0..15 {
        store
            .append("Partner", &format!("msg {i}"), Some("2025-01-01 10:00:00"))
            .expect("append");
    }

    let RecentMessages::Lines(lines) = store.read_recent(10).expect("read") else {
        panic!("expected lines");
    };
    assert_eq!(lines.len(), 10);
    assert!(lines[0].ends_with("msg 5"));
    assert!(lines[9].ends_with("msg 14"));
}

#[test]
fn read_recent_on_empty_log_returns_no_lines() {
    let (_temp, store) = store();
    std::fs::write(store.path(), "").expect("create empty log");

    assert_eq!(
        store.read_recent(10).expect("read"),
        RecentMessages::Lines(Vec::new())
    );
}
