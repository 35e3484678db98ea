use partner_relay::models::LogEntry;
use partner_relay::persistence::SnapshotStore;

#[test]
fn missing_file_loads_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let store = SnapshotStore::load(temp.path().join("inbox.json"));
    assert!(store.entries().is_empty());
}

#[test]
fn corrupt_file_loads_empty() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("inbox.json");
    std::fs::write(&path, "not json").expect("write");

    let store = SnapshotStore::load(&path);
    assert!(store.entries().is_empty());
}

#[test]
fn push_rewrites_file_as_json_array() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("inbox.json");
    let mut store = SnapshotStore::load(&path);

    store
        .push(LogEntry::new("2025-01-01 10:00:00", "Partner", "hi"))
        .expect("push");
    store
        .push(LogEntry::new("2025-01-01 10:00:05", "You", "hello"))
        .expect("push");

    let raw = std::fs::read_to_string(&path).expect("read snapshot");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    let array = value.as_array().expect("array");
    assert_eq!(array.len(), 2);
    assert_eq!(array[0]["from_user"], "Partner");
    assert_eq!(array[0]["message"], "hi");
    assert_eq!(array[1]["timestamp"], "2025-01-01 10:00:05");
}

#[test]
fn reload_restores_entries_in_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("inbox.json");
    {
        let mut store = SnapshotStore::load(&path);
        store.push(LogEntry::new("t1", "Partner", "one")).expect("push");
        store.push(LogEntry::new("t2", "You", "two")).expect("push");
    }

    let store = SnapshotStore::load(&path);
    let messages: Vec<&str> = store.entries().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["one", "two"]);
}

#[test]
fn failed_write_keeps_entry_in_memory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("missing-dir").join("inbox.json");
    let mut store = SnapshotStore::load(&path);

    let result = store.push(LogEntry::new("t1", "Partner", "kept"));

    assert!(result.is_err());
    assert_eq!(store.entries().len(), 1);
}
