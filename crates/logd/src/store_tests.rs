use super::*;

fn seed(store: &LogStore, stream: &str, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let record = store.add_event(
                stream.to_string(),
                format!("2026-01-01T00:00:{i:02}Z"),
                format!("line {i}"),
            );
            record.id.as_str().to_string()
        })
        .collect()
}

#[test]
fn describe_logs_lists_known_streams() {
    let (store, _dir) = LogStore::open_temp();
    seed(&store, "x:out", 2);
    seed(&store, "x:err", 1);

    let all = store.describe_logs(None);
    assert_eq!(all.len(), 2);

    let filtered = store.describe_logs(Some(&["x:out".to_string()]));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "x:out");
    assert!(filtered[0].last_event_at.is_some());
}

#[test]
fn get_events_pages_from_start_with_no_cursor() {
    let (store, _dir) = LogStore::open_temp();
    seed(&store, "x:out", 10);

    let page = store.get_events(&["x:out".to_string()], None, 0, 4);
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.items[0].message, "line 0");
    assert_eq!(page.items[3].message, "line 3");

    let page2 = store.get_events(
        &["x:out".to_string()],
        page.next_cursor.as_deref(),
        0,
        4,
    );
    assert_eq!(page2.items.len(), 4);
    assert_eq!(page2.items[0].message, "line 4");
    assert_eq!(page2.items[3].message, "line 7");

    let page3 = store.get_events(
        &["x:out".to_string()],
        page2.next_cursor.as_deref(),
        0,
        4,
    );
    assert_eq!(page3.items.len(), 2);
    assert_eq!(page3.items[0].message, "line 8");
    assert_eq!(page3.items[1].message, "line 9");

    let page4 = store.get_events(
        &["x:out".to_string()],
        page3.next_cursor.as_deref(),
        0,
        4,
    );
    assert!(page4.items.is_empty());
    assert_eq!(page4.next_cursor, page3.next_cursor);
}

#[test]
fn get_events_merges_across_streams_ascending() {
    let (store, _dir) = LogStore::open_temp();
    store.add_event("x:out".to_string(), "2026-01-01T00:00:00Z".to_string(), "a".to_string());
    store.add_event("x:err".to_string(), "2026-01-01T00:00:01Z".to_string(), "b".to_string());
    store.add_event("x:out".to_string(), "2026-01-01T00:00:02Z".to_string(), "c".to_string());

    let page = store.get_events(&["x:out".to_string(), "x:err".to_string()], None, 0, 10);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].message, "a");
    assert_eq!(page.items[1].message, "b");
    assert_eq!(page.items[2].message, "c");
    // Ids must be strictly increasing across the merged page.
    assert!(page.items[0].id.as_str() < page.items[1].id.as_str());
    assert!(page.items[1].id.as_str() < page.items[2].id.as_str());
}

#[test]
fn get_events_prev_window_looks_backward_from_cursor() {
    let (store, _dir) = LogStore::open_temp();
    let ids = seed(&store, "x:out", 5);

    let page = store.get_events(&["x:out".to_string()], Some(&ids[2]), 2, 0);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].message, "line 0");
    assert_eq!(page.items[1].message, "line 1");
}

#[test]
fn remove_old_events_drops_only_stale_records() {
    let (store, _dir) = LogStore::open_temp();
    store.add_event("x:out".to_string(), "2026-01-01T00:00:00Z".to_string(), "old".to_string());
    store.add_event("x:out".to_string(), "2026-01-01T01:00:00Z".to_string(), "new".to_string());

    let removed = store.remove_old_events("2026-01-01T00:30:00Z");
    assert_eq!(removed, 1);

    let page = store.get_events(&["x:out".to_string()], None, 0, 10);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].message, "new");
}

#[test]
fn persist_and_reopen_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = LogStore::open(dir.path()).unwrap();
        store.add_event("x:out".to_string(), "2026-01-01T00:00:00Z".to_string(), "hi".to_string());
        store.persist().unwrap();
    }
    let store = LogStore::open(dir.path()).unwrap();
    let page = store.get_events(&["x:out".to_string()], None, 0, 10);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].message, "hi");
}
