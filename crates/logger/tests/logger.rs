//! Logger tree behavior as seen by a backend

use ember_logger::test_support::CaptureBackend;
use ember_logger::{Data, Level, Logger, Message, data, debug, debug_data, error, error_data, info, info_data};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn root(debug_level: u32) -> (CaptureBackend, Logger) {
    let capture = CaptureBackend::new();
    let logger = Logger::builder("svc")
        .backend(Arc::new(capture.clone()))
        .data(data! { "service" => "svc", "region" => "eu" })
        .debug_level(debug_level)
        .build()
        .unwrap();
    (capture, logger)
}

#[test]
fn test_child_tree_domains_and_data() {
    let (capture, root) = root(0);

    let api = root.child("api", data! { "region" => "us" });
    let handler = api.child("users", data! { "route" => "/users" });
    let same = handler.child("", Data::new());

    info!(same, "handled");

    let record = &capture.records()[0];
    assert_eq!(record.domain, "svc.api.users");
    assert_eq!(
        record.data,
        data! { "service" => "svc", "region" => "us", "route" => "/users" }
    );

    // Parents are untouched by their children
    assert_eq!(root.domain(), "svc");
    assert_eq!(root.data().get("region"), Some(&json!("eu")));
    assert_eq!(api.data().len(), 2);
}

#[test]
fn test_message_data_wins_over_logger_data() {
    let (capture, root) = root(0);

    info_data!(root, data! { "region" => "ap", "id" => 7 }, "override");
    info!(root, "plain");

    let records = capture.records();
    assert_eq!(records[0].data.get("region"), Some(&json!("ap")));
    assert_eq!(records[0].data.get("id"), Some(&json!(7)));
    assert_eq!(records[1].data.get("region"), Some(&json!("eu")));
    assert_eq!(records[1].data.get("id"), None);
}

#[test]
fn test_debug_gating() {
    let (capture, root) = root(1);

    debug!(root, 0, "tier zero");
    debug!(root, 1, "tier one");
    debug!(root, 2, "tier two");
    debug_data!(root, data! { "k" => 1 }, 3, "tier three");
    error!(root, "always");

    assert_eq!(capture.messages(), ["tier zero", "tier one", "always"]);

    let verbose = root.with_debug_level(3);
    debug!(verbose, 3, "now visible");
    assert!(capture.contains("now visible"));
    assert_eq!(capture.records().last().unwrap().full_level(), "debug.3");
}

#[test]
fn test_children_copy_threshold() {
    let (capture, root) = root(2);
    let child = root.child("worker", Data::new());
    let quieter = root.with_debug_level(0);

    assert_eq!(child.debug_level(), 2);
    debug!(child, 2, "child debug");
    debug!(quieter, 1, "dropped");

    assert_eq!(capture.messages(), ["child debug"]);
}

#[test]
fn test_levels_and_formatting() {
    let (capture, root) = root(0);
    let user = "ada";

    error_data!(root, data! { "code" => 500 }, "failed for {user}: {}", 42);

    let record = &capture.records()[0];
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.message, "failed for ada: 42");
    assert_eq!(record.data.get("code"), Some(&json!(500)));
}

#[test]
fn test_explicit_time_is_kept() {
    let (capture, root) = root(0);
    let time = chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05+02:00").unwrap();

    root.log(Message::info("timed").with_time(time));
    root.log(Message::info("now"));

    let records = capture.records();
    assert_eq!(records[0].time.to_rfc3339(), "2024-01-02T01:04:05+00:00");
    assert!(records[1].time > records[0].time);
}

#[test]
fn test_builder_requires_backend() {
    assert!(matches!(
        Logger::builder("x").build(),
        Err(ember_logger::Error::MissingBackend)
    ));
}

#[test]
fn test_shared_across_threads() {
    let (capture, root) = root(0);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = root.child(&format!("t{i}"), data! { "thread" => i });
            std::thread::spawn(move || {
                for n in 0..25 {
                    info!(logger, "message {n}");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = capture.records();
    assert_eq!(records.len(), 100);
    for record in &records {
        let thread = record.data.get("thread").unwrap();
        assert_eq!(record.domain, format!("svc.t{thread}"));
    }
}
