//! Global bridge installation; each bridge is installed once per process

use ember_logger::Logger;
use ember_logger::compat::{init_log_bridge, init_tracing_bridge};
use ember_logger::test_support::CaptureBackend;
use std::sync::Arc;

#[test]
fn test_log_bridge_global() {
    let capture = CaptureBackend::new();
    let logger = Logger::new("app", Arc::new(capture.clone())).child("log", ember_logger::Data::new());

    init_log_bridge(logger.clone()).unwrap();
    assert!(init_log_bridge(logger).is_err());

    log::error!("error from log");
    log::warn!("warning from log");
    log::info!(attempt = 2; "info from log");
    log::debug!("debug from log");

    assert!(capture.contains("error from log"));
    assert!(capture.contains("warning from log"));
    assert!(capture.contains("info from log"));
    assert!(!capture.contains("debug from log"));

    let info = capture
        .records()
        .into_iter()
        .find(|r| r.message == "info from log")
        .unwrap();
    assert_eq!(info.domain, "app.log");
    assert_eq!(info.data.get("attempt"), Some(&serde_json::json!(2)));
}

#[test]
fn test_tracing_bridge_global() {
    let capture = CaptureBackend::new();
    let logger = Logger::new("app", Arc::new(capture.clone())).with_debug_level(2);

    init_tracing_bridge(logger).unwrap();

    tracing::error!("error from tracing");
    tracing::trace!(depth = 2, "trace from tracing");

    let got: Vec<_> = capture
        .records()
        .into_iter()
        .filter(|r| r.message.ends_with("from tracing"))
        .map(|r| r.full_level())
        .collect();
    assert_eq!(got, ["error", "debug.2"]);
}
