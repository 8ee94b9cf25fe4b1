//! Concurrent requests against a debug flag toggled out of band.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue};
use bytes::Bytes;
use futures_util::future::join_all;

use phantom_gateway::{
    control::{self, ControlCommand, DebugSwitch},
    ingest::{IngestHandler, IngestSettings},
    obs::CounterVec,
};

fn batch(n: usize) -> Bytes {
    let records: Vec<String> = (0..n)
        .map(|i| format!(r#"{{"path":"svc.{i}","value":{i},"timestamp":0}}"#))
        .collect();
    Bytes::from(format!("[{}]", records.join(",")))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn no_lost_or_duplicated_increments() {
    const REQUESTS: usize = 400;

    let counter = Arc::new(CounterVec::default());
    let switch = Arc::new(DebugSwitch::new(false));
    let handler = Arc::new(IngestHandler::new(
        IngestSettings::default(),
        Arc::clone(&switch),
        counter.clone(),
    ));

    let (tx, rx) = tokio::sync::mpsc::channel(64);
    let control = control::spawn_control_loop(Arc::clone(&switch), rx);
    let toggler = tokio::spawn(async move {
        for _ in 0..200 {
            tx.send(ControlCommand::ToggleDebug).await.unwrap();
            tokio::task::yield_now().await;
        }
    });

    let tasks = (0..REQUESTS).map(|i| {
        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            let mut headers = HeaderMap::new();
            let xff = format!("10.0.0.{}, 192.168.0.1", i % 8);
            headers.insert("x-forwarded-for", HeaderValue::from_str(&xff).unwrap());
            handler.handle_bytes(&headers, batch(i % 5)).unwrap()
        })
    });
    let results = join_all(tasks).await;

    toggler.await.unwrap();
    control.await.unwrap();

    let mut expected = 0u64;
    for r in results {
        let accepted = r.unwrap();
        let want = if accepted.debug { accepted.records } else { 1 };
        assert_eq!(accepted.increments, want);
        expected += want as u64;
    }
    assert_eq!(counter.total(), expected);
    // 200 toggles from off lands back on off
    assert!(!switch.is_enabled());
}
