use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName};
use bytes::Bytes;
use phantom_core::error::{PhantomError, Result};
use phantom_core::OriginChain;

use crate::config::{CountMode, LabelSet, ResponseMode, ServerSection};
use crate::control::DebugSwitch;
use crate::obs::CounterSink;
use crate::transport::codec;

/// Handler settings fixed at construction.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub origin_header: HeaderName,
    pub labels: LabelSet,
    pub count_mode: CountMode,
    pub response: ResponseMode,
    pub max_body_bytes: usize,
}

impl IngestSettings {
    pub fn from_config(server: &ServerSection) -> Result<Self> {
        Ok(Self {
            origin_header: server.header_name()?,
            labels: server.labels,
            count_mode: server.count_mode,
            response: server.response,
            max_body_bytes: server.max_body_bytes,
        })
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            origin_header: HeaderName::from_static("x-forwarded-for"),
            labels: LabelSet::OriginProxies,
            count_mode: CountMode::PerPath,
            response: ResponseMode::Empty,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

/// What a successful request did to the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// Branch taken, sampled once at the start of the request.
    pub debug: bool,
    /// Decoded records; 0 when the body was not parsed.
    pub records: usize,
    pub increments: usize,
}

/// Per-request ingest logic over shared config, debug flag and counter sink.
pub struct IngestHandler {
    settings: IngestSettings,
    debug: Arc<DebugSwitch>,
    sink: Arc<dyn CounterSink>,
}

impl IngestHandler {
    pub fn new(settings: IngestSettings, debug: Arc<DebugSwitch>, sink: Arc<dyn CounterSink>) -> Self {
        Self { settings, debug, sink }
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.is_enabled()
    }

    /// Flip debug mode; returns the new state.
    pub fn toggle_debug(&self) -> bool {
        self.debug.toggle()
    }

    /// Read the body (bounded by `max_body_bytes`) and process it.
    pub async fn handle(&self, headers: &HeaderMap, body: Body) -> Result<Accepted> {
        let body = match axum::body::to_bytes(body, self.settings.max_body_bytes).await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "error reading body");
                return Err(PhantomError::BodyRead(e.to_string()));
            }
        };
        self.handle_bytes(headers, body)
    }

    /// Process a body that is already in memory.
    pub fn handle_bytes(&self, headers: &HeaderMap, body: Bytes) -> Result<Accepted> {
        let raw = headers
            .get(&self.settings.origin_header)
            .map(|v| String::from_utf8_lossy(v.as_bytes()));
        let chain = OriginChain::parse(raw.as_deref());
        tracing::debug!(origin = chain.origin, "request received from origin");

        let mut labels: Vec<(&str, &str)> = Vec::with_capacity(3);
        labels.push(("origin", chain.origin));
        if self.settings.labels == LabelSet::OriginProxies {
            labels.push(("proxies", chain.proxies));
        }

        let debug = self.debug.is_enabled();
        if !debug {
            self.sink.inc(&labels);
            return Ok(Accepted { debug, records: 0, increments: 1 });
        }

        let body = if codec::is_gzip(headers) {
            codec::gunzip(&body, self.settings.max_body_bytes).map_err(|e| {
                tracing::error!(error = %e, "error expanding body");
                e
            })?
        } else {
            body
        };

        let records = codec::decode_batch(&body).map_err(|e| {
            tracing::error!(error = %e, body = %String::from_utf8_lossy(&body), "error decoding JSON");
            e
        })?;

        let increments = match self.settings.count_mode {
            CountMode::PerPath => {
                for r in &records {
                    tracing::info!(path = %r.path, "metric path received");
                    labels.push(("path", r.path.as_str()));
                    self.sink.inc(&labels);
                    labels.pop();
                }
                records.len()
            }
            CountMode::PerRequest => {
                for r in &records {
                    tracing::info!(path = %r.path, "metric path received");
                }
                self.sink.inc(&labels);
                1
            }
        };

        Ok(Accepted { debug, records: records.len(), increments })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;
    use crate::obs::CounterVec;

    fn handler(debug: bool, settings: IngestSettings) -> (IngestHandler, Arc<CounterVec>) {
        let counter = Arc::new(CounterVec::default());
        let h = IngestHandler::new(settings, Arc::new(DebugSwitch::new(debug)), counter.clone());
        (h, counter)
    }

    fn xff(v: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("x-forwarded-for", HeaderValue::from_static(v));
        h
    }

    const BATCH: &str = r#"[{"path":"a.b","value":1,"timestamp":1},{"path":"a.c","value":2,"timestamp":1}]"#;

    #[test]
    fn debug_off_counts_origin_and_proxies_once() {
        let (h, c) = handler(false, IngestSettings::default());
        let ok = h.handle_bytes(&xff("10.1.1.1, 192.168.4.3"), Bytes::from_static(b"garbage")).unwrap();
        assert_eq!(ok, Accepted { debug: false, records: 0, increments: 1 });
        assert_eq!(c.get(&[("origin", "10.1.1.1"), ("proxies", "192.168.4.3")]), 1);
    }

    #[test]
    fn origin_only_label_set_drops_proxies() {
        let settings = IngestSettings { labels: LabelSet::Origin, ..IngestSettings::default() };
        let (h, c) = handler(true, settings);
        h.handle_bytes(&xff("10.1.1.1, 192.168.4.3"), Bytes::from_static(BATCH.as_bytes())).unwrap();
        assert_eq!(c.get(&[("origin", "10.1.1.1"), ("path", "a.b")]), 1);
        assert_eq!(c.get(&[("origin", "10.1.1.1"), ("path", "a.c")]), 1);
        assert_eq!(c.total(), 2);
    }

    #[test]
    fn per_request_counts_once_in_debug() {
        let settings = IngestSettings { count_mode: CountMode::PerRequest, ..IngestSettings::default() };
        let (h, c) = handler(true, settings);
        let ok = h.handle_bytes(&HeaderMap::new(), Bytes::from_static(BATCH.as_bytes())).unwrap();
        assert_eq!(ok.records, 2);
        assert_eq!(ok.increments, 1);
        assert_eq!(c.get(&[("origin", "unknown"), ("proxies", "")]), 1);
    }

    #[test]
    fn custom_header_name_is_honoured() {
        let settings = IngestSettings {
            origin_header: HeaderName::from_static("x-real-ip"),
            ..IngestSettings::default()
        };
        let (h, c) = handler(false, settings);
        let mut headers = xff("10.9.9.9");
        headers.insert("x-real-ip", HeaderValue::from_static("172.16.0.1"));
        h.handle_bytes(&headers, Bytes::new()).unwrap();
        assert_eq!(c.get(&[("origin", "172.16.0.1"), ("proxies", "")]), 1);
    }

    #[test]
    fn decode_failure_counts_nothing() {
        let (h, c) = handler(true, IngestSettings::default());
        let err = h.handle_bytes(&xff("10.1.1.1"), Bytes::from_static(b"{oops")).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert_eq!(c.total(), 0);
    }

    #[test]
    fn toggle_switches_branch() {
        let (h, c) = handler(false, IngestSettings::default());
        assert!(h.toggle_debug());
        let ok = h.handle_bytes(&xff("10.1.1.1"), Bytes::from_static(BATCH.as_bytes())).unwrap();
        assert!(ok.debug);
        assert_eq!(c.total(), 2);
    }
}
