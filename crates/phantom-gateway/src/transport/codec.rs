//! Request body codec.
//!
//! - `Content-Encoding: gzip` bodies are expanded in full, capped at a limit
//! - Expanded bytes decode once into `Vec<MetricRecord>`

use std::io::Read;

use axum::http::{header::CONTENT_ENCODING, HeaderMap};
use bytes::Bytes;
use flate2::read::MultiGzDecoder;
use phantom_core::error::{PhantomError, Result};
use phantom_core::MetricRecord;

/// True when the first `Content-Encoding` value is `gzip`.
pub fn is_gzip(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false)
}

/// Expand a gzip body, including every concatenated member.
/// Output larger than `limit` is rejected rather than truncated.
pub fn gunzip(body: &[u8], limit: usize) -> Result<Bytes> {
    let mut out = Vec::new();
    MultiGzDecoder::new(body)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| PhantomError::Decompress(e.to_string()))?;
    if out.len() > limit {
        return Err(PhantomError::Decompress(format!(
            "expanded body exceeds {limit} bytes"
        )));
    }
    Ok(Bytes::from(out))
}

pub fn decode_batch(body: &[u8]) -> Result<Vec<MetricRecord>> {
    MetricRecord::decode_batch(body)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use axum::http::HeaderValue;
    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn gzip_detection_reads_first_value() {
        let mut h = HeaderMap::new();
        assert!(!is_gzip(&h));
        h.insert(CONTENT_ENCODING, HeaderValue::from_static("GZIP"));
        assert!(is_gzip(&h));
        h.insert(CONTENT_ENCODING, HeaderValue::from_static("br"));
        h.append(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
        assert!(!is_gzip(&h));
    }

    #[test]
    fn gunzip_round_trips_batch() {
        let raw = br#"[{"path":"a.b","value":1,"timestamp":2}]"#;
        let out = gunzip(&gzip(raw), 1024).unwrap();
        assert_eq!(&out[..], &raw[..]);
        assert_eq!(decode_batch(&out).unwrap()[0].path, "a.b");
    }

    #[test]
    fn gunzip_reads_every_member() {
        let mut body = gzip(br#"[{"path":"a"},"#);
        body.extend_from_slice(&gzip(br#"{"path":"b"}]"#));
        let out = gunzip(&body, 1024).unwrap();
        assert_eq!(&out[..], br#"[{"path":"a"},{"path":"b"}]"#);
        let paths: Vec<String> = decode_batch(&out).unwrap().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["a", "b"]);
    }

    #[test]
    fn gunzip_limit_spans_members() {
        let mut body = gzip(&[b'x'; 600]);
        body.extend_from_slice(&gzip(&[b'y'; 600]));
        assert!(gunzip(&body, 1200).is_ok());
        assert!(gunzip(&body, 1000).is_err());
    }

    #[test]
    fn gunzip_rejects_plain_bytes() {
        let err = gunzip(b"definitely not gzip", 1024).unwrap_err();
        assert_eq!(err.client_code().as_str(), "decompress");
    }

    #[test]
    fn gunzip_enforces_limit() {
        let big = vec![b'x'; 4096];
        assert!(gunzip(&gzip(&big), 4096).is_ok());
        let err = gunzip(&gzip(&big), 4095).unwrap_err();
        assert!(err.to_string().contains("exceeds 4095 bytes"));
    }
}
