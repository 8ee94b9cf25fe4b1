//! Shared error type across phantom crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Request body could not be read.
    BodyRead,
    /// gzip body could not be expanded.
    Decompress,
    /// Body is not a JSON array of metric records.
    Decode,
    /// Startup configuration rejected.
    InvalidConfig,
    /// Unsupported config file version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BodyRead => "body_read",
            ClientCode::Decompress => "decompress",
            ClientCode::Decode => "decode",
            ClientCode::InvalidConfig => "invalid_config",
            ClientCode::UnsupportedVersion => "unsupported_version",
            ClientCode::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PhantomError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum PhantomError {
    #[error("error reading body: {0}")]
    BodyRead(String),
    #[error("error expanding gzip body: {0}")]
    Decompress(String),
    #[error("error decoding JSON: {0}")]
    Decode(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl PhantomError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PhantomError::BodyRead(_) => ClientCode::BodyRead,
            PhantomError::Decompress(_) => ClientCode::Decompress,
            PhantomError::Decode(_) => ClientCode::Decode,
            PhantomError::Config(_) => ClientCode::InvalidConfig,
            PhantomError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PhantomError::Internal(_) => ClientCode::Internal,
        }
    }

    /// HTTP status hint. Request-scoped failures are the client's fault.
    pub fn http_status(&self) -> u16 {
        match self {
            PhantomError::BodyRead(_) | PhantomError::Decompress(_) | PhantomError::Decode(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_are_client_errors() {
        assert_eq!(PhantomError::BodyRead("eof".into()).http_status(), 400);
        assert_eq!(PhantomError::Decompress("bad header".into()).http_status(), 400);
        assert_eq!(PhantomError::Decode("eof".into()).http_status(), 400);
        assert_eq!(PhantomError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(PhantomError::Decode("x".into()).client_code().as_str(), "decode");
        assert_eq!(PhantomError::UnsupportedVersion.client_code().as_str(), "unsupported_version");
    }
}
