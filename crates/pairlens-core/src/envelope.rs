use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::data_source::ProviderId;
use crate::AnalysisError;

/// Schema version stamped on every machine-readable output.
pub const SCHEMA_VERSION: &str = "v1.0.0";

/// Standard response envelope for all `pairlens` JSON outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A failed run carries no data, only the error that ended it.
    pub fn failure(meta: EnvelopeMeta, error: EnvelopeError) -> Self {
        Self {
            meta,
            data: None,
            errors: vec![error],
        }
    }
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub source: ProviderId,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(source: ProviderId, latency_ms: u64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            schema_version: SCHEMA_VERSION.to_owned(),
            generated_at: OffsetDateTime::now_utc(),
            source,
            latency_ms,
            warnings: Vec::new(),
        }
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

/// Structured error payload for failed responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl EnvelopeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            retryable: false,
            symbol: None,
        }
    }
}

impl From<&AnalysisError> for EnvelopeError {
    fn from(error: &AnalysisError) -> Self {
        let symbol = match error {
            AnalysisError::DataUnavailable { symbol, .. } => Some(symbol.to_string()),
            _ => None,
        };
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            retryable: error.retryable(),
            symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceError;
    use crate::Symbol;

    #[test]
    fn meta_gets_fresh_request_ids() {
        let a = EnvelopeMeta::new(ProviderId::Yahoo, 12);
        let b = EnvelopeMeta::new(ProviderId::Yahoo, 12);

        assert_eq!(a.schema_version, SCHEMA_VERSION);
        assert_ne!(a.request_id, b.request_id);
        assert!(Uuid::parse_str(&a.request_id).is_ok());
    }

    #[test]
    fn success_envelope_omits_errors() {
        let envelope = Envelope::success(EnvelopeMeta::new(ProviderId::Fixture, 0), 42_u32);
        let json = serde_json::to_value(&envelope).expect("serializes");

        assert_eq!(json["data"], 42);
        assert_eq!(json["meta"]["source"], "fixture");
        assert!(json.get("errors").is_none());
        assert!(json["meta"].get("warnings").is_none());
    }

    #[test]
    fn data_unavailable_maps_to_error_payload() {
        let symbol = Symbol::parse("KO").expect("valid");
        let error = AnalysisError::data_unavailable(&symbol, SourceError::unavailable("timeout"));
        let envelope: Envelope<()> = Envelope::failure(
            EnvelopeMeta::new(ProviderId::Yahoo, 3),
            EnvelopeError::from(&error),
        );

        let json = serde_json::to_value(&envelope).expect("serializes");
        assert!(json["data"].is_null());
        assert_eq!(json["errors"][0]["code"], "analysis.data_unavailable");
        assert_eq!(json["errors"][0]["symbol"], "KO");
        assert_eq!(json["errors"][0]["retryable"], true);
    }
}
