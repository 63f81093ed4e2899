//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::ProviderError;
    use crate::errors::ProviderErrorKind;
    use crate::errors::RagfantError;

    // ====== Error Type Tests ======

    #[test]
    fn test_data_not_found_mentions_ingestion() {
        let error = RagfantError::data_not_found("data/fantasy_index.json");
        let display = format!("{error}");
        assert!(display.contains("data/fantasy_index.json"));
        assert!(display.contains("ragfant index build"));
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_index_mismatch_is_fatal() {
        let error = RagfantError::IndexMismatch {
            vectors: 10,
            records: 9,
            detail: "length".to_string(),
        };
        assert!(error.is_fatal());
        let display = format!("{error}");
        assert!(display.contains("10 vectors"));
        assert!(display.contains("9 metadata records"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let error = RagfantError::DimensionMismatch {
            expected: 1536,
            actual: 384,
        };
        assert_eq!(
            format!("{error}"),
            "Embedding dimension mismatch: expected 1536, got 384"
        );
    }

    // ====== Provider Error Tests ======

    #[test]
    fn test_provider_retryable_kinds() {
        let retryable = [
            ProviderErrorKind::Timeout,
            ProviderErrorKind::Transport,
            ProviderErrorKind::Status(429),
            ProviderErrorKind::Status(500),
            ProviderErrorKind::Status(503),
        ];
        for kind in retryable {
            assert!(ProviderError::new("openai", kind, "x").is_retryable(), "{kind}");
        }

        let permanent = [
            ProviderErrorKind::Auth,
            ProviderErrorKind::Status(400),
            ProviderErrorKind::Status(404),
            ProviderErrorKind::InvalidResponse,
            ProviderErrorKind::MissingCredentials,
        ];
        for kind in permanent {
            assert!(!ProviderError::new("openai", kind, "x").is_retryable(), "{kind}");
        }
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(ProviderErrorKind::from_status(401), ProviderErrorKind::Auth);
        assert_eq!(ProviderErrorKind::from_status(403), ProviderErrorKind::Auth);
        assert_eq!(
            ProviderErrorKind::from_status(502),
            ProviderErrorKind::Status(502)
        );
    }

    #[test]
    fn test_provider_error_display() {
        let error: RagfantError =
            ProviderError::new("ollama", ProviderErrorKind::Timeout, "after 30s").into();
        assert_eq!(
            format!("{error}"),
            "Provider error: ollama timeout: after 30s"
        );
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: RagfantError = io_err.into();
        assert!(matches!(err, RagfantError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: Result<serde_json::Value, _> = serde_json::from_str("{invalid json}");
        if let Err(json_err) = parse_result {
            let err: RagfantError = json_err.into();
            assert!(matches!(err, RagfantError::Json(_)));
        }
    }
}
