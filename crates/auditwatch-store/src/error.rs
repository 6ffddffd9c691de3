// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

/// Errors from the log-store boundary. Query failures are fatal to the run
/// and are not retried here.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search rejected with status {status}: {body}")]
    Rejected {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("search response violates the document contract: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = StoreError::InvalidConfig("empty url".to_string());
        assert_eq!(error.to_string(), "invalid store configuration: empty url");

        let error = StoreError::Rejected {
            status: reqwest::StatusCode::BAD_REQUEST,
            body: "parse error".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "search rejected with status 400 Bad Request: parse error"
        );
    }
}
