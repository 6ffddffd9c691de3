// Copyright 2026-Present the auditwatch authors
// SPDX-License-Identifier: Apache-2.0

/// Errors produced while turning a document batch into reports or alerts.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The store handed back a document that violates the ingest contract,
    /// e.g. audit entries without a `source` sub-document. The run fails
    /// rather than fabricating or skipping data.
    #[error("log document violates the data contract: {0}")]
    DataContract(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = EngineError::DataContract("audit entries without source".to_string());
        assert_eq!(
            error.to_string(),
            "log document violates the data contract: audit entries without source"
        );
    }
}
