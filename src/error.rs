//! Error types for coursebot.

use thiserror::Error;

use crate::utils::retry::Retryable;

/// Errors related to fetching and parsing course listing pages.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to retrieve {url}: status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("failed to build http client: {0}")]
    Client(String),
}

impl Retryable for ScrapeError {
    fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Request { source, .. } => source.is_timeout() || source.is_connect(),
            // Rate limits and upstream hiccups are worth another attempt
            ScrapeError::Status { status, .. } => {
                matches!(*status, 429 | 502 | 503 | 504)
            }
            ScrapeError::Selector(_) | ScrapeError::Client(_) => false,
        }
    }
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding api key is not configured (set EMBEDDING_API_KEY or [embedding].api_key)")]
    MissingApiKey,

    #[error("failed to connect to embedding provider: {0}")]
    ConnectionError(String),

    #[error("embedding provider returned status {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: u32, actual: usize },

    #[error("embedding request timed out")]
    Timeout,
}

impl Retryable for EmbeddingError {
    fn is_retryable(&self) -> bool {
        match self {
            EmbeddingError::ConnectionError(_) | EmbeddingError::Timeout => true,
            EmbeddingError::ServerError { status, .. } => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            EmbeddingError::RequestError(e) => e.is_timeout() || e.is_connect(),
            EmbeddingError::MissingApiKey
            | EmbeddingError::InvalidResponse(_)
            | EmbeddingError::DimensionMismatch { .. } => false,
        }
    }
}

/// Errors related to vector store operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to vector store: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),

    #[error("search error: {0}")]
    SearchError(String),

    #[error("delete error: {0}")]
    DeleteError(String),

    #[error("postgres error: {0}")]
    PostgresError(String),

    #[error("pgvector extension error: {0}")]
    PgVectorExtension(String),

    #[error("vector dimension mismatch: collection expects {expected}, chunk {chunk_id} has {actual}")]
    DimensionMismatch {
        chunk_id: String,
        expected: u64,
        actual: usize,
    },
}

impl Retryable for VectorStoreError {
    fn is_retryable(&self) -> bool {
        match self {
            VectorStoreError::ConnectionError(_) => true,
            VectorStoreError::CollectionError(msg)
            | VectorStoreError::UpsertError(msg)
            | VectorStoreError::SearchError(msg)
            | VectorStoreError::DeleteError(msg)
            | VectorStoreError::PostgresError(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout")
                    || msg.contains("connection")
                    || msg.contains("unavailable")
                    || msg.contains("too many")
            }
            VectorStoreError::PgVectorExtension(_)
            | VectorStoreError::DimensionMismatch { .. } => false,
        }
    }
}

/// Errors from the embed-and-upsert half of the ingest pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Application-level errors surfaced by the long-running server path.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("server error: {0}")]
    Server(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_status_retryable() {
        let err = ScrapeError::Status {
            url: "http://example.com".to_string(),
            status: 503,
        };
        assert!(err.is_retryable());

        let err = ScrapeError::Status {
            url: "http://example.com".to_string(),
            status: 404,
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_embedding_dimension_mismatch_not_retryable() {
        let err = EmbeddingError::DimensionMismatch {
            expected: 512,
            actual: 1024,
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_vector_store_transient_messages() {
        assert!(VectorStoreError::UpsertError("connection reset".to_string()).is_retryable());
        assert!(!VectorStoreError::UpsertError("invalid point id".to_string()).is_retryable());
    }
}
