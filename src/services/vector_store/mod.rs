//! Vector store abstraction layer.
//!
//! This module provides a trait-based abstraction over the vector index
//! backends (Qdrant, PostgreSQL/pgvector), selected by configuration.

mod pgvector;
mod qdrant;

pub use pgvector::PgVectorBackend;
pub use qdrant::QdrantBackend;

use async_trait::async_trait;

use crate::error::VectorStoreError;
use crate::models::{DocumentChunk, SearchHit, VectorDriver, VectorStoreConfig};

/// Collection/table information
#[derive(Debug, Clone)]
pub struct CollectionInfo {
    pub points_count: u64,
}

/// Abstract trait for vector index operations.
///
/// All backends must implement this trait so the pipeline and CLI never
/// depend on a concrete SDK.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check if the vector store is healthy and accessible.
    async fn health_check(&self) -> Result<bool, VectorStoreError>;

    /// Get information about the current collection.
    /// Returns None if the collection doesn't exist.
    async fn get_collection_info(&self) -> Result<Option<CollectionInfo>, VectorStoreError>;

    /// Create the collection if it doesn't exist. The existence probe runs
    /// first, so creation is attempted at most once per run for an absent
    /// collection and never for a present one.
    async fn create_collection(&self) -> Result<(), VectorStoreError>;

    /// Insert or update chunks with their embeddings. Fails the whole
    /// batch before any network write if a vector's dimension does not
    /// match the collection's.
    async fn upsert_chunks(&self, chunks: Vec<DocumentChunk>) -> Result<(), VectorStoreError>;

    /// Nearest-neighbor search by cosine similarity.
    async fn search(
        &self,
        query_vector: Vec<f32>,
        limit: u64,
        min_score: Option<f32>,
    ) -> Result<Vec<SearchHit>, VectorStoreError>;

    /// Remove every point from the collection. No-op if the collection
    /// doesn't exist.
    async fn clear_collection(&self) -> Result<(), VectorStoreError>;

    /// Get the collection name.
    fn collection(&self) -> &str;
}

/// Validate every chunk's vector against the collection dimension.
/// Backends call this before issuing the upsert.
pub fn check_dimensions(chunks: &[DocumentChunk], expected: u64) -> Result<(), VectorStoreError> {
    for chunk in chunks {
        if chunk.embedding.len() as u64 != expected {
            return Err(VectorStoreError::DimensionMismatch {
                chunk_id: chunk.id.clone(),
                expected,
                actual: chunk.embedding.len(),
            });
        }
    }
    Ok(())
}

/// Create a vector store backend for the configured driver and embedding
/// dimension.
pub async fn create_backend(
    config: &VectorStoreConfig,
    embedding_dim: u64,
) -> Result<Box<dyn VectorStore>, VectorStoreError> {
    match config.driver {
        VectorDriver::Qdrant => {
            let backend = QdrantBackend::new(config, embedding_dim)?;
            Ok(Box::new(backend))
        }
        VectorDriver::Postgres => {
            let backend = PgVectorBackend::new(config, embedding_dim).await?;
            Ok(Box::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseRecord, Document, Source};

    fn chunk_with_vector(vector: Vec<f32>) -> DocumentChunk {
        let record = CourseRecord::new("Course", "$1", "Details.");
        let doc = Document::from_course(&record, Source::new("https://example.com", 0));
        let mut chunk = DocumentChunk::from_document(&doc, doc.content.clone(), 0, 1, 0, 10);
        chunk.embedding = vector;
        chunk
    }

    #[test]
    fn test_check_dimensions_accepts_matching() {
        let chunks = vec![chunk_with_vector(vec![0.0; 512])];
        assert!(check_dimensions(&chunks, 512).is_ok());
    }

    #[test]
    fn test_check_dimensions_rejects_mismatch() {
        let chunks = vec![
            chunk_with_vector(vec![0.0; 512]),
            chunk_with_vector(vec![0.0; 256]),
        ];
        match check_dimensions(&chunks, 512) {
            Err(VectorStoreError::DimensionMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 512);
                assert_eq!(actual, 256);
            }
            other => panic!("expected dimension mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_check_dimensions_rejects_missing_embedding() {
        let chunks = vec![chunk_with_vector(Vec::new())];
        assert!(check_dimensions(&chunks, 512).is_err());
    }
}
