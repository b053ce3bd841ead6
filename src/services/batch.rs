use crate::error::{EmbeddingError, IngestError};
use crate::models::DocumentChunk;
use crate::services::embedding::Embedder;
use crate::services::vector_store::VectorStore;
use crate::utils::retry::{RetryConfig, with_retry};

/// Embed the pending texts, attach the vectors to their chunks, and
/// upsert the batch. Transient provider and store failures are retried
/// with backoff; anything else fails the batch.
pub async fn process_batch(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    retry: &RetryConfig,
    chunks: &mut Vec<DocumentChunk>,
    texts: &mut Vec<String>,
) -> Result<(), IngestError> {
    if texts.is_empty() {
        return Ok(());
    }

    let batch = std::mem::take(texts);
    let embeddings = with_retry(retry, || embedder.embed(batch.clone())).await?;

    // A short response would silently pair vectors with the wrong chunks
    if embeddings.len() != chunks.len() {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {} embeddings, got {}",
            chunks.len(),
            embeddings.len()
        ))
        .into());
    }

    for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
        chunk.embedding = embedding;
    }

    let pending = std::mem::take(chunks);
    with_retry(retry, || store.upsert_chunks(pending.clone())).await?;

    Ok(())
}
