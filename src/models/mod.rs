mod chat;
mod config;
mod course;
mod document;

pub use chat::{ChatRequest, ChatResponse, OutputFormat, SearchHit, SearchResults};
pub use config::{
    ChunkingConfig, Config, DEFAULT_BIND, DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIMENSION,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL, DEFAULT_QDRANT_URL, EmbeddingConfig,
    ScraperConfig, SearchConfig, ServerConfig, VectorDriver, VectorStoreConfig,
};
pub use course::CourseRecord;
pub use document::{Document, DocumentChunk, DocumentMetadata, Source};
