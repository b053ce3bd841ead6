use serde::{Deserialize, Serialize};

use super::course::CourseRecord;

/// Where a document came from: the listing page URL and the card's
/// position on that page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub position: u32,
}

impl Source {
    pub fn new(url: impl Into<String>, position: u32) -> Self {
        Self {
            url: url.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub course_name: Option<String>,
    pub course_price: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub source: Source,
    pub checksum: String,
    pub metadata: DocumentMetadata,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: String,
    pub document_id: String,
    pub content: String,
    pub chunk_index: u32,
    pub total_chunks: u32,
    pub start_offset: u64,
    pub end_offset: u64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    pub source: Source,
    pub metadata: DocumentMetadata,
    pub checksum: String,
    pub created_at: String,
}

impl Document {
    /// Identity is derived from the source, so re-ingesting the same page
    /// overwrites rather than duplicates.
    pub fn generate_id(source: &Source) -> String {
        use sha2::{Digest, Sha256};
        let input = format!("{}:{}", source.url, source.position);
        let hash = Sha256::digest(input.as_bytes());
        hex::encode(&hash[..16])
    }

    pub fn new(content: String, source: Source, metadata: DocumentMetadata) -> Self {
        use sha2::{Digest, Sha256};
        let id = Self::generate_id(&source);
        let checksum = hex::encode(Sha256::digest(content.as_bytes()));
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id,
            content,
            source,
            checksum,
            metadata,
            created_at: now,
        }
    }

    /// Build the document for one scraped course card.
    pub fn from_course(record: &CourseRecord, source: Source) -> Self {
        let metadata = DocumentMetadata {
            course_name: Some(record.name.clone()),
            course_price: Some(record.price.clone()),
        };
        Self::new(record.to_text(), source, metadata)
    }
}

impl DocumentChunk {
    pub fn generate_id(document_id: &str, chunk_index: u32) -> String {
        use uuid::Uuid;
        let name = format!("{}:{}", document_id, chunk_index);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_document(
        document: &Document,
        content: String,
        chunk_index: u32,
        total_chunks: u32,
        start_offset: u64,
        end_offset: u64,
    ) -> Self {
        let id = Self::generate_id(&document.id, chunk_index);
        Self {
            id,
            document_id: document.id.clone(),
            content,
            chunk_index,
            total_chunks,
            start_offset,
            end_offset,
            embedding: Vec::new(),
            source: document.source.clone(),
            metadata: document.metadata.clone(),
            checksum: document.checksum.clone(),
            created_at: document.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_generate_id() {
        let source = Source::new("https://example.com/courses", 0);
        let id = Document::generate_id(&source);
        assert_eq!(id.len(), 32);

        // Same source, same id; different position, different id
        assert_eq!(id, Document::generate_id(&source));
        let other = Source::new("https://example.com/courses", 1);
        assert_ne!(id, Document::generate_id(&other));
    }

    #[test]
    fn test_chunk_generate_id_deterministic() {
        let id = DocumentChunk::generate_id("abc123", 5);
        assert_eq!(id.len(), 36);
        assert_eq!(id.chars().filter(|c| *c == '-').count(), 4);
        assert_eq!(id, DocumentChunk::generate_id("abc123", 5));
        assert_ne!(id, DocumentChunk::generate_id("abc123", 6));
    }

    #[test]
    fn test_document_from_course() {
        let record = CourseRecord::new("Intro to Rust", "$49", "Learn ownership.");
        let doc = Document::from_course(&record, Source::new("https://example.com", 2));
        assert!(!doc.id.is_empty());
        assert!(doc.content.contains("Intro to Rust"));
        assert_eq!(doc.metadata.course_name.as_deref(), Some("Intro to Rust"));
        assert_eq!(doc.metadata.course_price.as_deref(), Some("$49"));
        assert_eq!(doc.checksum.len(), 64);
    }
}
