//! Text chunking with overlap for embedding.

use crate::models::{ChunkingConfig, Document, DocumentChunk};
use crate::utils::text::has_meaningful_content;

/// Text chunker that splits documents into overlapping windows.
///
/// Deterministic for a given input and configuration. Non-empty input
/// always yields at least one chunk, and the chunk spans cover the whole
/// input.
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap size in characters
    overlap: usize,
}

impl TextChunker {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&ChunkingConfig::default())
    }

    /// Chunk a document into overlapping segments.
    pub fn chunk(&self, document: &Document) -> Vec<DocumentChunk> {
        let content = &document.content;

        if content.is_empty() {
            return Vec::new();
        }

        let total_chars = content.chars().count();

        // Content that fits one window is a single chunk; a course record
        // and its chunk coincide in that case.
        if total_chars <= self.chunk_size {
            return vec![DocumentChunk::from_document(
                document,
                content.clone(),
                0,
                1,
                0,
                total_chars as u64,
            )];
        }

        let spans = self.split_with_overlap(content);
        let filtered: Vec<_> = spans
            .into_iter()
            .filter(|(text, _, _)| has_meaningful_content(text))
            .collect();

        // The filter must never leave non-empty input with zero chunks
        if filtered.is_empty() {
            return vec![DocumentChunk::from_document(
                document,
                content.clone(),
                0,
                1,
                0,
                total_chars as u64,
            )];
        }

        let total_chunks = filtered.len() as u32;
        filtered
            .into_iter()
            .enumerate()
            .map(|(idx, (text, start, end))| {
                DocumentChunk::from_document(document, text, idx as u32, total_chunks, start, end)
            })
            .collect()
    }

    /// Split content into overlapping windows with character offsets.
    fn split_with_overlap(&self, content: &str) -> Vec<(String, u64, u64)> {
        let chars: Vec<char> = content.chars().collect();
        let total = chars.len();
        let mut spans = Vec::new();
        let mut start = 0usize;

        while start < total {
            let target_end = (start + self.chunk_size).min(total);
            let end = self.find_break_point(&chars, target_end, total);

            let text: String = chars[start..end].iter().collect();
            spans.push((text, start as u64, end as u64));

            if end >= total {
                break;
            }

            // The next window starts `overlap` characters before the break
            // position, so backing off to a boundary cannot skip text.
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        spans
    }

    /// Find a natural break point near the target end position.
    /// Priority: paragraph break > newline > sentence end > space.
    fn find_break_point(&self, chars: &[char], target_end: usize, total: usize) -> usize {
        if target_end >= total {
            return total;
        }

        // Search the last 20% of the window
        let search_start = target_end.saturating_sub(self.chunk_size / 5);
        let search_range = &chars[search_start..target_end];

        let mut paragraph = None;
        let mut newline = None;
        let mut sentence = None;
        let mut space = None;

        for (i, c) in search_range.iter().enumerate() {
            let pos = search_start + i;
            match c {
                '\n' => {
                    if i > 0 && search_range.get(i - 1) == Some(&'\n') {
                        paragraph = Some(pos + 1);
                    }
                    newline = Some(pos + 1);
                }
                '.' | '!' | '?' => {
                    if search_range.get(i + 1).is_some_and(|c| c.is_whitespace()) {
                        sentence = Some(pos + 1);
                    }
                }
                ' ' | '\t' => {
                    space = Some(pos + 1);
                }
                _ => {}
            }
        }

        paragraph
            .or(newline)
            .or(sentence)
            .or(space)
            .unwrap_or(target_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentMetadata, Source};

    fn test_document(content: &str) -> Document {
        Document::new(
            content.to_string(),
            Source::new("https://example.com/courses", 0),
            DocumentMetadata::default(),
        )
    }

    fn config(chunk_size: usize, chunk_overlap: usize) -> ChunkingConfig {
        ChunkingConfig {
            chunk_size,
            chunk_overlap,
        }
    }

    #[test]
    fn test_small_document_single_chunk() {
        let chunker = TextChunker::with_defaults();
        let doc = test_document("Intro to Rust\n$49\n\nLearn ownership.");
        let chunks = chunker.chunk(&doc);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, doc.content);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].total_chunks, 1);
    }

    #[test]
    fn test_empty_document() {
        let chunker = TextChunker::with_defaults();
        let doc = test_document("");
        assert!(chunker.chunk(&doc).is_empty());
    }

    #[test]
    fn test_non_empty_input_never_yields_zero_chunks() {
        // Longer than one window but with too little real content for the
        // meaningful-content filter
        let chunker = TextChunker::new(&config(100, 20));
        let content = format!("{}hi", " ".repeat(300));
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, content);
    }

    #[test]
    fn test_chunk_indices_and_totals() {
        let chunker = TextChunker::new(&config(200, 40));
        let content = "The course covers traits and generics in depth. ".repeat(30);
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert_eq!(chunk.total_chunks, chunks.len() as u32);
        }
    }

    #[test]
    fn test_spans_cover_entire_input() {
        let chunker = TextChunker::new(&config(150, 30));
        let content = "Module one introduces syntax.\n\nModule two covers the borrow checker, \
                       which takes a while. Module three is about async and the tokio runtime. "
            .repeat(10);
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);
        let total = content.chars().count() as u64;

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].start_offset, 0);
        for pair in chunks.windows(2) {
            // No gap between consecutive spans
            assert!(pair[1].start_offset <= pair[0].end_offset);
        }
        assert_eq!(chunks.last().unwrap().end_offset, total);
    }

    #[test]
    fn test_deterministic() {
        let chunker = TextChunker::new(&config(120, 30));
        let content = "Lesson text with sentences. More sentences follow here. ".repeat(20);
        let doc = test_document(&content);

        let a: Vec<String> = chunker.chunk(&doc).into_iter().map(|c| c.content).collect();
        let b: Vec<String> = chunker.chunk(&doc).into_iter().map(|c| c.content).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_prefers_sentence_boundaries() {
        let chunker = TextChunker::new(&config(100, 20));
        let content = "First sentence is here. Second sentence is also here. Third one. ".repeat(5);
        let doc = test_document(&content);
        let chunks = chunker.chunk(&doc);

        // Every non-final chunk should end at a whitespace-adjacent break
        for chunk in &chunks[..chunks.len() - 1] {
            let last = chunk.content.chars().next_back();
            assert!(
                last.is_some_and(|c| c.is_whitespace() || c == '.'),
                "chunk ended mid-word: {:?}",
                chunk.content
            );
        }
    }
}
