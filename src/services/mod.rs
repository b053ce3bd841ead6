mod batch;
mod chunker;
mod embedding;
mod scraper;
mod vector_store;

pub use batch::process_batch;
pub use chunker::TextChunker;
pub use embedding::{Embedder, HttpEmbedder};
pub use scraper::{CourseScraper, ScrapeOutcome, parse_courses};
pub use vector_store::{CollectionInfo, VectorStore, check_dimensions, create_backend};
