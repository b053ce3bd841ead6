use std::fmt::Write as FmtWrite;

use crate::models::{CourseRecord, OutputFormat, SearchResults};

pub trait Formatter {
    fn format_search_results(&self, results: &SearchResults) -> String;
    fn format_status(&self, status: &StatusInfo) -> String;
    fn format_ingest_stats(&self, stats: &IngestStats) -> String;
    fn format_courses(&self, courses: &[CourseRecord]) -> String;
    fn format_message(&self, message: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub embedding_url: String,
    pub embedding_model: String,
    pub embedding_dimension: u32,
    pub embedding_key_present: bool,
    pub vector_store_driver: String,
    pub vector_store_url: String,
    pub vector_store_connected: bool,
    pub vector_store_points: u64,
    pub collection: String,
}

#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub courses_scraped: u64,
    pub cards_skipped: u64,
    pub chunks_created: u64,
    pub duration_ms: u64,
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_search_results(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("No results found for: {}\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "Search results for: \"{}\"", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.total, results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.results.iter().enumerate() {
            writeln!(output, "{}. [Score: {:.3}]", i + 1, hit.score).unwrap();
            if let Some(ref name) = hit.metadata.course_name {
                let price = hit.metadata.course_price.as_deref().unwrap_or("-");
                writeln!(output, "   Course: {} ({})", name, price).unwrap();
            }
            writeln!(output, "   Source: {} #{}", hit.source.url, hit.source.position).unwrap();
            writeln!(output, "   ---").unwrap();

            let preview: String = hit.content.chars().take(200).collect();
            let preview = if hit.content.chars().count() > 200 {
                format!("{}...", preview)
            } else {
                preview
            };
            for line in preview.lines() {
                writeln!(output, "   {}", line).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Status").unwrap();
        writeln!(output, "------").unwrap();

        writeln!(output, "Embedding provider").unwrap();
        writeln!(output, "  URL:         {}", status.embedding_url).unwrap();
        writeln!(output, "  Model:       {}", status.embedding_model).unwrap();
        writeln!(output, "  Dimension:   {}", status.embedding_dimension).unwrap();
        let key = if status.embedding_key_present {
            "configured"
        } else {
            "MISSING"
        };
        writeln!(output, "  API key:     {}", key).unwrap();
        writeln!(output).unwrap();

        let vector_status = if status.vector_store_connected {
            "[CONNECTED]"
        } else {
            "[DISCONNECTED]"
        };
        writeln!(
            output,
            "Vector Store:  {} ({})",
            status.vector_store_driver, vector_status
        )
        .unwrap();
        if status.vector_store_connected {
            writeln!(output, "  URL:         {}", status.vector_store_url).unwrap();
            writeln!(output, "  Collection:  {}", status.collection).unwrap();
            writeln!(output, "  Points:      {}", status.vector_store_points).unwrap();
        }

        output
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        writeln!(output, "Ingest Complete").unwrap();
        writeln!(output, "---------------").unwrap();
        writeln!(output, "Courses scraped: {}", stats.courses_scraped).unwrap();
        writeln!(output, "Cards skipped: {}", stats.cards_skipped).unwrap();
        writeln!(output, "Chunks created: {}", stats.chunks_created).unwrap();
        writeln!(output, "Duration: {}ms", stats.duration_ms).unwrap();
        output
    }

    fn format_courses(&self, courses: &[CourseRecord]) -> String {
        if courses.is_empty() {
            return "No courses found.\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "Courses").unwrap();
        writeln!(output, "-------").unwrap();
        for course in courses {
            writeln!(output, "  {} ({})", course.name, course.price).unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, value: &serde_json::Value) -> String {
        if self.pretty {
            serde_json::to_string_pretty(value).unwrap()
        } else {
            serde_json::to_string(value).unwrap()
        }
    }
}

impl Formatter for JsonFormatter {
    fn format_search_results(&self, results: &SearchResults) -> String {
        if self.pretty {
            serde_json::to_string_pretty(results)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string(results).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let json = serde_json::json!({
            "embedding": {
                "url": status.embedding_url,
                "model": status.embedding_model,
                "dimension": status.embedding_dimension,
                "api_key_present": status.embedding_key_present,
            },
            "vector_store": {
                "driver": status.vector_store_driver,
                "url": status.vector_store_url,
                "connected": status.vector_store_connected,
                "collection": status.collection,
                "points": status.vector_store_points,
            }
        });
        self.render(&json)
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let json = serde_json::json!({
            "courses_scraped": stats.courses_scraped,
            "cards_skipped": stats.cards_skipped,
            "chunks_created": stats.chunks_created,
            "duration_ms": stats.duration_ms,
        });
        self.render(&json)
    }

    fn format_courses(&self, courses: &[CourseRecord]) -> String {
        let json = serde_json::json!({ "courses": courses });
        self.render(&json)
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_search_results(&self, results: &SearchResults) -> String {
        if results.is_empty() {
            return format!("## No results found\n\nQuery: `{}`\n", results.query);
        }

        let mut output = String::new();
        writeln!(output, "## Search Results\n").unwrap();
        writeln!(output, "**Query:** `{}`\n", results.query).unwrap();
        writeln!(
            output,
            "Found {} results in {}ms\n",
            results.total, results.duration_ms
        )
        .unwrap();

        for (i, hit) in results.results.iter().enumerate() {
            writeln!(output, "### {}. Score: {:.3}\n", i + 1, hit.score).unwrap();
            if let Some(ref name) = hit.metadata.course_name {
                let price = hit.metadata.course_price.as_deref().unwrap_or("-");
                writeln!(output, "**Course:** {} ({})\n", name, price).unwrap();
            }
            writeln!(
                output,
                "**Source:** `{}` (card {})\n",
                hit.source.url, hit.source.position
            )
            .unwrap();
            writeln!(output, "```").unwrap();
            writeln!(output, "{}", hit.content).unwrap();
            writeln!(output, "```\n").unwrap();
        }

        output
    }

    fn format_status(&self, status: &StatusInfo) -> String {
        let mut output = String::new();
        writeln!(output, "## Status\n").unwrap();

        writeln!(output, "### Embedding Provider\n").unwrap();
        writeln!(output, "- **URL:** `{}`", status.embedding_url).unwrap();
        writeln!(output, "- **Model:** {}", status.embedding_model).unwrap();
        writeln!(output, "- **Dimension:** {}", status.embedding_dimension).unwrap();
        writeln!(
            output,
            "- **API key:** {}",
            if status.embedding_key_present {
                "configured"
            } else {
                "missing"
            }
        )
        .unwrap();
        writeln!(output).unwrap();

        let vector_status = if status.vector_store_connected {
            "✅"
        } else {
            "❌"
        };
        writeln!(
            output,
            "### Vector Store ({}) {}\n",
            status.vector_store_driver, vector_status
        )
        .unwrap();
        writeln!(output, "- **URL:** `{}`", status.vector_store_url).unwrap();
        writeln!(output, "- **Collection:** {}", status.collection).unwrap();
        writeln!(output, "- **Points:** {}", status.vector_store_points).unwrap();

        output
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        writeln!(output, "## Ingest Complete\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Courses scraped | {} |", stats.courses_scraped).unwrap();
        writeln!(output, "| Cards skipped | {} |", stats.cards_skipped).unwrap();
        writeln!(output, "| Chunks created | {} |", stats.chunks_created).unwrap();
        writeln!(output, "| Duration | {}ms |", stats.duration_ms).unwrap();
        output
    }

    fn format_courses(&self, courses: &[CourseRecord]) -> String {
        if courses.is_empty() {
            return "## Courses\n\n*No courses found.*\n".to_string();
        }

        let mut output = String::new();
        writeln!(output, "## Courses\n").unwrap();
        writeln!(output, "| Name | Price | Details |").unwrap();
        writeln!(output, "|------|-------|---------|").unwrap();
        for course in courses {
            writeln!(
                output,
                "| {} | {} | {} |",
                course.name, course.price, course.details
            )
            .unwrap();
        }
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentMetadata, SearchHit, Source};

    fn sample_results() -> SearchResults {
        SearchResults::new(
            "rust".to_string(),
            vec![SearchHit {
                chunk_id: "abc".to_string(),
                score: 0.92,
                content: "Intro to Rust\n$49\n\nLearn ownership.".to_string(),
                source: Source::new("https://example.com/courses", 0),
                metadata: DocumentMetadata {
                    course_name: Some("Intro to Rust".to_string()),
                    course_price: Some("$49".to_string()),
                },
            }],
            42,
        )
    }

    #[test]
    fn test_text_formatter_search_results() {
        let output = TextFormatter.format_search_results(&sample_results());
        assert!(output.contains("Score: 0.920"));
        assert!(output.contains("Intro to Rust ($49)"));
    }

    #[test]
    fn test_json_formatter_is_valid_json() {
        let output = JsonFormatter::new(false).format_search_results(&sample_results());
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["total"], 1);
    }

    #[test]
    fn test_markdown_courses_table() {
        let courses = vec![CourseRecord::new("A", "$1", "B")];
        let output = MarkdownFormatter.format_courses(&courses);
        assert!(output.contains("| A | $1 | B |"));
    }
}
