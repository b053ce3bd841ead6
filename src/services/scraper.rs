//! Course listing scraper.
//!
//! Fetches one listing page and extracts course records from the page's
//! fixed card schema. Parsing is separated from fetching so it can run
//! against raw HTML.

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

use crate::error::ScrapeError;
use crate::models::{CourseRecord, ScraperConfig};
use crate::utils::retry::{RetryConfig, with_retry};
use crate::utils::text::collapse_whitespace;

/// CSS classes of the listing page's fixed schema.
const COURSE_CARD: &str = "div.course-card";
const COURSE_NAME: &str = "h2.course-name";
const COURSE_PRICE: &str = "span.course-price";
const COURSE_DETAILS: &str = "p.course-details";

/// Outcome of scraping one listing page.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// One record per card with all three fields present.
    pub records: Vec<CourseRecord>,
    /// Cards dropped because name, price, or details was missing or empty.
    pub skipped: u32,
}

/// HTTP client for course listing pages.
pub struct CourseScraper {
    client: Client,
    retry: RetryConfig,
}

impl CourseScraper {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            retry: RetryConfig::default(),
        })
    }

    /// Fetch a listing page. Non-2xx responses are typed errors carrying
    /// the status code and URL.
    pub async fn fetch(&self, url: &Url) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::Request {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| ScrapeError::Request {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetch and parse in one step, retrying transient fetch failures.
    pub async fn scrape(&self, url: &Url) -> Result<ScrapeOutcome, ScrapeError> {
        let html = with_retry(&self.retry, || self.fetch(url)).await?;
        parse_courses(&html)
    }
}

/// Extract course records from listing page HTML.
///
/// Cards missing any of the three expected fields are skipped and
/// counted, never a hard error.
pub fn parse_courses(html: &str) -> Result<ScrapeOutcome, ScrapeError> {
    let document = Html::parse_document(html);
    let card_selector = parse_selector(COURSE_CARD)?;
    let name_selector = parse_selector(COURSE_NAME)?;
    let price_selector = parse_selector(COURSE_PRICE)?;
    let details_selector = parse_selector(COURSE_DETAILS)?;

    let mut records = Vec::new();
    let mut skipped = 0u32;

    for card in document.select(&card_selector) {
        let name = child_text(&card, &name_selector);
        let price = child_text(&card, &price_selector);
        let details = child_text(&card, &details_selector);

        match (name, price, details) {
            (Some(name), Some(price), Some(details)) => {
                records.push(CourseRecord::new(name, price, details));
            }
            _ => skipped += 1,
        }
    }

    Ok(ScrapeOutcome { records, skipped })
}

fn parse_selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(e.to_string()))
}

fn child_text(card: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const LISTING_HTML: &str = r#"
        <html><body>
          <div class="course-card">
            <h2 class="course-name">  Intro to Rust  </h2>
            <span class="course-price">$49</span>
            <p class="course-details">
                Learn ownership,
                borrowing, and lifetimes.
            </p>
          </div>
          <div class="course-card">
            <h2 class="course-name">Async in Practice</h2>
            <span class="course-price">$99</span>
            <p class="course-details">Futures and executors.</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_returns_one_record_per_card() {
        let outcome = parse_courses(LISTING_HTML).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.skipped, 0);

        let first = &outcome.records[0];
        assert_eq!(first.name, "Intro to Rust");
        assert_eq!(first.price, "$49");
        assert_eq!(first.details, "Learn ownership, borrowing, and lifetimes.");
    }

    #[test]
    fn test_parse_skips_incomplete_cards() {
        let html = r#"
            <div class="course-card">
              <h2 class="course-name">No price here</h2>
              <p class="course-details">Details only.</p>
            </div>
            <div class="course-card">
              <h2 class="course-name">Complete</h2>
              <span class="course-price">$10</span>
              <p class="course-details">Ok.</p>
            </div>
        "#;
        let outcome = parse_courses(html).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "Complete");
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_parse_empty_page() {
        let outcome = parse_courses("<html><body></body></html>").unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped, 0);
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/courses")
                    .header("user-agent", ScraperConfig::default().user_agent);
                then.status(200).body(LISTING_HTML);
            })
            .await;

        let scraper = CourseScraper::new(&ScraperConfig::default()).unwrap();
        let url = Url::parse(&server.url("/courses")).unwrap();
        let html = scraper.fetch(&url).await.unwrap();

        mock.assert_async().await;
        assert!(html.contains("course-card"));
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_typed_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing");
                then.status(404);
            })
            .await;

        let scraper = CourseScraper::new(&ScraperConfig::default()).unwrap();
        let url = Url::parse(&server.url("/missing")).unwrap();

        match scraper.fetch(&url).await {
            Err(ScrapeError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_scrape_end_to_end() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/listing");
                then.status(200).body(LISTING_HTML);
            })
            .await;

        let scraper = CourseScraper::new(&ScraperConfig::default()).unwrap();
        let url = Url::parse(&server.url("/listing")).unwrap();
        let outcome = scraper.scrape(&url).await.unwrap();
        assert_eq!(outcome.records.len(), 2);
    }
}
