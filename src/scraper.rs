//! Web scraping module for content extraction.
//!
//! Uses reqwest for fetching. Two interchangeable extractors turn the HTML into
//! readable text: [`ReadabilityExtractor`] runs a Readability port (dom_smoothie)
//! and [`SelectorExtractor`] walks CSS selectors with scraper.

use crate::config::{ExtractorBackend, ExtractorConfig};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// User-Agent string identifying this scraper
const USER_AGENT: &str = concat!(
    "precis/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/cladam/precis)"
);

/// Prefix shared by every extraction error message
pub const ERROR_MARKER: &str = "Error fetching the article";

/// Paragraphs at or below this many characters are treated as chrome, not content
const MIN_BLOCK_CHARS: usize = 20;

/// Readability gives up on documents larger than this many elements
const MAX_ELEMENTS_TO_PARSE: usize = 9000;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Error fetching the article: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("Error fetching the article: server answered {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("Error fetching the article: {0}")]
    ParseError(String),
    #[error("Error fetching the article: no content found at URL")]
    NoContent,
}

/// Extracted content from a webpage
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    /// The original URL
    pub url: String,
    /// Page title
    pub title: Option<String>,
    /// Main text content
    pub text: String,
    pub fetched_at: DateTime<Utc>,
}

impl PageContent {
    pub fn new(url: impl Into<String>, title: Option<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title,
            text: text.into(),
            fetched_at: Utc::now(),
        }
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Turns a URL into readable page text.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn extract(&self, url: &str) -> Result<PageContent, ExtractError>;
}

/// Build the extractor selected in configuration
pub fn build_extractor(
    config: &ExtractorConfig,
) -> Result<Box<dyn ContentExtractor>, ExtractError> {
    let fetcher = Fetcher::new(Duration::from_secs(config.timeout_secs))?;
    Ok(match config.backend {
        ExtractorBackend::Readability => Box::new(ReadabilityExtractor::new(fetcher)),
        ExtractorBackend::Selector => Box::new(SelectorExtractor::new(fetcher)),
    })
}

/// Shared HTTP side of both extractors
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a configured HTTP client for scraping
    pub fn new(timeout: Duration) -> Result<Self, ExtractError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch the HTML of a page
    pub async fn fetch_html(&self, url: &str) -> Result<String, ExtractError> {
        debug!(url, "fetching page");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus(status));
        }
        let html = response.text().await?;
        debug!(url, bytes = html.len(), "page fetched");
        Ok(html)
    }
}

/// Article extraction with the Readability algorithm
pub struct ReadabilityExtractor {
    fetcher: Fetcher,
}

impl ReadabilityExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    fn name(&self) -> &'static str {
        "readability"
    }

    async fn extract(&self, url: &str) -> Result<PageContent, ExtractError> {
        let html = self.fetcher.fetch_html(url).await?;
        let (title, text) = extract_article(&html, Some(url))?;
        info!(url, chars = text.chars().count(), "article extracted");
        Ok(PageContent::new(url, title, text))
    }
}

/// Text extraction by walking content selectors
pub struct SelectorExtractor {
    fetcher: Fetcher,
}

impl SelectorExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ContentExtractor for SelectorExtractor {
    fn name(&self) -> &'static str {
        "selector"
    }

    async fn extract(&self, url: &str) -> Result<PageContent, ExtractError> {
        let html = self.fetcher.fetch_html(url).await?;
        let document = Html::parse_document(&html);
        let title = extract_title(&document);
        let text = extract_text(&document);

        if text.trim().is_empty() {
            return Err(ExtractError::NoContent);
        }

        info!(url, chars = text.chars().count(), "text extracted");
        Ok(PageContent::new(url, title, text))
    }
}

/// Run Readability on a document, returning its title and plain text
pub fn extract_article(
    html: &str,
    url: Option<&str>,
) -> Result<(Option<String>, String), ExtractError> {
    let cfg = dom_smoothie::Config {
        max_elements_to_parse: MAX_ELEMENTS_TO_PARSE,
        ..Default::default()
    };

    let mut readability = dom_smoothie::Readability::new(html, url, Some(cfg))
        .map_err(|e| ExtractError::ParseError(e.to_string()))?;
    let article = readability
        .parse()
        .map_err(|e| ExtractError::ParseError(e.to_string()))?;

    let text = tidy_lines(&article.text_content.to_string());
    if text.is_empty() {
        return Err(ExtractError::NoContent);
    }

    let title = Some(article.title.trim().to_string()).filter(|t| !t.is_empty());
    Ok((title, text))
}

/// Extract the page title from <title> or <h1>
pub fn extract_title(document: &Html) -> Option<String> {
    ["title", "h1"].into_iter().find_map(|selector_str| {
        let selector = Selector::parse(selector_str).ok()?;
        let element = document.select(&selector).next()?;
        let title = collapse_whitespace(&element.text().collect::<String>());
        (!title.is_empty()).then_some(title)
    })
}

/// Extract readable text content from the page
pub fn extract_text(document: &Html) -> String {
    // Try to find main content areas first
    let main_selectors = ["article", "main", "[role='main']", ".content", "#content"];

    for selector_str in main_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = extract_blocks(element);
                if !text.trim().is_empty() {
                    return text;
                }
            }
        }
    }

    // Fall back to the whole document
    extract_blocks(document.root_element())
}

/// Extract text from paragraphs, headings and list items below `root`
fn extract_blocks(root: ElementRef<'_>) -> String {
    let Ok(content_selector) = Selector::parse("p, h1, h2, h3, h4, h5, h6, li") else {
        return String::new();
    };

    root.select(&content_selector)
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| text.chars().count() > MIN_BLOCK_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim every line and squeeze runs of blank lines into one paragraph break
fn tidy_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_break = false;
    for line in text.lines().map(collapse_whitespace) {
        if line.is_empty() {
            pending_break = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push_str(if pending_break { "\n\n" } else { "\n" });
        }
        out.push_str(&line);
        pending_break = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Understanding Ownership</title></head>
<body>
  <nav><ul><li><a href="/">Home</a></li><li><a href="/blog">Blog archive and other links</a></li></ul></nav>
  <article>
    <h1>Understanding Ownership</h1>
    <p>Ownership is a set of rules that govern how a Rust program manages memory. All programs have to manage the way they use memory while running.</p>
    <p>Some languages have garbage collection that regularly looks for no-longer-used memory as the program runs; in other languages the programmer must explicitly allocate and free the memory.</p>
    <p>Rust uses a third approach: memory is managed through a system of ownership with a set of rules that the compiler checks. If any of the rules are violated, the program will not compile.</p>
    <p>None of the features of ownership will slow down your program while it is running, which is why the model is described as a zero cost abstraction by its designers.</p>
  </article>
  <footer><p>Copyright notice for the whole site goes here.</p></footer>
</body>
</html>"#;

    #[test]
    fn selector_prefers_article_content() {
        let document = Html::parse_document(ARTICLE_PAGE);
        let text = extract_text(&document);
        assert!(text.starts_with("Understanding Ownership\n\nOwnership is a set of rules"));
        assert!(!text.contains("Blog archive"));
        assert!(!text.contains("Copyright notice"));
    }

    #[test]
    fn selector_falls_back_to_body_and_drops_short_blocks() {
        let document = Html::parse_document(
            "<html><body><p>Hi</p><div><p>This paragraph is long enough to count as content.</p></div></body></html>",
        );
        assert_eq!(
            extract_text(&document),
            "This paragraph is long enough to count as content."
        );
    }

    #[test]
    fn title_comes_from_title_then_h1() {
        let document = Html::parse_document(ARTICLE_PAGE);
        assert_eq!(extract_title(&document).as_deref(), Some("Understanding Ownership"));

        let document = Html::parse_document("<html><body><h1>  Only   heading </h1></body></html>");
        assert_eq!(extract_title(&document).as_deref(), Some("Only heading"));

        let document = Html::parse_document("<html><body><p>no title</p></body></html>");
        assert_eq!(extract_title(&document), None);
    }

    #[test]
    fn readability_finds_the_article_body() {
        let (title, text) =
            extract_article(ARTICLE_PAGE, Some("https://example.com/ownership")).unwrap();
        assert!(title.unwrap().contains("Ownership"));
        assert!(text.contains("Rust uses a third approach"));
        assert!(!text.contains("Blog archive"));
    }

    #[test]
    fn readability_rejects_empty_documents() {
        assert!(extract_article("<html><body></body></html>", None).is_err());
    }

    #[test]
    fn errors_carry_the_marker() {
        assert!(ExtractError::NoContent.to_string().starts_with(ERROR_MARKER));
        assert!(ExtractError::ParseError("bad".into())
            .to_string()
            .starts_with(ERROR_MARKER));
        assert!(ExtractError::HttpStatus(reqwest::StatusCode::NOT_FOUND)
            .to_string()
            .starts_with(ERROR_MARKER));
    }

    #[test]
    fn tidy_lines_squeezes_blank_runs() {
        assert_eq!(tidy_lines("\n  one \n two\n\n\n  three  \n\n"), "one\ntwo\n\nthree");
        assert_eq!(tidy_lines("   \n\n"), "");
    }

    #[test]
    fn build_extractor_follows_backend() {
        let mut config = ExtractorConfig::default();
        assert_eq!(build_extractor(&config).unwrap().name(), "readability");
        config.backend = ExtractorBackend::Selector;
        assert_eq!(build_extractor(&config).unwrap().name(), "selector");
    }
}
