// src/extraction/scraper.rs
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{info, warn};

/// Raw text pulled from a public profile page, plus page metadata.
#[derive(Debug, Clone)]
pub struct ScrapedProfile {
    pub markdown: String,
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct ProfileScraper {
    client: Client,
}

impl ProfileScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> Result<ScrapedProfile> {
        info!("Fetching profile page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch profile page")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;
        let document = Html::parse_document(&html);

        let markdown = self
            .extract_profile_text(&document)
            .context("Failed to extract profile content from page")?;

        let profile = ScrapedProfile {
            markdown,
            title: self.page_title(&document),
            description: self.meta_description(&document),
        };

        info!(
            "Scraped {} chars of profile content from {}",
            profile.markdown.len(),
            url
        );
        Ok(profile)
    }

    fn extract_profile_text(&self, document: &Html) -> Option<String> {
        // Public LinkedIn profile layout first, then generic page structure.
        let profile_selectors = [
            ".top-card-layout__card",
            ".core-section-container",
            "section.summary",
            ".profile-section",
        ];

        let sections = self.collect_sections(document, &profile_selectors);
        if !sections.is_empty() {
            return Some(sections.join("\n\n"));
        }

        warn!("Falling back to generic page text extraction");
        let generic_selectors = ["main", "article", "body"];
        for selector_str in &generic_selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    let text = Self::clean_text(&element.text().collect::<Vec<_>>().join(" "));
                    if text.len() > 50 {
                        return Some(text);
                    }
                }
            }
        }
        None
    }

    fn collect_sections(&self, document: &Html, selectors: &[&str]) -> Vec<String> {
        let mut sections = Vec::new();
        for selector_str in selectors {
            if let Ok(selector) = Selector::parse(selector_str) {
                for element in document.select(&selector) {
                    let text = Self::clean_text(&element.text().collect::<Vec<_>>().join(" "));
                    if text.len() > 20 && !sections.contains(&text) {
                        sections.push(text);
                    }
                }
            }
        }
        sections
    }

    fn page_title(&self, document: &Html) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        let element = document.select(&selector).next()?;
        let title = Self::clean_text(&element.text().collect::<Vec<_>>().join(" "));
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }

    fn meta_description(&self, document: &Html) -> Option<String> {
        for selector_str in [
            "meta[name='description']",
            "meta[property='og:description']",
        ] {
            if let Ok(selector) = Selector::parse(selector_str) {
                if let Some(element) = document.select(&selector).next() {
                    if let Some(content) = element.value().attr("content") {
                        let cleaned = Self::clean_text(content);
                        if !cleaned.is_empty() {
                            return Some(cleaned);
                        }
                    }
                }
            }
        }
        None
    }

    fn clean_text(text: &str) -> String {
        text.lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_sections_and_metadata() {
        let html = r#"
            <html>
              <head>
                <title> Jane Doe - Recruiter </title>
                <meta name="description" content="Senior recruiter in Singapore">
              </head>
              <body>
                <div class="top-card-layout__card">Jane Doe Senior Recruiter at Acme Talent</div>
                <div class="core-section-container">10 years of executive search across APAC</div>
              </body>
            </html>
        "#;
        let scraper = ProfileScraper::new().unwrap();
        let document = Html::parse_document(html);

        let text = scraper.extract_profile_text(&document).unwrap();
        assert!(text.contains("Jane Doe Senior Recruiter"));
        assert!(text.contains("executive search across APAC"));
        assert_eq!(scraper.page_title(&document).as_deref(), Some("Jane Doe - Recruiter"));
        assert_eq!(
            scraper.meta_description(&document).as_deref(),
            Some("Senior recruiter in Singapore")
        );
    }

    #[test]
    fn test_generic_fallback_uses_main_content() {
        let html = r#"
            <html><body>
              <main>A plain profile page with enough text to be considered meaningful content.</main>
            </body></html>
        "#;
        let scraper = ProfileScraper::new().unwrap();
        let document = Html::parse_document(html);
        let text = scraper.extract_profile_text(&document).unwrap();
        assert!(text.starts_with("A plain profile page"));
    }
}
