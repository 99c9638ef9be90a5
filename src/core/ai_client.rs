// src/core/ai_client.rs
//! HTTP client for the hosted AI gateway: document text extraction and
//! structured object generation.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, trace};

const EXTRACT_TEXT_ENDPOINT: &str = "/extract-text";
const GENERATE_OBJECT_ENDPOINT: &str = "/generate-object";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ExtractTextResponse {
    text: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct GenerateObjectResponse {
    object: Value,
    status: String,
}

pub struct AiClient {
    client: reqwest::Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Extract plain text from an uploaded document (PDF, DOCX, or image OCR).
    pub async fn extract_text(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, EXTRACT_TEXT_ENDPOINT);

        let form = Form::new().part(
            "file",
            Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str(content_type)
                .context("Failed to create multipart")?,
        );

        info!("Calling text extraction service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        trace!("Response status: {}", status);

        if status.is_success() {
            let extraction: ExtractTextResponse = response
                .json()
                .await
                .context("Failed to parse text extraction response")?;

            if extraction.status == "success" {
                Ok(extraction.text)
            } else {
                anyhow::bail!("Text extraction failed: {}", extraction.status)
            }
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            error!("Text extraction service error: {}", error_text);
            anyhow::bail!("Service returned error status {}: {}", status, error_text)
        }
    }

    /// Generate a JSON object conforming (loosely) to the given schema.
    pub async fn generate_object(&self, prompt: &str, schema: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, GENERATE_OBJECT_ENDPOINT);

        let payload = serde_json::json!({
            "prompt": prompt,
            "schema": schema,
        });

        trace!("Calling structured generation service: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .context("Failed to call structured generation service")?;

        let status = response.status();
        if status.is_success() {
            let generated: GenerateObjectResponse = response
                .json()
                .await
                .context("Failed to parse structured generation response")?;

            if generated.status == "success" {
                Ok(generated.object)
            } else {
                anyhow::bail!("Structured generation failed: {}", generated.status)
            }
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!(
                "Structured generation failed with status {}: {}",
                status,
                error_text
            )
        }
    }
}
