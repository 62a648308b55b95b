//! String translation through the Google Cloud Translation v2 REST API.

use crate::config::{Config, DEFAULT_TRANSLATE_URL};
use crate::error::{PrepaceError, Result};
use crate::translate::StringTranslator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Single-shot string translator. Never retries; callers decide what a
/// failure means.
pub struct CloudTranslateClient {
    client: Client,
    api_key: String,
    url: String,
}

impl CloudTranslateClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            url: DEFAULT_TRANSLATE_URL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .translate_key()
            .ok_or_else(|| PrepaceError::Config("No translation API key configured".to_string()))?
            .to_string();
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            api_key,
            url: config.translate_url.clone(),
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Deserialize, Debug)]
struct TranslateResponse {
    data: Option<TranslateData>,
    error: Option<TranslateError>,
}

#[derive(Deserialize, Debug)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

#[derive(Deserialize, Debug)]
struct TranslateError {
    message: String,
}

#[async_trait]
impl StringTranslator for CloudTranslateClient {
    async fn translate_string(&self, text: &str, language_code: &str) -> Result<String> {
        debug!("Translating {} chars to {}", text.len(), language_code);

        let request = TranslateRequest {
            q: text,
            target: language_code,
            format: "text",
        };

        let response = self
            .client
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| PrepaceError::RemoteUnavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PrepaceError::RemoteUnavailable(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(PrepaceError::RemoteUnavailable(format!(
                "translation API error ({}): {}",
                status, body
            )));
        }

        let parsed: TranslateResponse = serde_json::from_str(&body).map_err(|e| {
            PrepaceError::RemoteUnavailable(format!("malformed translation response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            return Err(PrepaceError::RemoteUnavailable(error.message));
        }

        let translated = parsed
            .data
            .and_then(|d| d.translations.into_iter().next())
            .map(|t| t.translated_text)
            .unwrap_or_default();

        if translated.trim().is_empty() {
            return Err(PrepaceError::RemoteUnavailable(
                "translation API returned no text".to_string(),
            ));
        }

        Ok(translated)
    }

    fn name(&self) -> &'static str {
        "cloud-translate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = CloudTranslateClient::new("test-key".to_string());
        assert_eq!(client.name(), "cloud-translate");
        assert_eq!(client.url, DEFAULT_TRANSLATE_URL);
    }

    #[test]
    fn test_from_config_uses_gemini_key_fallback() {
        let mut config = Config::default();
        assert!(CloudTranslateClient::from_config(&config).is_err());

        config.gemini_api_key = Some("gem".to_string());
        config.translate_url = "http://localhost:1234/t".to_string();
        let client = CloudTranslateClient::from_config(&config).unwrap();
        assert_eq!(client.api_key, "gem");
        assert_eq!(client.url, "http://localhost:1234/t");
    }

    #[test]
    fn test_response_parsing() {
        let parsed: TranslateResponse = serde_json::from_str(
            r#"{"data":{"translations":[{"translatedText":"Eau","detectedSourceLanguage":"en"}]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.data.unwrap().translations[0].translated_text, "Eau");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_remote_unavailable() {
        let client =
            CloudTranslateClient::new("test-key".to_string()).with_url("http://127.0.0.1:9/translate");
        let err = client.translate_string("Water", "fr").await.unwrap_err();
        assert!(matches!(err, PrepaceError::RemoteUnavailable(_)));
    }
}
