use std::time::Duration;

use anyhow::{Context, Error, Result, anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::chat::{Turn, TurnRole};

pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<TurnRole>,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn new(role: TurnRole, text: &'a str) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part { text }],
        }
    }
}

impl<'a> From<&'a Turn> for Content<'a> {
    fn from(turn: &'a Turn) -> Self {
        Content::new(turn.role, &turn.text)
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
    // Set on thought summaries which are not part of the answer
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub input_token_limit: Option<u64>,
    #[serde(default)]
    pub output_token_limit: Option<u64>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl Model {
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT_METHOD)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<Model>,
    next_page_token: Option<String>,
}

/// Client for the Gemini REST API. Holds no per-conversation state so
/// one instance is created at startup and shared by every request.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_hostname: String,
    api_key: String,
    model: String,
    system_instruction: Option<String>,
}

impl GeminiClient {
    pub fn new(
        api_hostname: &str,
        api_key: &str,
        model: &str,
        system_instruction: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;

        Ok(Self {
            client,
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_instruction: system_instruction.map(|s| s.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send `message` as the next user turn following `history` and
    /// return the model's reply text.
    pub async fn generate(&self, history: &[Turn], message: &str) -> Result<String, Error> {
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::new(TurnRole::User, message));
        let payload = GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_deref().map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
        };

        let url = format!(
            "{}/v1beta/models/{}:{}",
            self.api_hostname,
            self.model.trim_start_matches("models/"),
            GENERATE_CONTENT_METHOD
        );
        tracing::debug!(
            "Gemini request to model {} with {} prior turns",
            self.model,
            history.len()
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Gemini request failed with status {}: {}", status, body);
        }

        let resp: GenerateContentResponse = response
            .json()
            .await
            .context("Malformed Gemini response")?;
        reply_text(resp)
    }

    /// List every model visible to the API key, following pagination
    pub async fn list_models(&self) -> Result<Vec<Model>, Error> {
        let url = format!("{}/v1beta/models", self.api_hostname);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                bail!("Listing Gemini models failed with status {}: {}", status, body);
            }

            let page: ListModelsResponse = response
                .json()
                .await
                .context("Malformed Gemini model list")?;
            models.extend(page.models);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(models)
    }
}

fn reply_text(resp: GenerateContentResponse) -> Result<String, Error> {
    let candidate = resp
        .candidates
        .into_iter()
        .next()
        .ok_or(anyhow!("Malformed Gemini response: no candidates"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if text.is_empty() {
        bail!(
            "Malformed Gemini response: no text in candidate (finish reason {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        );
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(url: &str, system: Option<&str>) -> GeminiClient {
        GeminiClient::new(url, "test-key", "gemini-2.5-flash", system, Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn it_sends_history_followed_by_the_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::Json(json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "a"}]},
                    {"role": "model", "parts": [{"text": "b"}]},
                    {"role": "user", "parts": [{"text": "c"}]}
                ],
                "systemInstruction": {"parts": [{"text": "Be brief."}]}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {"role": "model", "parts": [{"text": "Hello"}, {"text": " there"}]},
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let history = vec![Turn::new(TurnRole::User, "a"), Turn::new(TurnRole::Model, "b")];
        let reply = client(&server.url(), Some("Be brief."))
            .generate(&history, "c")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(reply, "Hello there");
    }

    #[tokio::test]
    async fn it_errors_on_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body(r#"{"error": {"message": "quota"}}"#)
            .create_async()
            .await;

        let result = client(&server.url(), None).generate(&[], "hi").await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("429"));
        assert!(err.contains("quota"));
    }

    #[tokio::test]
    async fn it_errors_when_there_is_no_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string())
            .create_async()
            .await;

        let result = client(&server.url(), None).generate(&[], "hi").await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Malformed"));
        assert!(err.contains("SAFETY"));
    }

    #[tokio::test]
    async fn it_lists_models_across_pages() {
        let mut server = mockito::Server::new_async().await;
        let _second = server
            .mock("GET", "/v1beta/models")
            .match_query(Matcher::UrlEncoded("pageToken".into(), "next".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "models": [{
                        "name": "models/embedding-001",
                        "supportedGenerationMethods": ["embedContent"]
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;
        let _first = server
            .mock("GET", "/v1beta/models")
            .match_query(Matcher::Regex("^pageSize=1000$".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "models": [{
                        "name": "models/gemini-2.5-flash",
                        "displayName": "Gemini 2.5 Flash",
                        "supportedGenerationMethods": ["generateContent", "countTokens"]
                    }],
                    "nextPageToken": "next"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let models = client(&server.url(), None).list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        let supported: Vec<&str> = models
            .iter()
            .filter(|m| m.supports_generate_content())
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(supported, vec!["models/gemini-2.5-flash"]);
    }
}
