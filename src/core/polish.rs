//! Optional text-polish collaborator
//!
//! The engine stays deterministic without it: any failure here degrades to
//! the rule-based description.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::PolishConfig;
use crate::types::{Borough, PolishError, TimeBucket};

/// What the polisher sees about one station
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolishRequest {
    pub station: String,
    pub borough: Borough,
    pub persona: String,
    pub baseline_description: String,
    pub vitality_score: f64,
    pub peak: Option<TimeBucket>,
}

/// Polisher reply. Only `description` is used by the engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolishedText {
    #[serde(default)]
    pub persona: Option<String>,
    pub description: String,
}

/// Capability that rewrites a baseline description
#[async_trait]
pub trait Polisher: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    async fn polish(&self, request: &PolishRequest) -> Result<PolishedText, PolishError>;
}

/// Polisher used when nothing is configured
#[derive(Debug, Default)]
pub struct NoopPolisher;

#[async_trait]
impl Polisher for NoopPolisher {
    fn name(&self) -> &str {
        "noop"
    }

    async fn polish(&self, _request: &PolishRequest) -> Result<PolishedText, PolishError> {
        Err(PolishError::Unconfigured)
    }
}

/// Google Generative Language `generateContent` client
pub struct GeminiPolisher {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiPolisher {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PolishError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PolishError::MissingCredential);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &PolishConfig) -> Result<Self, PolishError> {
        let api_key = config.api_key.clone().ok_or(PolishError::MissingCredential)?;
        Self::new(&config.base_url, &config.model, api_key, config.timeout)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<GenerateContent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GenerateContent {
    #[serde(default)]
    parts: Vec<GeneratePart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeneratePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
struct GenerateCandidate {
    content: Option<GenerateContent>,
}

#[async_trait]
impl Polisher for GeminiPolisher {
    fn name(&self) -> &str {
        &self.model
    }

    async fn polish(&self, request: &PolishRequest) -> Result<PolishedText, PolishError> {
        let body = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart {
                    text: build_prompt(request),
                }],
            }],
        };

        debug!(station = %request.station, model = %self.model, "Sending polish request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PolishError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PolishError::Malformed(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .next()
            .ok_or_else(|| PolishError::Malformed("no candidates".to_string()))?;

        parse_polished(&text)
    }
}

/// Pick the polisher for a configuration, falling back to the no-op one
pub fn build_polisher(config: &PolishConfig) -> Arc<dyn Polisher> {
    if !config.is_active() {
        info!("Text polish disabled, serving deterministic narratives");
        return Arc::new(NoopPolisher);
    }
    match GeminiPolisher::from_config(config) {
        Ok(polisher) => {
            info!(model = %config.model, "Text polish enabled");
            Arc::new(polisher)
        }
        Err(e) => {
            warn!(error = %e, "Text polish unavailable, serving deterministic narratives");
            Arc::new(NoopPolisher)
        }
    }
}

/// Prompt asking for a two-sentence rewrite that keeps the borough
pub fn build_prompt(request: &PolishRequest) -> String {
    let peak = request.peak.map(|p| p.name()).unwrap_or("none (flat)");
    format!(
        r#"Refine this analysis for {station} in {borough}.

Context:
- {baseline}
- Vitality Score: {vitality}/100 (Nightlife percentile)
- Peak Time: {peak}

Task:
Write a polished 2-sentence description.
1. Keep the borough correct ({borough}).
2. Explain WHY the vitality score matters (e.g. "Low vitality suggests a quiet residential area").
3. Do not hallucinate amenities not present.

Return JSON: {{ "persona": "{persona}", "description": "..." }}"#,
        station = request.station,
        borough = request.borough,
        baseline = request.baseline_description,
        vitality = request.vitality_score.trunc() as i64,
        peak = peak,
        persona = request.persona,
    )
}

/// Parse a model reply, tolerating a surrounding markdown code fence
pub fn parse_polished(text: &str) -> Result<PolishedText, PolishError> {
    let body = strip_code_fence(text.trim());
    let polished: PolishedText =
        serde_json::from_str(body).map_err(|e| PolishError::Malformed(e.to_string()))?;
    if polished.description.trim().is_empty() {
        return Err(PolishError::Malformed("empty description".to_string()));
    }
    Ok(polished)
}

fn strip_code_fence(text: &str) -> &str {
    let inner = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        return text;
    };
    inner.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PolishRequest {
        PolishRequest {
            station: "Bedford Av".to_string(),
            borough: Borough::Brooklyn,
            persona: "Brooklyn Nightlife District".to_string(),
            baseline_description: "A high-energy area.".to_string(),
            vitality_score: 91.7,
            peak: Some(TimeBucket::Night),
        }
    }

    #[test]
    fn test_parse_plain_json() {
        let polished = parse_polished(r#"{"persona": "X", "description": "Polished."}"#).unwrap();
        assert_eq!(polished.description, "Polished.");
        assert_eq!(polished.persona.as_deref(), Some("X"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let text = "```json\n{\"description\": \"Fenced.\"}\n```";
        assert_eq!(parse_polished(text).unwrap().description, "Fenced.");
        let bare = "```\n{\"description\": \"Bare fence.\"}\n```";
        assert_eq!(parse_polished(bare).unwrap().description, "Bare fence.");
    }

    #[test]
    fn test_parse_rejects_missing_description() {
        assert!(matches!(
            parse_polished(r#"{"persona": "X"}"#),
            Err(PolishError::Malformed(_))
        ));
        assert!(matches!(parse_polished("not json"), Err(PolishError::Malformed(_))));
        assert!(matches!(
            parse_polished(r#"{"description": "  "}"#),
            Err(PolishError::Malformed(_))
        ));
    }

    #[test]
    fn test_prompt_contents() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("Refine this analysis for Bedford Av in Brooklyn."));
        assert!(prompt.contains("Vitality Score: 91/100"));
        assert!(prompt.contains("Peak Time: night"));
        assert!(prompt.contains(r#""persona": "Brooklyn Nightlife District""#));
    }

    #[test]
    fn test_gemini_requires_key() {
        let result = GeminiPolisher::new("http://localhost", "m", " ", Duration::from_secs(1));
        assert!(matches!(result, Err(PolishError::MissingCredential)));
    }

    #[test]
    fn test_build_polisher_without_key_is_noop() {
        let polisher = build_polisher(&PolishConfig::default());
        assert_eq!(polisher.name(), "noop");
    }

    #[tokio::test]
    async fn test_noop_is_unconfigured() {
        let result = NoopPolisher.polish(&request()).await;
        assert!(matches!(result, Err(PolishError::Unconfigured)));
    }
}
