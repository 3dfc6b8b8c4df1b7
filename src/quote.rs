//! Motivational quotes, written by a chat-completion API
//!
//! Every fetch is a single best-effort request: there is no retry, no cache and no rate limiting.
//! Failures are logged and replaced by [`FALLBACK_QUOTE`](crate::config::FALLBACK_QUOTE).

use std::error::Error;

use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{QuoteSettings, FALLBACK_QUOTE};
use crate::traits::QuoteProvider;

/// The prompts a quote is asked with. One of them is picked at random for every fetch.
pub const QUOTE_PROMPTS: [&str; 6] = [
    "Give me a short motivational quote for a student who is studying for exams.",
    "Write one sentence of encouragement for someone working through a long to-do list.",
    "Share a short, original quote about the value of consistent daily study.",
    "Give me a brief inspirational quote about finishing tasks one step at a time.",
    "Write a short uplifting quote for a student who feels overwhelmed by deadlines.",
    "Give me a one-line motivational quote about focus and discipline.",
];

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}


/// A [`QuoteProvider`] that calls an OpenAI-compatible `chat/completions` endpoint
#[derive(Clone, Debug)]
pub struct ChatQuoteClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatQuoteClient {
    /// Create a client. This does not start a connection
    pub fn new(settings: &QuoteSettings) -> Result<Self, Box<dyn Error>> {
        let endpoint = Url::parse(&settings.endpoint)?;
        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: settings.token.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl QuoteProvider for ChatQuoteClient {
    async fn fetch_quote(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        if self.token.is_empty() {
            return Err("No token is configured for the quote API".into());
        }

        let response = self.http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", status).into());
        }

        let text = response.text().await?;
        extract_quote(&text)
    }
}

/// Get `choices[0].message.content` out of a chat-completion response
fn extract_quote(body: &str) -> Result<String, Box<dyn Error>> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    let content = parsed.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or("The quote API returned no content")?;

    let quote = content.trim();
    if quote.is_empty() {
        return Err("The quote API returned an empty quote".into());
    }
    Ok(quote.to_string())
}


/// Pick one prompt, uniformly at random
pub fn pick_prompt<'a, R: Rng + ?Sized>(rng: &mut R, prompts: &[&'a str]) -> Option<&'a str> {
    prompts.choose(rng).copied()
}

/// Fetch a quote with a random prompt, or return [`FALLBACK_QUOTE`] if anything goes wrong
pub async fn quote_or_fallback<P: QuoteProvider + ?Sized>(provider: &P) -> String {
    let prompt = match pick_prompt(&mut rand::thread_rng(), &QUOTE_PROMPTS) {
        Some(p) => p,
        None => return FALLBACK_QUOTE.to_string(),
    };
    log::debug!("Fetching a quote with prompt {:?}", prompt);

    match provider.fetch_quote(prompt).await {
        Ok(quote) => quote,
        Err(err) => {
            log::error!("Unable to fetch a quote: {}", err);
            FALLBACK_QUOTE.to_string()
        },
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn request_body_shape() {
        let client = ChatQuoteClient::new(&QuoteSettings::default()).unwrap();
        let body = serde_json::to_value(client.request_body("Motivate me")).unwrap();
        assert_eq!(body, serde_json::json!({
            "model": "gpt-3.5-turbo",
            "messages": [{ "role": "user", "content": "Motivate me" }],
            "max_tokens": 60,
            "temperature": 0.9f32,
        }));
    }

    #[test]
    fn extract() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  Keep at it.\n"}}]}"#;
        assert_eq!(extract_quote(body).unwrap(), "Keep at it.");

        assert!(extract_quote(r#"{"choices": []}"#).is_err());
        assert!(extract_quote(r#"{"choices": [{"message": {"content": "   "}}]}"#).is_err());
        assert!(extract_quote(r#"{"error": {"message": "quota"}}"#).is_err());
        assert!(extract_quote("<html>").is_err());
    }

    #[test]
    fn every_prompt_can_be_picked() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick_prompt(&mut rng, &QUOTE_PROMPTS).unwrap());
        }
        assert_eq!(seen.len(), QUOTE_PROMPTS.len());
        assert_eq!(pick_prompt(&mut rng, &[]), None);
    }

    #[tokio::test]
    async fn missing_token_falls_back() {
        let client = ChatQuoteClient::new(&QuoteSettings::default()).unwrap();
        assert!(client.fetch_quote("hi").await.is_err());
        assert_eq!(quote_or_fallback(&client).await, FALLBACK_QUOTE);
    }
}
