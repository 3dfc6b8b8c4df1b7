//! The quote panel, with fake quote providers

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use study_tasks::config::FALLBACK_QUOTE;
use study_tasks::quote::QUOTE_PROMPTS;
use study_tasks::screens::QuotePanel;
use study_tasks::traits::QuoteProvider;

/// Replies with a fixed text, or fails, and remembers the prompts it was given
struct FakeProvider {
    reply: Option<&'static str>,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    fn replying(reply: &'static str) -> Self {
        Self { reply: Some(reply), prompts: Mutex::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self { reply: None, prompts: Mutex::new(Vec::new()) }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteProvider for FakeProvider {
    async fn fetch_quote(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.reply {
            Some(reply) => Ok(reply.to_string()),
            None => Err("error sending request: connection refused".into()),
        }
    }
}

#[tokio::test]
async fn failures_show_the_fallback_quote() {
    let _ = env_logger::builder().is_test(true).try_init();

    let provider = Arc::new(FakeProvider::failing());
    let mut panel = QuotePanel::new(Arc::clone(&provider));
    assert!(panel.is_loading());
    assert_eq!(panel.text(), "Loading quote...");

    panel.mount().await;
    assert!(!panel.is_loading());
    assert_eq!(panel.text(), FALLBACK_QUOTE);

    panel.refresh().await;
    assert_eq!(panel.text(), FALLBACK_QUOTE);
    assert_eq!(provider.prompts().len(), 2);
}

#[tokio::test]
async fn quotes_are_displayed() {
    let _ = env_logger::builder().is_test(true).try_init();

    let provider = Arc::new(FakeProvider::replying("Small steps every day."));
    let mut panel = QuotePanel::new(Arc::clone(&provider));
    panel.mount().await;
    assert_eq!(panel.text(), "Small steps every day.");

    for prompt in provider.prompts() {
        assert!(QUOTE_PROMPTS.contains(&prompt.as_str()), "unexpected prompt {:?}", prompt);
    }
}

#[tokio::test]
async fn works_with_trait_objects() {
    let provider: Arc<dyn QuoteProvider> = Arc::new(FakeProvider::failing());
    let mut panel = QuotePanel::new(provider);
    panel.mount().await;
    assert_eq!(panel.text(), FALLBACK_QUOTE);
}
