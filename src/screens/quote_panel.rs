use std::sync::Arc;

use crate::quote::quote_or_fallback;
use crate::traits::QuoteProvider;

/// Shows a motivational quote. A quote is fetched when the panel is mounted, and on every refresh.
pub struct QuotePanel<P: ?Sized> {
    provider: Arc<P>,
    quote: Option<String>,
}

impl<P: QuoteProvider + ?Sized> QuotePanel<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider, quote: None }
    }

    pub fn is_loading(&self) -> bool {
        self.quote.is_none()
    }

    /// The text to display
    pub fn text(&self) -> &str {
        self.quote.as_deref().unwrap_or("Loading quote...")
    }

    pub async fn mount(&mut self) {
        self.refresh().await;
    }

    pub async fn refresh(&mut self) {
        self.quote = None;
        let quote = quote_or_fallback(&*self.provider).await;
        self.quote = Some(quote);
    }
}
