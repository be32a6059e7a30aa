//! Translation provider boundary.
//!
//! [`Translator`] is the seam the sync pipeline talks to. [`ChatTranslator`]
//! implements it over an OpenAI-compatible chat-completions endpoint, and
//! [`RetryPolicy`] bounds every call with a timeout and linear backoff.
//! Translators never retry on their own.

mod chat;
mod retry;

use async_trait::async_trait;
pub use locsync_core::ProviderError;

pub use chat::{build_request, parse_translations, ChatConfig, ChatTranslator};
pub use retry::RetryPolicy;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `texts` into `target_lang`. The output has the same length
    /// and order as the input. `source_lang = None` asks the provider to
    /// detect the language.
    async fn translate(
        &self,
        texts: &[String],
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError>;
}
