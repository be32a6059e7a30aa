use async_trait::async_trait;
use locsync_core::ProviderError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::Translator;

const SYSTEM_PROMPT: &str = "You translate user interface strings for software localization.\n\
Rules:\n\
- Translate every entry of `texts` from `source_lang` into `target_lang`. If `source_lang` is null, detect it.\n\
- Keep placeholders exactly as written: ICU arguments such as {name}, {count, plural, ...}, printf tokens such as %s, %d, %1$s, double-brace tokens such as {{value}}, HTML tags and markdown markup.\n\
- Keep the casing convention of each entry (Title Case stays Title Case, lowercase stays lowercase, ALL CAPS stays ALL CAPS).\n\
- An empty string translates to an empty string.\n\
- Answer with a JSON object {\"translations\": [...]} holding exactly one string per input, in input order, and nothing else.";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl ChatConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";
    pub const DEFAULT_API_KEY_ENV: &'static str = "OPENAI_API_KEY";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// [`Translator`] backed by an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatTranslator {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl ChatTranslator {
    pub fn new(config: ChatConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("locsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model,
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    async fn translate(
        &self,
        texts: &[String],
        source_lang: Option<&str>,
        target_lang: &str,
    ) -> Result<Vec<String>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let body = build_request(&self.model, texts, source_lang, target_lang);
        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&text, 512),
            });
        }
        parse_translations(&text, texts.len())
    }
}

/// Request body for one translation call.
pub fn build_request(
    model: &str,
    texts: &[String],
    source_lang: Option<&str>,
    target_lang: &str,
) -> Value {
    let payload = json!({
        "source_lang": source_lang,
        "target_lang": target_lang,
        "texts": texts,
    });
    json!({
        "model": model,
        "temperature": 0,
        "response_format": {"type": "json_object"},
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": payload.to_string()},
        ],
    })
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

#[derive(Deserialize)]
struct TranslationsPayload {
    translations: Vec<String>,
}

/// Extract the translated strings from a chat-completions response body and
/// check that there is exactly one per input.
pub fn parse_translations(body: &str, expected: usize) -> Result<Vec<String>, ProviderError> {
    let res: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Malformed(format!("response body: {e}")))?;
    let content = res
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Malformed("no message content".to_string()))?;
    let payload: TranslationsPayload = serde_json::from_str(&content)
        .map_err(|e| ProviderError::Malformed(format!("message content: {e}")))?;
    if payload.translations.len() != expected {
        return Err(ProviderError::LengthMismatch {
            expected,
            got: payload.translations.len(),
        });
    }
    Ok(payload.translations)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat_body(content: &str) -> String {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
    }

    #[test]
    fn request_carries_texts_and_languages() {
        let texts = vec!["Hello".to_string(), "".to_string()];
        let req = build_request("m", &texts, Some("en"), "fr");
        assert_eq!(req["model"], "m");
        assert_eq!(req["response_format"]["type"], "json_object");
        let user: Value =
            serde_json::from_str(req["messages"][1]["content"].as_str().unwrap()).unwrap();
        assert_eq!(user["texts"], json!(["Hello", ""]));
        assert_eq!(user["source_lang"], "en");
        assert_eq!(user["target_lang"], "fr");
    }

    #[test]
    fn unknown_source_is_null() {
        let req = build_request("m", &["x".to_string()], None, "de");
        let user: Value =
            serde_json::from_str(req["messages"][1]["content"].as_str().unwrap()).unwrap();
        assert!(user["source_lang"].is_null());
    }

    #[test]
    fn system_prompt_states_the_rules() {
        let req = build_request("m", &["x".to_string()], None, "de");
        let system = req["messages"][0]["content"].as_str().unwrap();
        assert!(system.contains("placeholders"));
        assert!(system.contains("casing"));
        assert!(system.contains("empty string"));
        assert!(system.contains("detect"));
    }

    #[test]
    fn parses_translations() {
        let body = chat_body(r#"{"translations": ["Bonjour", ""]}"#);
        assert_eq!(
            parse_translations(&body, 2).unwrap(),
            vec!["Bonjour".to_string(), String::new()]
        );
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let body = chat_body(r#"{"translations": ["Bonjour"]}"#);
        assert_eq!(
            parse_translations(&body, 2),
            Err(ProviderError::LengthMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn malformed_payloads_are_errors() {
        for body in [
            "not json".to_string(),
            json!({"choices": []}).to_string(),
            chat_body("plain text answer"),
            chat_body(r#"{"translations": "Bonjour"}"#),
            chat_body(r#"{"other": []}"#),
        ] {
            assert!(
                matches!(parse_translations(&body, 1), Err(ProviderError::Malformed(_))),
                "expected malformed for {body}"
            );
        }
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("abc", 5), "abc");
        assert_eq!(truncate("abcdef", 3), "abc…");
    }
}
