// SPDX-FileCopyrightText: 2026 Botforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the code generation service (OpenAI-style chat completions).
//!
//! Handles request construction, authentication, transient error retry, and
//! post-processing of the model output into a named file set.

use std::time::Duration;

use async_trait::async_trait;
use botforge_config::model::CodegenConfig;
use botforge_core::types::{ConversationTurn, GeneratedBot, GeneratedFile, ServiceCall};
use botforge_core::{BotforgeError, CodeGenerator};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert Python developer specializing in Telegram bots \
using the python-telegram-bot library v20+.\n\n\
Generate complete, production-ready Python code for Telegram bots based on user requirements.\n\n\
IMPORTANT REQUIREMENTS:\n\
1. Use python-telegram-bot v20+ syntax (Application, not Updater)\n\
2. Include proper error handling and logging\n\
3. Use async/await patterns correctly\n\
4. Include a health check endpoint on port 8080\n\
5. Make the bot token configurable via the BOT_TOKEN environment variable\n\
6. Include proper webhook setup for production deployment\n\n\
Generate a complete main.py file that can run independently in a container.\n\
Respond with a brief explanation followed by the code in a fenced python block.";

const DEFAULT_REQUIREMENTS: &[&str] = &[
    "python-telegram-bot>=20.0",
    "python-dotenv>=1.0.0",
    "requests>=2.28.0",
];

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type")]
    type_: String,
}

/// Chat-completions-backed [`CodeGenerator`] implementation.
///
/// On transient errors (429, 500, 503), retries once after a 1-second delay.
#[derive(Debug, Clone)]
pub struct OpenAiCodeGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    history_window: usize,
    max_retries: u32,
}

impl OpenAiCodeGenerator {
    pub fn new(config: &CodegenConfig) -> Result<Self, BotforgeError> {
        let api_key = config.api_key.as_deref().ok_or_else(|| {
            BotforgeError::Config(
                "codegen.api_key is not set (BOTFORGE_CODEGEN_API_KEY)".to_string(),
            )
        })?;

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| BotforgeError::Config(format!("invalid API key header value: {e}")))?;
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| BotforgeError::Upstream {
                call: ServiceCall::Generate,
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            history_window: config.history_window,
            max_retries: 1,
        })
    }

    /// Overrides the completions URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    fn build_messages(
        &self,
        prompt: &str,
        bot_token: &str,
        history: &[ConversationTurn],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: SYSTEM_PROMPT.to_string(),
        }];
        let start = history.len().saturating_sub(self.history_window);
        for turn in &history[start..] {
            messages.push(ChatMessage {
                role: match turn.role {
                    botforge_core::TurnRole::User => "user",
                    botforge_core::TurnRole::Assistant => "assistant",
                },
                content: turn.content.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: format!(
                "Create a Telegram bot with the following requirements:\n\n{prompt}\n\nBot token: {bot_token}"
            ),
        });
        messages
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, BotforgeError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generation request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| BotforgeError::Upstream {
                    call: ServiceCall::Generate,
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(%status, attempt, "generation response received");

            if status.is_success() {
                let body: ChatResponse =
                    response.json().await.map_err(|e| BotforgeError::Upstream {
                        call: ServiceCall::Generate,
                        message: format!("failed to parse generation response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                let choice = body.choices.into_iter().next().ok_or_else(|| {
                    BotforgeError::upstream(
                        ServiceCall::Generate,
                        "generation response contained no choices",
                    )
                })?;
                return Ok(choice.message.content);
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(BotforgeError::upstream(
                    ServiceCall::Generate,
                    format!("API returned {status}: {body}"),
                ));
                continue;
            }

            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "generation API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(BotforgeError::upstream(ServiceCall::Generate, message));
        }

        Err(last_error.unwrap_or_else(|| {
            BotforgeError::upstream(ServiceCall::Generate, "generation failed after retries")
        }))
    }
}

#[async_trait]
impl CodeGenerator for OpenAiCodeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        bot_token: &str,
        history: &[ConversationTurn],
    ) -> Result<GeneratedBot, BotforgeError> {
        let request = ChatRequest {
            model: &self.model,
            messages: self.build_messages(prompt, bot_token, history),
            temperature: 0.7,
            max_tokens: self.max_tokens,
        };
        let content = self.complete(&request).await?;
        let (mut code, explanation) = extract_code_block(&content);

        // The generated program must read its token from the environment.
        if !code.contains("BOT_TOKEN") {
            code = format!("BOT_TOKEN = '{bot_token}'\n\n{code}");
        }

        let files = vec![
            GeneratedFile {
                name: "main.py".to_string(),
                content: code,
            },
            GeneratedFile {
                name: "requirements.txt".to_string(),
                content: DEFAULT_REQUIREMENTS.join("\n"),
            },
            GeneratedFile {
                name: ".env".to_string(),
                content: format!("BOT_TOKEN={bot_token}"),
            },
        ];
        Ok(GeneratedBot { files, explanation })
    }
}

/// Split a model response into (code, explanation).
///
/// Prefers the first fenced `python` block; falls back to any fence, then to
/// the whole response with a canned explanation.
fn extract_code_block(content: &str) -> (String, String) {
    for fence in ["```python", "```"] {
        if let Some(start) = content.find(fence) {
            let code_from = start + fence.len();
            if let Some(end_rel) = content[code_from..].find("```") {
                let code = content[code_from..code_from + end_rel].trim().to_string();
                let explanation = content[..start].trim().to_string();
                let explanation = if explanation.is_empty() {
                    "Generated Telegram bot code".to_string()
                } else {
                    explanation
                };
                return (code, explanation);
            }
        }
    }
    (
        content.trim().to_string(),
        "Generated Telegram bot code".to_string(),
    )
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}

#[cfg(test)]
mod tests {
    use super::*;
    use botforge_core::TurnRole;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> CodegenConfig {
        CodegenConfig {
            api_key: Some("sk-test".to_string()),
            history_window: 2,
            ..CodegenConfig::default()
        }
    }

    fn test_client(base_url: &str) -> OpenAiCodeGenerator {
        OpenAiCodeGenerator::new(&test_config())
            .unwrap()
            .with_base_url(format!("{base_url}/v1/chat/completions"))
    }

    fn chat_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    fn turn(role: TurnRole, content: &str) -> ConversationTurn {
        ConversationTurn {
            id: "t".to_string(),
            bot_id: "b1".to_string(),
            role,
            content: content.to_string(),
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn fenced_python_block_is_extracted() {
        let (code, explanation) =
            extract_code_block("An echo bot.\n```python\nprint('hi')\n```\ntrailing");
        assert_eq!(code, "print('hi')");
        assert_eq!(explanation, "An echo bot.");
    }

    #[test]
    fn bare_fence_is_extracted() {
        let (code, _) = extract_code_block("```\nx = 1\n```");
        assert_eq!(code, "x = 1");
    }

    #[test]
    fn unfenced_response_falls_back_to_whole_body() {
        let (code, explanation) = extract_code_block("just code, no fences");
        assert_eq!(code, "just code, no fences");
        assert_eq!(explanation, "Generated Telegram bot code");
    }

    #[tokio::test]
    async fn generate_produces_standard_file_set() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(
                "Echo bot.\n```python\nimport os\nBOT_TOKEN = os.getenv('BOT_TOKEN')\n```",
            )))
            .mount(&server)
            .await;

        let bot = test_client(&server.uri())
            .generate("make an echo bot", "123:tok", &[])
            .await
            .unwrap();

        let names: Vec<&str> = bot.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["main.py", "requirements.txt", ".env"]);
        assert_eq!(bot.explanation, "Echo bot.");
        assert_eq!(bot.files[2].content, "BOT_TOKEN=123:tok");
        assert!(bot.files[1].content.contains("python-telegram-bot"));
    }

    #[tokio::test]
    async fn missing_token_reference_is_injected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(chat_body("```python\nprint('hello')\n```")),
            )
            .mount(&server)
            .await;

        let bot = test_client(&server.uri())
            .generate("say hello", "123:tok", &[])
            .await
            .unwrap();
        assert!(bot.files[0].content.starts_with("BOT_TOKEN = '123:tok'\n"));
    }

    #[tokio::test]
    async fn retries_once_on_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(chat_body("```python\nx = 1\n```")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bot = test_client(&server.uri())
            .generate("anything", "123:tok", &[])
            .await
            .unwrap();
        assert!(bot.files[0].content.contains("x = 1"));
    }

    #[tokio::test]
    async fn api_error_body_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"type": "invalid_request_error", "message": "bad key"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate("anything", "123:tok", &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("bad key"));
    }

    #[test]
    fn history_window_keeps_only_trailing_turns() {
        let generator = OpenAiCodeGenerator::new(&test_config()).unwrap();
        let history = vec![
            turn(TurnRole::User, "first"),
            turn(TurnRole::Assistant, "second"),
            turn(TurnRole::User, "third"),
        ];
        let messages = generator.build_messages("now", "123:tok", &history);
        // system + 2 trailing history turns + current prompt
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "second");
        assert_eq!(messages[2].content, "third");
        assert!(messages[3].content.contains("now"));
    }
}
