//! Baseline-model collaborators.
//!
//! Ungated external text-generation calls used only for side-by-side
//! comparison. Isolated from the safety decision path: a failure or timeout
//! here becomes an inline diagnostic string, never an error for the caller.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// Default per-call timeout; each call times out independently.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 512;

/// Server error bodies are truncated to this many bytes before they reach
/// the diagnostic string.
const BODY_TRUNCATE: usize = 300;

/// Fixed request path for the chat-completions protocol.
const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// Fixed request path for the native chat protocol.
const NATIVE_CHAT_PATH: &str = "/api/chat";

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("reply carried no message content")]
    EmptyReply,
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Which wire protocol the endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatProtocol {
    /// `{model, messages, temperature, max_tokens}` → `choices[0].message.content`.
    ChatCompletions,
    /// `{model, messages, stream:false, options}` → `message.content` (or `response`).
    NativeChat,
}

/// Endpoint configuration for one baseline model.
#[derive(Debug, Clone)]
pub struct BaselineConfig {
    pub endpoint: String,
    pub model: String,
    pub protocol: ChatProtocol,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl BaselineConfig {
    pub fn chat_completions(endpoint: String, model: String, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            model,
            protocol: ChatProtocol::ChatCompletions,
            api_key,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn native_chat(endpoint: String, model: String) -> Self {
        Self {
            endpoint,
            model,
            protocol: ChatProtocol::NativeChat,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionsReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct NativeChatReply {
    message: Option<ChatMessage>,
    response: Option<String>,
}

/// Client for one configured baseline model.
pub struct BaselineClient {
    client: reqwest::Client,
    config: BaselineConfig,
}

impl BaselineClient {
    pub fn new(config: BaselineConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Ask the baseline model a question, bounded by the configured timeout.
    pub async fn ask(&self, question: &str) -> Result<String, BaselineError> {
        debug!(model = %self.config.model, "asking baseline model");
        tokio::time::timeout(self.config.timeout, self.request(question))
            .await
            .map_err(|_| BaselineError::Timeout(self.config.timeout))?
    }

    async fn request(&self, question: &str) -> Result<String, BaselineError> {
        let base = self.config.endpoint.trim_end_matches('/');
        let (path, body) = match self.config.protocol {
            ChatProtocol::ChatCompletions => (
                CHAT_COMPLETIONS_PATH,
                chat_completions_body(&self.config.model, question),
            ),
            ChatProtocol::NativeChat => {
                (NATIVE_CHAT_PATH, native_chat_body(&self.config.model, question))
            }
        };

        let mut request = self.client.post(format!("{base}{path}")).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BaselineError::Server {
                status: status.as_u16(),
                body: truncate(&body, BODY_TRUNCATE),
            });
        }

        match self.config.protocol {
            ChatProtocol::ChatCompletions => {
                let reply: ChatCompletionsReply = resp.json().await?;
                reply
                    .choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .ok_or(BaselineError::EmptyReply)
            }
            ChatProtocol::NativeChat => {
                let reply: NativeChatReply = resp.json().await?;
                reply
                    .message
                    .map(|m| m.content)
                    .or(reply.response)
                    .ok_or(BaselineError::EmptyReply)
            }
        }
    }
}

/// Ask a baseline model, degrading to an inline diagnostic string.
///
/// `None` client means the endpoint is not configured; that is a placeholder,
/// not an error.
pub async fn answer_or_diagnostic(client: Option<&BaselineClient>, question: &str) -> String {
    let Some(client) = client else {
        return "(baseline model not configured)".to_string();
    };
    match client.ask(question).await {
        Ok(answer) => answer,
        Err(err) => {
            warn!(model = %client.model(), error = %err, "baseline call failed");
            format!("[{} unavailable: {}]", client.model(), err)
        }
    }
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

fn chat_completions_body(model: &str, question: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": question }],
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
    })
}

fn native_chat_body(model: &str, question: &str) -> Value {
    json!({
        "model": model,
        "messages": [{ "role": "user", "content": question }],
        "stream": false,
        "options": { "temperature": TEMPERATURE, "num_predict": MAX_TOKENS },
    })
}
