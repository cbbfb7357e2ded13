//! OpenAI-compatible HTTP model client.
//!
//! Thin adapter for any endpoint speaking the `/chat/completions` dialect
//! (OpenAI, most local inference servers, API gateways). Non-streaming: the
//! whole response arrives at once and is delivered as a single terminal
//! stream event. Provider-specific protocols are out of scope; anything a
//! gateway can't express in this dialect doesn't belong here.

use async_trait::async_trait;
use roundtable_application::{ClientError, GenerationParams, ModelClient, StreamHandle};
use roundtable_domain::{
    ChatMessage, Conversation, FinishReason, Model, ModelResponse, Role, ToolCall, ToolDefinition,
    Usage,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::FileProviderConfig;

/// Model client for an OpenAI-compatible endpoint.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    models: Vec<Model>,
}

impl OpenAiCompatClient {
    /// Create a client for the given endpoint.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            models: Model::default_models(),
        })
    }

    /// Create a client from the `[provider]` config section, reading the
    /// API key from the configured environment variable.
    pub fn from_config(config: &FileProviderConfig) -> Result<Self, ClientError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            debug!("{} is not set, sending unauthenticated requests", config.api_key_env);
        }
        Self::new(
            &config.base_url,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Override the advertised model roster.
    pub fn with_models(mut self, models: Vec<Model>) -> Self {
        self.models = models;
        self
    }

    async fn send(&self, request: &WireRequest) -> Result<WireResponse, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut builder = self.http.post(&url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else if e.is_connect() {
                ClientError::ConnectionError(e.to_string())
            } else {
                ClientError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::ModelNotAvailable(request.model.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let mut detail = body.trim().to_string();
            detail.truncate(500);
            return Err(ClientError::RequestFailed(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::RequestFailed(format!("malformed response: {}", e)))
    }
}

/// Lift a wire response into the domain, taking the first choice.
fn build_response(model: &Model, wire: WireResponse) -> Result<ModelResponse, ClientError> {
    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::RequestFailed("response had no choices".to_string()))?;

    let content = choice.message.content.unwrap_or_default();
    let tool_calls = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| tc.into_tool_call())
        .collect::<Vec<_>>();

    let mut response = ModelResponse::from_text(model.clone(), content);
    response.finish_reason = map_finish_reason(choice.finish_reason.as_deref());
    if !tool_calls.is_empty() {
        response = response.with_tool_calls(tool_calls);
    }
    if let Some(usage) = wire.usage {
        response = response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
    }
    Ok(response)
}

#[async_trait]
impl ModelClient for OpenAiCompatClient {
    async fn available_models(&self) -> Result<Vec<Model>, ClientError> {
        Ok(self.models.clone())
    }

    async fn complete(
        &self,
        model: &Model,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String, ClientError> {
        let request = WireRequest {
            model: model.as_str().to_string(),
            messages: vec![
                WireMessage::system(system_prompt),
                WireMessage::text("user", prompt),
            ],
            max_tokens: GenerationParams::default().max_tokens,
            temperature: 0.0,
            tools: Vec::new(),
        };

        let wire = self.send(&request).await?;
        let response = build_response(model, wire)?;
        Ok(response.content)
    }

    async fn generate(
        &self,
        model: &Model,
        system_prompt: &str,
        conversation: &Conversation,
        tools: &[ToolDefinition],
        params: &GenerationParams,
    ) -> Result<StreamHandle, ClientError> {
        let request = WireRequest {
            model: model.as_str().to_string(),
            messages: wire_messages(system_prompt, conversation.messages()),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            tools: tools.iter().map(wire_tool).collect(),
        };

        let wire = self.send(&request).await?;
        let response = build_response(model, wire)?;
        Ok(StreamHandle::from_response(response))
    }
}

/// Flatten the conversation into wire messages, system prompt first.
///
/// Tool-role messages fan out into one wire message per result, keyed by
/// the originating call id.
fn wire_messages(system_prompt: &str, messages: &[ChatMessage]) -> Vec<WireMessage> {
    let mut wire = vec![WireMessage::system(system_prompt)];

    for message in messages {
        match message.role {
            Role::System => wire.push(WireMessage::system(&message.content)),
            Role::User => wire.push(WireMessage::text("user", &message.content)),
            Role::Assistant => {
                let tool_calls: Vec<WireToolCall> =
                    message.tool_calls.iter().map(WireToolCall::from).collect();
                wire.push(WireMessage {
                    role: "assistant".to_string(),
                    content: (!message.content.is_empty()).then(|| message.content.clone()),
                    tool_calls,
                    tool_call_id: None,
                });
            }
            Role::Tool => {
                for result in &message.tool_results {
                    wire.push(WireMessage {
                        role: "tool".to_string(),
                        content: Some(result.content.clone()),
                        tool_calls: Vec::new(),
                        tool_call_id: Some(result.call_id.clone()),
                    });
                }
            }
        }
    }

    wire
}

/// Render a tool definition as a JSON Schema function declaration.
fn wire_tool(definition: &ToolDefinition) -> WireTool {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for param in &definition.parameters {
        let json_type = match param.param_type.as_str() {
            "number" => "number",
            "boolean" => "boolean",
            _ => "string",
        };
        properties.insert(
            param.name.clone(),
            serde_json::json!({
                "type": json_type,
                "description": param.description,
            }),
        );
        if param.required {
            required.push(param.name.clone());
        }
    }

    WireTool {
        kind: "function".to_string(),
        function: WireFunction {
            name: definition.name.clone(),
            description: definition.description.clone(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        },
    }
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") | None => FinishReason::Stop,
        Some("tool_calls") => FinishReason::ToolUse,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some(other) => FinishReason::Other(other.to_string()),
    }
}

#[derive(Debug, Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<WireMessage>,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn system(content: &str) -> Self {
        Self::text("system", content)
    }

    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: String,
    function: WireFunction,
}

#[derive(Debug, Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object, per the wire dialect
    arguments: String,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: call.name.clone(),
                arguments: serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".into()),
            },
        }
    }
}

impl WireToolCall {
    fn into_tool_call(self) -> ToolCall {
        let arguments: HashMap<String, serde_json::Value> =
            serde_json::from_str(&self.function.arguments).unwrap_or_else(|e| {
                warn!(
                    "unparseable arguments for tool call {}: {}",
                    self.function.name, e
                );
                HashMap::new()
            });
        ToolCall::new(self.id, self.function.name).with_arguments(arguments)
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{RiskLevel, ToolParameter, ToolResult};
    use serde_json::json;

    #[test]
    fn test_wire_messages_flatten_tool_results() {
        let mut conversation = Conversation::new();
        conversation.add_user_message("run the tests");
        conversation.push(
            ChatMessage::assistant(Model::Gpt52, "").with_tool_calls(vec![ToolCall::new(
                "call_1",
                "run_command",
            )
            .with_arg("command", json!("cargo test"))]),
        );
        conversation.push(ChatMessage::tool(
            Model::Gpt52,
            vec![ToolResult::success("call_1", "ok")],
        ));

        let wire = wire_messages("be helpful", conversation.messages());

        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[1].role, "user");
        assert_eq!(wire[2].role, "assistant");
        assert!(wire[2].content.is_none());
        assert_eq!(wire[2].tool_calls.len(), 1);
        assert_eq!(wire[3].role, "tool");
        assert_eq!(wire[3].tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_wire_tool_schema() {
        let definition = ToolDefinition::new("read_file", "Read a file", RiskLevel::Low)
            .with_parameter(ToolParameter::new("path", "File path", true).with_type("path"))
            .with_parameter(ToolParameter::new("limit", "Line limit", false).with_type("number"));

        let tool = wire_tool(&definition);
        let schema = serde_json::to_value(&tool).unwrap();

        assert_eq!(schema["type"], "function");
        assert_eq!(schema["function"]["name"], "read_file");
        assert_eq!(
            schema["function"]["parameters"]["properties"]["path"]["type"],
            "string"
        );
        assert_eq!(
            schema["function"]["parameters"]["properties"]["limit"]["type"],
            "number"
        );
        assert_eq!(schema["function"]["parameters"]["required"], json!(["path"]));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason(Some("stop")), FinishReason::Stop);
        assert_eq!(map_finish_reason(Some("tool_calls")), FinishReason::ToolUse);
        assert_eq!(map_finish_reason(Some("length")), FinishReason::Length);
        assert_eq!(map_finish_reason(None), FinishReason::Stop);
        assert_eq!(
            map_finish_reason(Some("weird")),
            FinishReason::Other("weird".to_string())
        );
    }

    #[test]
    fn test_tool_call_arguments_roundtrip() {
        let wire = WireToolCall {
            id: "call_9".to_string(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: "read_file".to_string(),
                arguments: r#"{"path": "/tmp/a.txt", "limit": 5}"#.to_string(),
            },
        };

        let call = wire.into_tool_call();
        assert_eq!(call.id, "call_9");
        assert_eq!(call.get_string("path"), Some("/tmp/a.txt"));
        assert_eq!(call.get_i64("limit"), Some(5));
    }

    #[test]
    fn test_malformed_tool_arguments_become_empty() {
        let wire = WireToolCall {
            id: "call_9".to_string(),
            kind: "function".to_string(),
            function: WireFunctionCall {
                name: "read_file".to_string(),
                arguments: "not json".to_string(),
            },
        };

        let call = wire.into_tool_call();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_parse_response_with_tool_calls() {
        let body = r#"{
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "read_file", "arguments": "{\"path\": \"x\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;

        let wire: WireResponse = serde_json::from_str(body).unwrap();
        let response = build_response(&Model::Gpt52, wire).unwrap();

        assert!(response.has_tool_calls());
        assert_eq!(response.finish_reason, FinishReason::ToolUse);
        assert_eq!(response.tool_calls[0].name, "read_file");
        let usage = response.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.total_tokens, 15);
    }
}
