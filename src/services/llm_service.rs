//! LLM 服务 - 业务能力层
//!
//! 只负责"把一道题交给模型并拿回结构化答案"，不关心 HTTP 路由
//!
//! ## 技术栈
//! - 默认通过 `reqwest` 直接调用 OpenAI Responses API，并用 json_schema 约束输出
//! - 也可以切换到 `async-openai` 的 chat completions，兼容只支持该接口的网关
//!
//! 所有失败路径都会落到 [`fallback`](super::fallback) 中的固定答案上

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use backoff::ExponentialBackoff;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};

use super::answer_parser::{extract_response_text, parse_answer};
use super::fallback;
use super::prompt::{answer_schema, SCHEMA_NAME, SYSTEM_PROMPT};
use crate::config::{ApiStyle, Config};
use crate::error::LlmError;
use crate::models::{QaRequest, QaResponse};
use crate::utils::key_fingerprint;

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 回答单道题
/// - 解析、修复模型输出
/// - 把每种失败映射到对应的兜底答案
pub struct LlmService {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    model_name: String,
    project: Option<String>,
    api_style: ApiStyle,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
            project: config.llm_project.clone(),
            api_style: config.llm_api_style,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 回答一道题，永远返回合法答案
    pub async fn answer(&self, input: &QaRequest) -> QaResponse {
        match self.try_answer(input).await {
            Ok(response) => response,
            Err(LlmError::MissingApiKey) => {
                warn!("⚠️ OPENAI_API_KEY 未配置，返回兜底答案");
                fallback::mock_response(input)
            }
            Err(LlmError::QuotaExceeded { request_id }) => {
                warn!("⚠️ OpenAI 额度不足 request_id={}", request_id);
                fallback::quota_exceeded()
            }
            Err(e @ (LlmError::BadStatus { .. } | LlmError::Api(_))) => {
                debug!("上游错误，返回兜底答案: {}", e);
                fallback::mock_response(input)
            }
            Err(LlmError::Unparseable) => {
                warn!("⚠️ 无法解析模型 JSON 输出，返回兜底答案");
                fallback::mock_response(input)
            }
            Err(LlmError::Transport(e)) => {
                error!("❌ LLM 调用失败: {}", e);
                fallback::unavailable()
            }
        }
    }

    /// 调用模型并解析输出，失败时返回具体原因
    pub async fn try_answer(&self, input: &QaRequest) -> Result<QaResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        info!("🤖 调用 LLM，模型: {}", self.model_name);
        info!(
            "🔑 使用 key: {} project: {}",
            key_fingerprint(api_key),
            self.project.as_deref().unwrap_or("(default)")
        );

        let user_message =
            serde_json::to_string(input).map_err(|e| LlmError::Transport(e.to_string()))?;

        let raw = match self.api_style {
            ApiStyle::Responses => self.complete_via_responses(api_key, &user_message).await?,
            ApiStyle::Chat => self.complete_via_chat(api_key, &user_message).await?,
        };
        debug!("模型输出长度: {} 字符", raw.len());

        parse_answer(&raw).ok_or(LlmError::Unparseable)
    }

    /// 通过 Responses API 获取模型文本
    async fn complete_via_responses(
        &self,
        api_key: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let url = format!("{}/responses", self.api_base_url);
        let body = json!({
            "model": self.model_name,
            "input": [
                {
                    "role": "system",
                    "content": [{ "type": "input_text", "text": SYSTEM_PROMPT }]
                },
                {
                    "role": "user",
                    "content": [{ "type": "input_text", "text": user_message }]
                }
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": SCHEMA_NAME,
                    "schema": answer_schema(),
                    "strict": true
                }
            }
        });

        let mut request = self.http.post(&url).bearer_auth(api_key).json(&body);
        if let Some(project) = &self.project {
            request = request.header("OpenAI-Project", project);
        }

        let response = request.send().await?;
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("(none)")
            .to_string();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(
                "❌ OpenAI error {} request_id={}: {}",
                status.as_u16(),
                request_id,
                error_body
            );

            if status.as_u16() == 429 && error_body.contains("insufficient_quota") {
                return Err(LlmError::QuotaExceeded { request_id });
            }
            return Err(LlmError::BadStatus {
                status: status.as_u16(),
                request_id,
                body: error_body,
            });
        }

        let data: JsonValue = response.json().await?;
        info!("✓ OpenAI 请求成功 request_id={}", request_id);
        Ok(extract_response_text(&data))
    }

    /// 通过 chat completions 获取模型文本
    ///
    /// 复用带超时的 HTTP 客户端，且只请求一次，失败直接走兜底
    async fn complete_via_chat(
        &self,
        api_key: &str,
        user_message: &str,
    ) -> Result<String, LlmError> {
        let mut openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&self.api_base_url);
        if let Some(project) = &self.project {
            openai_config = openai_config.with_project_id(project);
        }
        let single_attempt = ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };
        let client = Client::build(self.http.clone(), openai_config, single_attempt);

        let system_msg = ChatCompletionRequestSystemMessageArgs::default()
            .content(SYSTEM_PROMPT)
            .build()?;
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(vec![
                ChatCompletionRequestMessage::System(system_msg),
                ChatCompletionRequestMessage::User(user_msg),
            ])
            .build()?;

        let response = client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::from(e)
        })?;

        debug!("LLM API 调用成功");

        Ok(response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_without_key() -> LlmService {
        LlmService::new(&Config::default())
    }

    fn request() -> QaRequest {
        QaRequest {
            question: "Which HTTP method is idempotent?".to_string(),
            options: Some(vec!["POST".to_string(), "PUT".to_string()]),
            context: None,
        }
    }

    #[tokio::test]
    async fn test_missing_key_returns_mock() {
        let service = service_without_key();
        assert!(!service.has_api_key());

        let err = service.try_answer(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));

        let resp = service.answer(&request()).await;
        assert_eq!(resp, fallback::mock_response(&request()));
    }

    #[test]
    fn test_base_url_is_normalised() {
        let config = Config {
            llm_api_base_url: "http://localhost:9999/v1/".to_string(),
            ..Config::default()
        };
        let service = LlmService::new(&config);
        assert_eq!(service.api_base_url, "http://localhost:9999/v1");
        assert_eq!(service.model_name(), "gpt-5-mini");
    }
}
