use async_openai::error::OpenAIError;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 页面抽取错误
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// 中继服务调用错误
    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 浏览器没有可用页面
    #[error("No active tab found.")]
    NoActiveTab,
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
}

/// 页面抽取错误，消息直接展示在面板上
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 所有 frame 都没有找到题目
    #[error("{0}")]
    NotFound(String),
    /// 页面脚本返回了无法识别的数据
    #[error("页面快照格式错误: {0}")]
    BadSnapshot(#[from] serde_json::Error),
}

impl ExtractError {
    pub const NO_QUESTION: &'static str = "No visible question found on page.";
}

/// LLM 调用错误
///
/// 每个变体对应中继的一种兜底答案
#[derive(Debug, Error)]
pub enum LlmError {
    /// 未配置 API key
    #[error("未配置 API key")]
    MissingApiKey,
    /// 额度不足 (HTTP 429 insufficient_quota)
    #[error("额度不足 (request_id={request_id})")]
    QuotaExceeded { request_id: String },
    /// 上游返回非成功状态码
    #[error("上游返回错误 {status} (request_id={request_id}): {body}")]
    BadStatus {
        status: u16,
        request_id: String,
        body: String,
    },
    /// 兼容接口返回的业务错误
    #[error("上游返回错误: {0}")]
    Api(String),
    /// 模型输出无法解析为约定的 JSON
    #[error("无法解析模型输出")]
    Unparseable,
    /// 网络或客户端错误
    #[error("LLM API 调用失败: {0}")]
    Transport(String),
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Transport(err.to_string())
    }
}

/// 只有网络层错误算 Transport；上游返回的任何非成功响应（包括无法解析的错误体）都算 Api
impl From<OpenAIError> for LlmError {
    fn from(err: OpenAIError) -> Self {
        match err {
            OpenAIError::Reqwest(e) => LlmError::Transport(e.to_string()),
            OpenAIError::ApiError(api) => {
                let detail = format!("{:?}", api);
                if detail.contains("insufficient_quota") {
                    LlmError::QuotaExceeded {
                        request_id: "(none)".to_string(),
                    }
                } else {
                    LlmError::Api(api.message)
                }
            }
            other => LlmError::Api(other.to_string()),
        }
    }
}

/// 调用中继服务的错误
#[derive(Debug, Error)]
pub enum RelayError {
    /// 中继返回非成功状态码
    #[error("Backend error: {0}")]
    BadStatus(u16),
    /// 请求发送失败
    #[error("Backend request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    fn api_error(message: &str, kind: Option<&str>) -> OpenAIError {
        OpenAIError::ApiError(ApiError {
            message: message.to_string(),
            r#type: kind.map(str::to_string),
            param: None,
            code: None,
        })
    }

    #[test]
    fn test_openai_quota_error() {
        let err = LlmError::from(api_error("You exceeded your quota", Some("insufficient_quota")));
        assert!(matches!(err, LlmError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_openai_status_errors_are_api_errors() {
        let err = LlmError::from(api_error("Internal Server Error", None));
        assert!(matches!(err, LlmError::Api(ref m) if m == "Internal Server Error"));

        // 非 JSON 的错误体
        let parse_err = serde_json::from_str::<serde_json::Value>("Not Found").unwrap_err();
        let err = LlmError::from(OpenAIError::JSONDeserialize(parse_err, "Not Found".to_string()));
        assert!(matches!(err, LlmError::Api(_)));

        let err = LlmError::from(OpenAIError::InvalidArgument("model".to_string()));
        assert!(matches!(err, LlmError::Api(_)));
    }
}
