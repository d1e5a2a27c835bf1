use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// LLM 接口风格
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    /// OpenAI Responses API（支持 json_schema 约束输出）
    Responses,
    /// 兼容 OpenAI 的 chat completions 接口
    Chat,
}

impl ApiStyle {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "responses" => Some(ApiStyle::Responses),
            "chat" | "chat-completions" => Some(ApiStyle::Chat),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 中继服务监听端口
    pub port: u16,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 无头模式下使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// CLI 调用的中继地址
    pub backend_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    /// 为空时中继返回兜底答案
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_project: Option<String>,
    pub llm_api_style: ApiStyle,
    /// 单次 LLM 调用超时（秒）
    pub llm_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            browser_debug_port: 9222,
            chrome_executable: None,
            backend_url: "http://localhost:3000/answer".to_string(),
            verbose_logging: false,
            llm_api_key: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-5-mini".to_string(),
            llm_project: None,
            llm_api_style: ApiStyle::Responses,
            llm_timeout_secs: 60,
        }
    }
}

/// 配置文件内容，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    port: Option<u16>,
    browser_debug_port: Option<u16>,
    chrome_executable: Option<String>,
    backend_url: Option<String>,
    verbose_logging: Option<bool>,
    llm: LlmSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LlmSection {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    project: Option<String>,
    api_style: Option<ApiStyle>,
    timeout_secs: Option<u64>,
}

impl Config {
    /// 从环境变量加载（未设置的使用默认值）
    pub fn from_env() -> Self {
        Self::default().with_env(|name| std::env::var(name).ok())
    }

    /// 先读 TOML 配置文件，再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env(|name| std::env::var(name).ok()))
    }

    /// 从 TOML 文件加载配置
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        Ok(config)
    }

    fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            port: file.port.unwrap_or(default.port),
            browser_debug_port: file.browser_debug_port.unwrap_or(default.browser_debug_port),
            chrome_executable: file.chrome_executable.or(default.chrome_executable),
            backend_url: file.backend_url.unwrap_or(default.backend_url),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            llm_api_key: file.llm.api_key.filter(|k| !k.is_empty()),
            llm_api_base_url: file.llm.base_url.unwrap_or(default.llm_api_base_url),
            llm_model_name: file.llm.model.unwrap_or(default.llm_model_name),
            llm_project: file.llm.project.filter(|p| !p.is_empty()),
            llm_api_style: file.llm.api_style.unwrap_or(default.llm_api_style),
            llm_timeout_secs: file.llm.timeout_secs.unwrap_or(default.llm_timeout_secs),
        })
    }

    /// 用查询函数提供的变量覆盖当前配置
    fn with_env(self, var: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| var(name).filter(|v| !v.is_empty());
        Self {
            port: parsed(&var, "PORT").unwrap_or(self.port),
            browser_debug_port: parsed(&var, "BROWSER_DEBUG_PORT")
                .unwrap_or(self.browser_debug_port),
            chrome_executable: non_empty("CHROME_EXECUTABLE").or(self.chrome_executable),
            backend_url: non_empty("BACKEND_URL").unwrap_or(self.backend_url),
            verbose_logging: parsed(&var, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            llm_api_key: non_empty("OPENAI_API_KEY").or(self.llm_api_key),
            llm_api_base_url: non_empty("OPENAI_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: non_empty("OPENAI_MODEL").unwrap_or(self.llm_model_name),
            llm_project: non_empty("OPENAI_PROJECT").or(self.llm_project),
            llm_api_style: var("OPENAI_API_STYLE")
                .and_then(|v| ApiStyle::parse(&v))
                .unwrap_or(self.llm_api_style),
            llm_timeout_secs: parsed(&var, "LLM_TIMEOUT_SECS").unwrap_or(self.llm_timeout_secs),
        }
    }
}

/// 读取并解析单个变量，缺失或格式错误时为 None
fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    var(name).and_then(|v| v.trim().parse().ok())
}
