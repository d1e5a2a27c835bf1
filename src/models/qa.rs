//! 问答数据模型
//!
//! 抽取器、中继服务和面板之间传递的线上格式，字段名统一使用 camelCase

use serde::{Deserialize, Serialize};
use std::fmt;

/// 从页面抽取出的提问
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaRequest {
    /// 题干
    pub question: String,
    /// 选项（单选 / 多选标签文本）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// 附近的代码片段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl QaRequest {
    /// 是否带有可选项
    pub fn has_options(&self) -> bool {
        self.options.as_ref().is_some_and(|o| !o.is_empty())
    }
}

/// 置信度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// 线上字符串形式
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// 严格解析，只接受小写的三个取值
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 中继服务返回的结构化答案
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QaResponse {
    /// 简短理由（1-2 句）
    pub answer: String,
    /// 选中的选项，不确定时为 null
    pub selected_option: Option<String>,
    pub confidence: Confidence,
}

impl QaResponse {
    /// 低置信度、不选任何选项的答案
    pub fn low(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            selected_option: None,
            confidence: Confidence::Low,
        }
    }
}

/// 面板展示结果
///
/// 对应一次"回答当前标签页"操作的最终结果，序列化时带 `ok` 标记
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PanelResult {
    Ok(AnsweredQuestion),
    Err(PanelError),
}

/// 成功时面板需要的全部字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub ok: bool,
    pub question: String,
    pub options: Vec<String>,
    pub snippet: Option<String>,
    pub answer: String,
    pub selected_option: Option<String>,
    pub confidence: Confidence,
}

/// 失败时的错误信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelError {
    pub ok: bool,
    pub error: String,
}

impl PanelResult {
    /// 由抽取结果和中继答案组装成功结果
    pub fn answered(payload: QaRequest, answer: QaResponse) -> Self {
        PanelResult::Ok(AnsweredQuestion {
            ok: true,
            question: payload.question,
            options: payload.options.unwrap_or_default(),
            snippet: payload.context,
            answer: answer.answer,
            selected_option: answer.selected_option,
            confidence: answer.confidence,
        })
    }

    /// 组装失败结果
    pub fn failed(error: impl Into<String>) -> Self {
        PanelResult::Err(PanelError {
            ok: false,
            error: error.into(),
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, PanelResult::Ok(_))
    }
}
