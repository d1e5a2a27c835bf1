//! 结果面板 - 展示层
//!
//! 在终端中渲染一次回答的结果

use std::fmt;

use crate::models::PanelResult;

const PLACEHOLDER: &str = "-";

/// 面板上每个字段的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub status: String,
    pub question: String,
    pub snippet: String,
    pub options: String,
    pub selected_option: String,
    pub confidence: String,
    pub answer: String,
}

impl PanelView {
    /// 初始状态，所有字段都是占位符
    pub fn idle() -> Self {
        Self {
            status: "Idle".to_string(),
            question: PLACEHOLDER.to_string(),
            snippet: PLACEHOLDER.to_string(),
            options: PLACEHOLDER.to_string(),
            selected_option: PLACEHOLDER.to_string(),
            confidence: PLACEHOLDER.to_string(),
            answer: PLACEHOLDER.to_string(),
        }
    }

    /// 在初始状态上只更新状态行
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Self::idle()
        }
    }

    pub fn from_result(result: &PanelResult) -> Self {
        match result {
            PanelResult::Ok(done) => Self {
                status: "Answer generated.".to_string(),
                question: done.question.clone(),
                snippet: done.snippet.clone().unwrap_or_else(|| "(none)".to_string()),
                options: if done.options.is_empty() {
                    "(none)".to_string()
                } else {
                    done.options.join("\n")
                },
                selected_option: done
                    .selected_option
                    .clone()
                    .unwrap_or_else(|| "null".to_string()),
                confidence: done.confidence.to_string(),
                answer: done.answer.clone(),
            },
            PanelResult::Err(failure) => {
                let status = if failure.error.is_empty() {
                    "Request failed.".to_string()
                } else {
                    failure.error.clone()
                };
                Self::with_status(status)
            }
        }
    }
}

impl fmt::Display for PanelView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("Status", &self.status),
            ("Question", &self.question),
            ("Snippet", &self.snippet),
            ("Options", &self.options),
            ("Selected option", &self.selected_option),
            ("Confidence", &self.confidence),
            ("Answer", &self.answer),
        ];

        writeln!(f, "{}", "=".repeat(60))?;
        for (label, value) in fields {
            let mut lines = value.lines();
            writeln!(f, "{:<16} {}", format!("{}:", label), lines.next().unwrap_or(""))?;
            for line in lines {
                writeln!(f, "{:<16} {}", "", line)?;
            }
        }
        write!(f, "{}", "=".repeat(60))
    }
}
