//! 兜底答案
//!
//! 中继在任何失败路径上都返回这里的固定答案，保证调用方总能拿到合法结构

use crate::models::{QaRequest, QaResponse};

/// 流程异常时的通用兜底
pub const UNAVAILABLE_ANSWER: &str = "Unable to generate a reliable answer right now.";

/// 额度不足时的提示
pub const QUOTA_ANSWER: &str = "OpenAI quota exceeded. The backend is connected, but billing/quota must be increased before generating real answers.";

const NO_OPTION_CHOSEN: &str = "I cannot confidently choose an option from the available page content. Please review the options manually.";
const NOT_ENOUGH_INFO: &str = "I do not have enough reliable page information to answer this confidently.";

/// 通用兜底答案
pub fn unavailable() -> QaResponse {
    QaResponse::low(UNAVAILABLE_ANSWER)
}

/// 额度不足答案
pub fn quota_exceeded() -> QaResponse {
    QaResponse::low(QUOTA_ANSWER)
}

/// 没有可用模型输出时的保守答案
///
/// 有上下文时在开头带上上下文，有选项时提示人工核对
pub fn mock_response(input: &QaRequest) -> QaResponse {
    let prefix = input
        .context
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("Context: {}. ", c))
        .unwrap_or_default();

    let body = if input.has_options() {
        NO_OPTION_CHOSEN
    } else {
        NOT_ENOUGH_INFO
    };

    QaResponse::low(format!("{}{}", prefix, body))
}
