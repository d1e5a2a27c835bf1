//! 请求体校验与规范化

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::models::QaRequest;

/// 题干去掉首尾空白后的最短长度
const MIN_QUESTION_LEN: usize = 3;

/// 校验失败时返回给调用方的说明
#[derive(Debug, Serialize)]
pub struct InvalidBody {
    pub error: &'static str,
    pub expected: ExpectedShape,
}

#[derive(Debug, Serialize)]
pub struct ExpectedShape {
    pub question: &'static str,
    pub options: &'static str,
    pub context: &'static str,
}

impl Default for InvalidBody {
    fn default() -> Self {
        Self {
            error: "Invalid request body",
            expected: ExpectedShape {
                question: "string",
                options: "string[] (optional)",
                context: "string (optional)",
            },
        }
    }
}

/// 解析并校验请求体，通过时返回规范化后的请求
///
/// - `question` 必须是字符串，去空白后至少 3 个字符
/// - `options` 可省略；出现时必须是非空字符串数组元素
/// - `context` 可省略；出现时必须是字符串
pub fn parse_request(body: &[u8]) -> Option<QaRequest> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;
    let obj = value.as_object()?;

    let question = obj.get("question")?.as_str()?.trim();
    if question.chars().count() < MIN_QUESTION_LEN {
        return None;
    }

    let options = match obj.get("options") {
        None => None,
        Some(JsonValue::Array(items)) => {
            let mut options = Vec::with_capacity(items.len());
            for item in items {
                let text = item.as_str()?;
                if text.trim().is_empty() {
                    return None;
                }
                options.push(text.to_string());
            }
            Some(options)
        }
        Some(_) => return None,
    };

    let context = match obj.get("context") {
        None => None,
        Some(JsonValue::String(context)) => {
            let trimmed = context.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(_) => return None,
    };

    Some(QaRequest {
        question: question.to_string(),
        options,
        context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Option<QaRequest> {
        parse_request(body.as_bytes())
    }

    #[test]
    fn test_accepts_minimal_request() {
        let req = parse(r#"{"question":"  Why?  "}"#).unwrap();
        assert_eq!(req.question, "Why?");
        assert_eq!(req.options, None);
        assert_eq!(req.context, None);
    }

    #[test]
    fn test_normalises_context_but_not_options() {
        let req =
            parse(r#"{"question":"Pick one","options":[" A ","B"],"context":"  x = 1  "}"#).unwrap();
        assert_eq!(req.options, Some(vec![" A ".to_string(), "B".to_string()]));
        assert_eq!(req.context.as_deref(), Some("x = 1"));

        let req = parse(r#"{"question":"Pick one","context":"   "}"#).unwrap();
        assert_eq!(req.context, None);
    }

    #[test]
    fn test_empty_options_array_is_allowed() {
        let req = parse(r#"{"question":"Pick one","options":[]}"#).unwrap();
        assert_eq!(req.options, Some(vec![]));
    }

    #[test]
    fn test_rejects_invalid_bodies() {
        assert!(parse("").is_none());
        assert!(parse("not json").is_none());
        assert!(parse(r#"["question"]"#).is_none());
        assert!(parse(r#"{}"#).is_none());
        assert!(parse(r#"{"question":42}"#).is_none());
        assert!(parse(r#"{"question":"  ab  "}"#).is_none());
        assert!(parse(r#"{"question":"Pick one","options":"A"}"#).is_none());
        assert!(parse(r#"{"question":"Pick one","options":null}"#).is_none());
        assert!(parse(r#"{"question":"Pick one","options":["A",""]}"#).is_none());
        assert!(parse(r#"{"question":"Pick one","options":["A",1]}"#).is_none());
        assert!(parse(r#"{"question":"Pick one","context":7}"#).is_none());
    }

    #[test]
    fn test_invalid_body_shape() {
        let value = serde_json::to_value(InvalidBody::default()).unwrap();
        assert_eq!(value["error"], "Invalid request body");
        assert_eq!(value["expected"]["options"], "string[] (optional)");
    }
}
