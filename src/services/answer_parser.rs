//! 模型输出解析
//!
//! 模型输出是半结构化文本，这里负责取出文本、修复常见的包裹格式、
//! 并校验是否符合约定的 JSON 结构

use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::models::{Confidence, QaResponse};

/// 从 Responses API 的返回体中取出模型文本
///
/// 优先使用顶层 `output_text`，否则拼接 `output[].content[]` 中的文本 / JSON 片段
pub fn extract_response_text(data: &JsonValue) -> String {
    let Some(top) = data.as_object() else {
        return String::new();
    };

    if let Some(text) = top.get("output_text").and_then(JsonValue::as_str) {
        if !text.trim().is_empty() {
            return text.to_string();
        }
    }

    let mut chunks = Vec::new();
    let items = top.get("output").and_then(JsonValue::as_array);
    for item in items.into_iter().flatten() {
        let contents = item.get("content").and_then(JsonValue::as_array);
        for content in contents.into_iter().flatten() {
            let is_text = content.get("type").and_then(JsonValue::as_str) == Some("output_text");
            match (is_text, content.get("text").and_then(JsonValue::as_str)) {
                (true, Some(text)) => chunks.push(text.to_string()),
                _ => {
                    if let Some(json) = content.get("json") {
                        chunks.push(json.to_string());
                    }
                }
            }
        }
    }

    chunks.join("\n").trim().to_string()
}

/// 去掉 Markdown 代码围栏
///
/// 支持多行围栏和 "```json {...}```" 这样的单行围栏
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        // 跳过语言标记所在的第一行
        Some((_, body)) => body,
        None => {
            let rest = rest.trim_start();
            rest.strip_prefix("json")
                .or_else(|| rest.strip_prefix("JSON"))
                .unwrap_or(rest)
        }
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// 截取最外层的 `{ ... }` 并解析
fn parse_outer_braces(text: &str) -> Option<Map<String, JsonValue>> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(JsonValue::Object(map)) => Some(map),
        _ => None,
    }
}

/// 尝试把文本解析为 JSON 对象，必要时截取最外层的 `{ ... }`
fn parse_object(raw: &str) -> Option<Map<String, JsonValue>> {
    let text = strip_code_fence(raw);
    if let Ok(JsonValue::Object(map)) = serde_json::from_str(text) {
        return Some(map);
    }

    debug!("模型输出不是纯 JSON，截取对象片段重新解析");
    parse_outer_braces(text).or_else(|| parse_outer_braces(raw))
}

/// 解析模型输出为结构化答案，不符合约定时返回 None
///
/// - `answer` 必须是字符串
/// - `confidence` 必须是 low / medium / high 之一
/// - `selectedOption` 非字符串时一律视为 null
pub fn parse_answer(raw: &str) -> Option<QaResponse> {
    let map = parse_object(raw)?;

    let answer = map.get("answer")?.as_str()?.to_string();
    let confidence = map
        .get("confidence")
        .and_then(JsonValue::as_str)
        .and_then(Confidence::parse)?;
    let selected_option = map
        .get("selectedOption")
        .and_then(JsonValue::as_str)
        .map(str::to_string);

    Some(QaResponse {
        answer,
        selected_option,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_text_wins() {
        let data = json!({
            "output_text": "{\"answer\":\"a\"}",
            "output": [{ "content": [{ "type": "output_text", "text": "ignored" }] }]
        });
        assert_eq!(extract_response_text(&data), "{\"answer\":\"a\"}");
    }

    #[test]
    fn test_joins_output_chunks() {
        let data = json!({
            "output_text": "   ",
            "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "first" },
                    { "type": "refusal", "refusal": "nope" },
                    { "type": "output_json", "json": { "answer": "x" } }
                ]}
            ]
        });
        assert_eq!(extract_response_text(&data), "first\n{\"answer\":\"x\"}");
    }

    #[test]
    fn test_non_object_yields_empty() {
        assert_eq!(extract_response_text(&json!(null)), "");
        assert_eq!(extract_response_text(&json!([1, 2])), "");
        assert_eq!(extract_response_text(&json!({ "output": "bad" })), "");
    }

    #[test]
    fn test_parse_valid_answer() {
        let resp = parse_answer(
            r#"{"answer":"Merge sort keeps equal keys in order.","selectedOption":"Merge sort","confidence":"high"}"#,
        )
        .unwrap();
        assert_eq!(resp.selected_option.as_deref(), Some("Merge sort"));
        assert_eq!(resp.confidence, Confidence::High);
    }

    #[test]
    fn test_parse_coerces_selected_option() {
        let resp = parse_answer(r#"{"answer":"x","selectedOption":3,"confidence":"low"}"#).unwrap();
        assert_eq!(resp.selected_option, None);

        let resp = parse_answer(r#"{"answer":"x","confidence":"medium"}"#).unwrap();
        assert_eq!(resp.selected_option, None);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_answer("").is_none());
        assert!(parse_answer("not json").is_none());
        assert!(parse_answer(r#"{"answer":1,"confidence":"low"}"#).is_none());
        assert!(parse_answer(r#"{"answer":"x","confidence":"certain"}"#).is_none());
        assert!(parse_answer(r#"{"answer":"x","confidence":"High"}"#).is_none());
        assert!(parse_answer(r#"["answer"]"#).is_none());
    }

    #[test]
    fn test_parse_repairs_fenced_output() {
        let raw = "```json\n{\"answer\":\"Because.\",\"selectedOption\":null,\"confidence\":\"medium\"}\n```";
        let resp = parse_answer(raw).unwrap();
        assert_eq!(resp.answer, "Because.");
        assert_eq!(resp.confidence, Confidence::Medium);
    }

    #[test]
    fn test_parse_repairs_surrounding_prose() {
        let raw = "Sure! Here is the result: {\"answer\":\"Yes.\",\"selectedOption\":\"True\",\"confidence\":\"high\"} Hope it helps.";
        let resp = parse_answer(raw).unwrap();
        assert_eq!(resp.selected_option.as_deref(), Some("True"));
    }

    #[test]
    fn test_parse_repairs_single_line_fence() {
        let raw = "```{\"answer\":\"Because.\",\"selectedOption\":null,\"confidence\":\"low\"}```";
        let resp = parse_answer(raw).unwrap();
        assert_eq!(resp.answer, "Because.");
        assert_eq!(resp.confidence, Confidence::Low);

        let raw = "```json {\"answer\":\"Because.\",\"selectedOption\":\"B\",\"confidence\":\"high\"} ```";
        let resp = parse_answer(raw).unwrap();
        assert_eq!(resp.selected_option.as_deref(), Some("B"));
    }

    #[test]
    fn test_strip_code_fence_forms() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json {} ```"), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
