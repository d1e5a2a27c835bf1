//! 固定的系统提示词和输出 JSON Schema

use serde_json::{json, Value as JsonValue};

/// 系统提示词
pub const SYSTEM_PROMPT: &str = r#"You are answering a question extracted from a webpage.

Rules:
- Be conservative and avoid hallucinations.
- Use only the provided question, options, and context.
- If there is not enough information, clearly say that.
- Select an option only when confidence is high.
- If unsure, selectedOption must be null.
- The answer field must be a brief rationale (1-2 sentences), not just a copy of an option label.
- If selectedOption is set, explain why it was chosen in the answer.
- Return JSON only with this exact schema:
  {"answer":"string","selectedOption":"string|null","confidence":"low|medium|high"}"#;

/// Schema 名称
pub const SCHEMA_NAME: &str = "qa_answer";

/// 模型输出必须满足的 JSON Schema
pub fn answer_schema() -> JsonValue {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "answer": { "type": "string" },
            "selectedOption": { "type": ["string", "null"] },
            "confidence": { "type": "string", "enum": ["low", "medium", "high"] }
        },
        "required": ["answer", "selectedOption", "confidence"]
    })
}
