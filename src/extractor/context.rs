use super::snapshot::PageSnapshot;
use super::text::{char_len, normalize_text};

/// 取第一个足够长、且不等于题干的代码块作为上下文
pub fn extract_context(snapshot: &PageSnapshot, question: &str) -> Option<String> {
    snapshot
        .code_blocks
        .iter()
        .map(|block| normalize_text(block))
        .filter(|block| !block.is_empty())
        .find(|block| char_len(block) > 10 && block != question)
}
