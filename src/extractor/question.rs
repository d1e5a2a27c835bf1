//! 题干抽取
//!
//! 对所有容器中的可见行打分，取分数最高的一行作为题干

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::snapshot::PageSnapshot;
use super::text::{char_len, is_boilerplate_line, normalize_text, split_lines};

/// 参与打分的最短行长度
const MIN_QUESTION_LEN: usize = 12;

static INSTRUCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fill in the blank|correct option|choose|select")
        .expect("valid instruction regex")
});
// 单词边界只认 ASCII 单词字符，与浏览器端正则一致
static LABEL_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)(question|answer|practice round)(?-u:\b)")
        .expect("valid label word regex")
});
static PRESS_HINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)press\s+\d+(?-u:\b)").expect("valid press hint regex")
});

/// 单行得分
///
/// `option_set` 为小写后的选项集合，与选项相同的行会被压低
pub fn score_line(line: &str, option_set: &HashSet<String>) -> f64 {
    let mut score = 0.0;
    if line.contains('?') {
        score += 3.0;
    }
    if INSTRUCTION_RE.is_match(line) {
        score += 2.0;
    }
    if LABEL_WORD_RE.is_match(line) {
        score -= 2.0;
    }
    if PRESS_HINT_RE.is_match(line) {
        score -= 4.0;
    }
    if option_set.contains(&line.to_lowercase()) {
        score -= 5.0;
    }
    score + (char_len(line) as f64 / 40.0).min(3.0)
}

/// 选出题干，找不到时返回空字符串
///
/// 同分时保留先出现的行，结果只取决于快照内容
pub fn extract_question(snapshot: &PageSnapshot, options: &[String]) -> String {
    let option_set: HashSet<String> = options.iter().map(|o| o.to_lowercase()).collect();

    let candidates = snapshot
        .containers
        .iter()
        .flat_map(|raw| split_lines(raw))
        .filter(|line| char_len(line) >= MIN_QUESTION_LEN && !is_boilerplate_line(line))
        .collect::<Vec<_>>();

    let mut best: Option<(f64, &str)> = None;
    for line in &candidates {
        let score = score_line(line, &option_set);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, line.as_str()));
        }
    }

    if let Some((_, line)) = best {
        return line.to_string();
    }

    // 没有容器命中时退回到标题类元素
    snapshot
        .headings
        .iter()
        .map(|h| normalize_text(h))
        .find(|line| {
            char_len(line) >= MIN_QUESTION_LEN
                && !is_boilerplate_line(line)
                && !option_set.contains(&line.to_lowercase())
        })
        .unwrap_or_default()
}
