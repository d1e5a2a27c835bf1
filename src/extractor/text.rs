//! 页面文本清洗工具
//!
//! 抽取规则全部作用在已经取回的纯文本上，与浏览器无关

use phf::phf_set;
use regex::Regex;
use std::sync::LazyLock;

/// 整行即为样板文字的小写形式
static BOILERPLATE_LINES: phf::Set<&'static str> = phf_set! {
    "question",
    "practice round",
    "select one",
};

static QUESTION_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^question\s+\d+").expect("valid question number regex"));
static PRESS_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^press\s+\d+$").expect("valid press-only regex"));
static TRAILING_PRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*Press\s+\d+\s*$").expect("valid trailing press regex"));
static PRESS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?-u:\b)Press\s+\d+(?-u:\b)").expect("valid press token regex")
});

/// 把连续空白折叠成一个空格并去掉首尾空白
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按换行拆分，逐行清洗并丢弃空行
pub fn split_lines(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(normalize_text)
        .filter(|line| !line.is_empty())
        .collect()
}

/// 去掉选项上的键盘提示（如 "Press 1"）
pub fn clean_option_text(text: &str) -> String {
    let without_trailing = TRAILING_PRESS_RE.replace(text, "");
    let without_tokens = PRESS_TOKEN_RE.replace_all(&without_trailing, "");
    normalize_text(&without_tokens)
}

/// 是否为页面样板文字（题号、"Select one" 等）
pub fn is_boilerplate_line(line: &str) -> bool {
    if BOILERPLATE_LINES.contains(line.to_lowercase().as_str()) {
        return true;
    }
    QUESTION_NUMBER_RE.is_match(line) || PRESS_ONLY_RE.is_match(line)
}

/// 字符数（而不是字节数）
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
