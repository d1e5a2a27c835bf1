//! 页面快照
//!
//! 页面端脚本只负责"可见性判断 + 取文本"，结果在 Rust 端打分

use serde::{Deserialize, Serialize};

/// 注入页面执行的快照脚本
pub const SNAPSHOT_SCRIPT: &str = include_str!("snapshot.js");

/// 一个 frame 中可见文本的快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSnapshot {
    /// 题目容器（main / article / section / form / *question*）的 innerText
    pub containers: Vec<String>,
    /// 单选 / 多选框对应的标签文本
    pub choices: Vec<ChoiceInput>,
    /// h1-h4 / legend / label 的文本
    pub headings: Vec<String>,
    /// pre / code 的文本
    pub code_blocks: Vec<String>,
}

/// 一个选择框可找到的全部标签来源
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChoiceInput {
    /// `label[for=id]` 的可见文本
    pub label_for: Option<String>,
    /// `aria-label` 属性
    pub aria_label: Option<String>,
    /// 外层 `<label>` 的可见文本
    pub wrapped_label: Option<String>,
}
