//! 选项抽取

use std::collections::HashSet;

use super::snapshot::PageSnapshot;
use super::text::{char_len, clean_option_text, is_boilerplate_line, split_lines};

const MIN_OPTION_LEN: usize = 2;
const MAX_OPTION_LEN: usize = 160;

/// 从单选 / 多选框的标签中收集选项
///
/// 按页面顺序去重，保留首次出现的位置
pub fn extract_options(snapshot: &PageSnapshot) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut options = Vec::new();
    let mut push = |option: String| {
        if seen.insert(option.clone()) {
            options.push(option);
        }
    };

    for choice in &snapshot.choices {
        if let Some(label) = &choice.label_for {
            for line in cleaned_label_lines(label) {
                push(line);
            }
        }

        // aria-label 不做样板过滤
        if let Some(aria) = &choice.aria_label {
            let aria = clean_option_text(aria);
            if !aria.is_empty() {
                push(aria);
            }
        }

        if let Some(wrapped) = &choice.wrapped_label {
            for line in cleaned_label_lines(wrapped) {
                push(line);
            }
        }
    }

    options
        .into_iter()
        .filter(|o| (MIN_OPTION_LEN..=MAX_OPTION_LEN).contains(&char_len(o)))
        .collect()
}

fn cleaned_label_lines(raw: &str) -> impl Iterator<Item = String> + '_ {
    split_lines(raw)
        .into_iter()
        .map(|line| clean_option_text(&line))
        .filter(|line| !line.is_empty() && !is_boilerplate_line(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::snapshot::ChoiceInput;

    fn choice(label_for: Option<&str>, aria: Option<&str>, wrapped: Option<&str>) -> ChoiceInput {
        ChoiceInput {
            label_for: label_for.map(str::to_string),
            aria_label: aria.map(str::to_string),
            wrapped_label: wrapped.map(str::to_string),
        }
    }

    #[test]
    fn test_collects_and_cleans_labels() {
        let snapshot = PageSnapshot {
            choices: vec![
                choice(Some("Paris\nPress 1"), None, None),
                choice(Some("London Press 2"), None, None),
                choice(None, Some("Berlin"), None),
                choice(None, None, Some("Select one\nMadrid")),
            ],
            ..Default::default()
        };
        assert_eq!(
            extract_options(&snapshot),
            vec!["Paris", "London", "Berlin", "Madrid"]
        );
    }

    #[test]
    fn test_deduplicates_in_order() {
        let snapshot = PageSnapshot {
            choices: vec![
                choice(Some("True"), Some("True"), Some("True")),
                choice(Some("False"), None, Some("False")),
            ],
            ..Default::default()
        };
        assert_eq!(extract_options(&snapshot), vec!["True", "False"]);
    }

    #[test]
    fn test_drops_too_short_and_too_long() {
        let long = "x".repeat(161);
        let snapshot = PageSnapshot {
            choices: vec![
                choice(Some("A"), None, None),
                choice(Some(&long), None, None),
                choice(Some("OK"), None, None),
            ],
            ..Default::default()
        };
        assert_eq!(extract_options(&snapshot), vec!["OK"]);
    }

    #[test]
    fn test_aria_label_skips_boilerplate_filter() {
        let snapshot = PageSnapshot {
            choices: vec![choice(Some("Question"), Some("Question"), None)],
            ..Default::default()
        };
        assert_eq!(extract_options(&snapshot), vec!["Question"]);
    }
}
