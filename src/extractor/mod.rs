//! 页面抽取器 - 业务能力层
//!
//! 在当前标签页中找出题干、选项和附近的代码片段。
//!
//! 页面端只执行 [`SNAPSHOT_SCRIPT`] 取回可见文本，打分和清洗都在 Rust 端完成，
//! 同样的页面文本总会得到同样的题干。

pub mod context;
pub mod options;
pub mod question;
pub mod snapshot;
pub mod text;

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::infrastructure::FrameScripts;
use crate::models::QaRequest;

pub use context::extract_context;
pub use options::extract_options;
pub use question::{extract_question, score_line};
pub use snapshot::{ChoiceInput, PageSnapshot, SNAPSHOT_SCRIPT};

/// 从快照组装请求，没有题干时返回 None
pub fn extract_payload(snapshot: &PageSnapshot) -> Option<QaRequest> {
    let options = extract_options(snapshot);
    let question = extract_question(snapshot, &options);
    if question.is_empty() {
        return None;
    }

    let context = extract_context(snapshot, &question);
    Some(QaRequest {
        question,
        options: if options.is_empty() { None } else { Some(options) },
        context,
    })
}

/// 逐个 frame 执行快照脚本的抽取器
pub struct PageExtractor {
    retry_delay: Duration,
}

impl PageExtractor {
    pub fn new() -> Self {
        Self {
            retry_delay: Duration::from_millis(80),
        }
    }

    /// 从页面中抽取题目
    ///
    /// 先主 frame 后子 frame，第一个抽到题目的 frame 胜出；子 frame 列表取不到时只检查主 frame。
    /// 脚本执行失败会在短暂等待后重试一次，仍失败则跳过该 frame。
    pub async fn extract<H: FrameScripts>(&self, host: &H) -> Result<QaRequest, ExtractError> {
        let mut frames = Vec::new();
        match host.main_frame().await {
            Ok(main) => frames.push(main),
            Err(e) => warn!("⚠️ 获取主 frame 失败: {}", e),
        }
        match host.child_frames().await {
            Ok(children) => frames.extend(children),
            Err(e) => warn!("⚠️ 获取子 frame 列表失败，只检查主 frame: {}", e),
        }

        let mut last_error = ExtractError::NO_QUESTION.to_string();

        for frame in &frames {
            let value = match host.eval_in_frame(frame, SNAPSHOT_SCRIPT).await {
                Ok(value) => value,
                Err(first) => {
                    debug!("frame {:?} 首次执行失败: {}，稍后重试", frame, first);
                    sleep(self.retry_delay).await;
                    match host.eval_in_frame(frame, SNAPSHOT_SCRIPT).await {
                        Ok(value) => value,
                        Err(e) => {
                            debug!("frame {:?} 重试仍失败，跳过: {}", frame, e);
                            continue;
                        }
                    }
                }
            };

            let snapshot: PageSnapshot = match serde_json::from_value(value) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    last_error = ExtractError::BadSnapshot(e).to_string();
                    continue;
                }
            };

            match extract_payload(&snapshot) {
                Some(payload) => {
                    info!(
                        "✓ 在 frame {:?} 中找到题目，选项 {} 个",
                        frame,
                        payload.options.as_ref().map_or(0, Vec::len)
                    );
                    return Ok(payload);
                }
                None => last_error = ExtractError::NO_QUESTION.to_string(),
            }
        }

        Err(ExtractError::NotFound(last_error))
    }
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::{json, Value as JsonValue};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 每个 frame 按顺序返回预设结果，第一个是主 frame
    struct FakeFrames {
        frames: Vec<u32>,
        replies: Mutex<HashMap<u32, Vec<Result<JsonValue, String>>>>,
        calls: Mutex<Vec<u32>>,
        children_fail: bool,
    }

    impl FakeFrames {
        fn new(replies: Vec<(u32, Vec<Result<JsonValue, String>>)>) -> Self {
            Self {
                frames: replies.iter().map(|(id, _)| *id).collect(),
                replies: Mutex::new(replies.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
                children_fail: false,
            }
        }

        fn with_failing_children(mut self) -> Self {
            self.children_fail = true;
            self
        }
    }

    impl FrameScripts for FakeFrames {
        type Frame = u32;

        async fn main_frame(&self) -> Result<u32> {
            self.frames.first().copied().ok_or_else(|| anyhow!("no main frame"))
        }

        async fn child_frames(&self) -> Result<Vec<u32>> {
            if self.children_fail {
                return Err(anyhow!("frame tree unavailable"));
            }
            Ok(self.frames.iter().skip(1).copied().collect())
        }

        async fn eval_in_frame(&self, frame: &u32, _js_code: &str) -> Result<JsonValue> {
            self.calls.lock().unwrap().push(*frame);
            let mut replies = self.replies.lock().unwrap();
            let queue = replies.get_mut(frame).ok_or_else(|| anyhow!("unknown frame"))?;
            if queue.is_empty() {
                return Err(anyhow!("no more replies"));
            }
            queue.remove(0).map_err(|e| anyhow!(e))
        }
    }

    fn quiz_page() -> JsonValue {
        json!({
            "containers": ["Question 1\nWhich keyword declares a constant in Rust?"],
            "choices": [
                { "labelFor": "const", "ariaLabel": null, "wrappedLabel": null },
                { "labelFor": "static mut", "ariaLabel": null, "wrappedLabel": null }
            ],
            "headings": [],
            "codeBlocks": ["const MAX: u32 = 10;"]
        })
    }

    fn empty_page() -> JsonValue {
        json!({ "containers": [], "choices": [], "headings": [], "codeBlocks": [] })
    }

    fn extractor() -> PageExtractor {
        PageExtractor {
            retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_extract_payload() {
        let snapshot: PageSnapshot = serde_json::from_value(quiz_page()).unwrap();
        let payload = extract_payload(&snapshot).unwrap();
        assert_eq!(payload.question, "Which keyword declares a constant in Rust?");
        assert_eq!(
            payload.options,
            Some(vec!["const".to_string(), "static mut".to_string()])
        );
        assert_eq!(payload.context.as_deref(), Some("const MAX: u32 = 10;"));
    }

    #[test]
    fn test_extract_payload_without_options() {
        let snapshot = PageSnapshot {
            containers: vec!["Explain what a borrow checker does?".to_string()],
            ..Default::default()
        };
        let payload = extract_payload(&snapshot).unwrap();
        assert_eq!(payload.options, None);
        assert_eq!(payload.context, None);
    }

    #[test]
    fn test_extract_payload_none_without_question() {
        assert!(extract_payload(&PageSnapshot::default()).is_none());
    }

    #[tokio::test]
    async fn test_main_frame_wins() {
        let host = FakeFrames::new(vec![(0, vec![Ok(quiz_page())]), (7, vec![Ok(empty_page())])]);
        let payload = extractor().extract(&host).await.unwrap();
        assert_eq!(payload.question, "Which keyword declares a constant in Rust?");
        assert_eq!(*host.calls.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_falls_through_to_child_frame() {
        let host = FakeFrames::new(vec![(0, vec![Ok(empty_page())]), (3, vec![Ok(quiz_page())])]);
        let payload = extractor().extract(&host).await.unwrap();
        assert!(payload.options.is_some());
    }

    #[tokio::test]
    async fn test_retries_once_then_skips() {
        let host = FakeFrames::new(vec![
            (0, vec![Err("not ready".to_string()), Ok(quiz_page())]),
        ]);
        assert!(extractor().extract(&host).await.is_ok());
        assert_eq!(*host.calls.lock().unwrap(), vec![0, 0]);

        let host = FakeFrames::new(vec![
            (0, vec![Err("detached".to_string()), Err("detached".to_string())]),
            (1, vec![Ok(quiz_page())]),
        ]);
        assert!(extractor().extract(&host).await.is_ok());
        assert_eq!(*host.calls.lock().unwrap(), vec![0, 0, 1]);
    }

    #[tokio::test]
    async fn test_main_frame_used_when_child_listing_fails() {
        let host =
            FakeFrames::new(vec![(0, vec![Ok(quiz_page())]), (5, vec![Ok(empty_page())])])
                .with_failing_children();
        let payload = extractor().extract(&host).await.unwrap();
        assert_eq!(payload.question, "Which keyword declares a constant in Rust?");
        assert_eq!(*host.calls.lock().unwrap(), vec![0]);

        let host = FakeFrames::new(vec![(0, vec![Ok(empty_page())]), (5, vec![Ok(quiz_page())])])
            .with_failing_children();
        let err = extractor().extract(&host).await.unwrap_err();
        assert_eq!(err.to_string(), "No visible question found on page.");
        assert_eq!(*host.calls.lock().unwrap(), vec![0]);
    }

    #[tokio::test]
    async fn test_reports_no_question() {
        let host = FakeFrames::new(vec![(0, vec![Ok(empty_page())])]);
        let err = extractor().extract(&host).await.unwrap_err();
        assert_eq!(err.to_string(), "No visible question found on page.");
    }

    #[tokio::test]
    async fn test_reports_last_snapshot_error() {
        let host = FakeFrames::new(vec![(0, vec![Ok(json!("not an object"))])]);
        let err = extractor().extract(&host).await.unwrap_err();
        assert!(err.to_string().starts_with("页面快照格式错误"));
    }
}
