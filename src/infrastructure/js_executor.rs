//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"在页面 / frame 中执行 JS"的能力

use anyhow::{anyhow, Result};
use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

/// 按 frame 执行脚本的能力
///
/// 抽取器只依赖这个能力，便于在没有浏览器的情况下测试
#[allow(async_fn_in_trait)]
pub trait FrameScripts {
    type Frame: std::fmt::Debug;

    /// 主 frame
    async fn main_frame(&self) -> Result<Self::Frame>;

    /// 除主 frame 以外的所有 frame
    async fn child_frames(&self) -> Result<Vec<Self::Frame>>;

    /// 在指定 frame 中执行脚本并返回 JSON 结果
    async fn eval_in_frame(&self, frame: &Self::Frame, js_code: &str) -> Result<JsonValue>;
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识 Question / Answer
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 在主 frame 中执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }
}

impl FrameScripts for JsExecutor {
    type Frame = FrameId;

    async fn main_frame(&self) -> Result<FrameId> {
        self.page
            .mainframe()
            .await?
            .ok_or_else(|| anyhow!("页面没有主 frame"))
    }

    async fn child_frames(&self) -> Result<Vec<FrameId>> {
        let main = self.page.mainframe().await.ok().flatten();
        let mut children: Vec<FrameId> = Vec::new();
        for frame_id in self.page.frames().await? {
            if Some(&frame_id) != main.as_ref() && !children.contains(&frame_id) {
                children.push(frame_id);
            }
        }
        debug!("页面共有 {} 个子 frame", children.len());
        Ok(children)
    }

    async fn eval_in_frame(&self, frame: &FrameId, js_code: &str) -> Result<JsonValue> {
        let context_id = self
            .page
            .frame_execution_context(frame.clone())
            .await?
            .ok_or_else(|| anyhow!("frame {:?} 没有可用的执行上下文", frame))?;

        let params = EvaluateParams::builder()
            .expression(js_code)
            .context_id(context_id)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(|e| anyhow!("构建脚本参数失败: {}", e))?;

        let result = self.page.evaluate_expression(params).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }
}
