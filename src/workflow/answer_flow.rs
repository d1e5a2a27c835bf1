//! 回答流程 - 流程层
//!
//! 核心职责：定义"回答当前标签页"这一次操作的完整流程
//!
//! 流程顺序：
//! 1. 在页面各 frame 中抽取题目
//! 2. 调用中继服务
//! 3. 组装面板结果（任何失败都变成错误信息）

use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::extractor::PageExtractor;
use crate::infrastructure::FrameScripts;
use crate::models::{PanelResult, QaRequest, QaResponse};
use crate::services::RelayClient;
use crate::utils::truncate_text;

/// 回答流程
///
/// - 不持有任何资源（page）
/// - 只依赖业务能力（extractor / relay client）
pub struct AnswerFlow {
    extractor: PageExtractor,
    relay: RelayClient,
}

impl AnswerFlow {
    /// 创建新的回答流程
    pub fn new(config: &Config) -> Self {
        Self {
            extractor: PageExtractor::new(),
            relay: RelayClient::new(config.backend_url.clone()),
        }
    }

    /// 只抽取题目，不调用中继
    pub async fn extract<H: FrameScripts>(&self, host: &H) -> AppResult<QaRequest> {
        info!("🔍 正在从页面抽取题目...");
        let payload = self.extractor.extract(host).await?;
        info!("✓ 题干: {}", truncate_text(&payload.question, 80));
        Ok(payload)
    }

    /// 抽取并回答
    pub async fn answer<H: FrameScripts>(&self, host: &H) -> AppResult<(QaRequest, QaResponse)> {
        let payload = self.extract(host).await?;

        info!("📤 正在请求中继: {}", self.relay.backend_url());
        let answer = self.relay.answer(&payload).await?;
        info!("✓ 已获得答案 (置信度: {})", answer.confidence);

        Ok((payload, answer))
    }

    /// 执行完整流程并转换为面板结果
    pub async fn run<H: FrameScripts>(&self, host: &H) -> PanelResult {
        match self.answer(host).await {
            Ok((payload, answer)) => PanelResult::answered(payload, answer),
            Err(e) => {
                warn!("⚠️ 回答失败: {}", e);
                PanelResult::failed(e.to_string())
            }
        }
    }
}
