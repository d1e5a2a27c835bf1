//! # Page QA
//!
//! 从当前浏览器标签页中抽取题目，经中继服务交给 LLM，并展示结构化答案
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供按 frame 执行脚本的能力
//!
//! ### ② 业务能力层（Extractor / Services）
//! - `extractor/` - 对页面可见文本打分，找出题干、选项和代码片段
//! - `LlmService` - 调用模型并解析输出，失败时给出兜底答案
//! - `RelayClient` - 调用中继服务
//!
//! ### ③ 流程层（Workflow）
//! - `AnswerFlow` - 抽取 → 中继 → 面板结果
//!
//! ### ④ 服务与展示（Relay / Panel）
//! - `relay/` - 无状态 HTTP 端点 `POST /answer`
//! - `panel` - 终端面板
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod config;
pub mod error;
pub mod extractor;
pub mod infrastructure;
pub mod models;
pub mod panel;
pub mod relay;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_active_page;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use extractor::{extract_payload, PageExtractor, PageSnapshot};
pub use infrastructure::{FrameScripts, JsExecutor};
pub use models::{Confidence, PanelResult, QaRequest, QaResponse};
pub use relay::create_router;
pub use services::{LlmService, RelayClient};
pub use workflow::AnswerFlow;
