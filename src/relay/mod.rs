//! 中继服务
//!
//! 无状态 HTTP 端点：校验请求、转发给 LLM、返回结构化答案。
//!
//! - `POST /answer` 回答一道题
//! - `GET /health` 健康检查

mod http;
pub mod state;
pub mod validate;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

pub use http::{create_router, BODY_LIMIT};
pub use state::RelayState;

use crate::config::Config;
use crate::utils::logging;

/// 启动中继服务并一直运行
pub async fn serve(config: &Config) -> Result<()> {
    let state = RelayState::new(config);
    logging::log_startup(
        &format!("localhost:{}", config.port),
        state.llm.has_api_key(),
        state.llm.model_name(),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;

    axum::serve(listener, create_router(state))
        .await
        .context("中继服务异常退出")?;

    Ok(())
}
