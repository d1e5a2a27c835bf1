//! 中继服务的 HTTP 路由

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::state::RelayState;
use super::validate::{parse_request, InvalidBody};
use crate::services::fallback;
use crate::utils::truncate_text;

/// 请求体上限 200 KiB
pub const BODY_LIMIT: usize = 200 * 1024;

/// 创建中继路由
pub fn create_router(state: RelayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/answer", post(answer))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "page-qa-relay"
    }))
}

/// POST /answer
///
/// 校验失败返回 400，其余情况一律 200 + 结构化答案
async fn answer(State(state): State<Arc<RelayState>>, body: Bytes) -> Response {
    let Some(payload) = parse_request(&body) else {
        return (StatusCode::BAD_REQUEST, Json(InvalidBody::default())).into_response();
    };

    info!("📥 [POST /answer] 收到题目: {}", truncate_text(&payload.question, 120));
    match &payload.options {
        Some(options) if !options.is_empty() => info!("   选项: {:?}", options),
        _ => info!("   选项: []"),
    }

    // 在独立任务中执行，任何 panic 都只会变成兜底答案
    let llm_state = Arc::clone(&state);
    let handle = tokio::spawn(async move { llm_state.llm.answer(&payload).await });
    let response = match handle.await {
        Ok(response) => response,
        Err(e) => {
            error!("❌ 回答任务异常退出: {}", e);
            fallback::unavailable()
        }
    };

    Json(response).into_response()
}
