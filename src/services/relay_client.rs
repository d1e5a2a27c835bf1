//! 中继客户端 - 业务能力层
//!
//! CLI 侧调用中继服务 `/answer` 的能力

use tracing::debug;

use crate::error::RelayError;
use crate::models::{QaRequest, QaResponse};

/// 中继客户端
pub struct RelayClient {
    http: reqwest::Client,
    backend_url: String,
}

impl RelayClient {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            backend_url: backend_url.into(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// 把抽取结果交给中继，返回结构化答案
    pub async fn answer(&self, payload: &QaRequest) -> Result<QaResponse, RelayError> {
        debug!("POST {}", self.backend_url);

        let response = self
            .http
            .post(&self.backend_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::BadStatus(status.as_u16()));
        }

        Ok(response.json::<QaResponse>().await?)
    }
}
