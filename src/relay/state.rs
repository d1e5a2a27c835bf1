//! 中继服务共享状态

use crate::config::Config;
use crate::services::LlmService;

/// 中继服务状态，只持有无状态的 LLM 服务
pub struct RelayState {
    pub llm: LlmService,
}

impl RelayState {
    pub fn new(config: &Config) -> Self {
        Self {
            llm: LlmService::new(config),
        }
    }
}
