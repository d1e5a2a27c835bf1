pub mod answer_parser;
pub mod fallback;
pub mod llm_service;
pub mod prompt;
pub mod relay_client;

pub use llm_service::LlmService;
pub use relay_client::RelayClient;
