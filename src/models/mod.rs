pub mod qa;

pub use qa::{AnsweredQuestion, Confidence, PanelError, PanelResult, QaRequest, QaResponse};
