pub mod logging;

pub use logging::{key_fingerprint, truncate_text};
