pub mod gemini;
pub mod oracle;
pub mod scripted;
pub mod tier;
pub mod types;

pub use gemini::GeminiOracle;
pub use oracle::IntelligenceOracle;
pub use scripted::ScriptedOracle;
pub use tier::url_tier;
pub use types::*;
