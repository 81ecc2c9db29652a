pub mod prompt;
pub mod types;

pub use prompt::{build_prompt, language_for_extension, Prompt, SYSTEM_INSTRUCTION};
pub use types::{ExplanationRequest, ExplanationResult, InvalidRequest};
