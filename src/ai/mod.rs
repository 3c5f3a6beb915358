//! AI Integration Layer
//!
//! Optional language-model cross-check of heuristic assessments.

pub mod advisory;
pub mod prompt;
pub mod provider;
pub mod timeout;
pub mod validation;

pub use advisory::{
    AdvisoryAssessment, AdvisoryOutcome, AdvisoryService, Agreement, parse_advisory,
};
pub use prompt::{PromptBuilder, PromptSection, advisory_prompt, advisory_schema};
pub use provider::{LlmProvider, LlmResponse, ProviderConfig, SharedProvider, create_provider};
pub use timeout::with_timeout;
pub use validation::{JsonRepairer, LabelledFields, extract_json_from_response, parse_labelled};
