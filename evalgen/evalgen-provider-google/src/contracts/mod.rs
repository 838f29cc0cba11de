pub mod models;
pub use models::{
    GoogleInstructRequest,
    GoogleContent,
    GooglePart,
    GoogleGenerationConfig,
    GoogleGenerateResponse,
    GoogleCandidate,
    GoogleUsageMetadata,
    GooglePromptFeedback,
    to_google_schema,
};
