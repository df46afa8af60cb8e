pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{CompletionProvider, CompletionRequest, NO_CONTENT_MESSAGE, ProviderError};
pub use providers::GeminiProvider;
pub use types::{Content, GenerateRequest, GenerateResponse, Part, WireRole};
