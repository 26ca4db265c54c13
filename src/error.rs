use thiserror::Error;

// Enum for handling various application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String), // Malformed inbound request, surfaced to the caller as a client error.

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError), // Errors from LLM providers, absorbed by the gateway.

    #[error("Failed to parse import file: {0}")]
    ImportParse(String), // Malformed JSON at the outer parse step of an import.

    #[error("Import bundle failed validation: {}", .0.join("; "))]
    ImportValidation(Vec<String>), // Structurally incomplete bundle, one message per problem.

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error), // Errors related to data serialization.

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error), // Input/output errors.
}

// Errors raised while calling an LLM provider. Every variant is caught by the
// gateway and converted into fallthrough to the next provider or the rule
// engine; none of them reach the end user.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Response contained no options")]
    EmptyOptions,
}
