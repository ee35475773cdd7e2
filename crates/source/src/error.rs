use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Detected the following recursive expression cycle: {}", chain.join(" -> "))]
    RecursiveExpression { chain: Vec<String> },

    #[error("Value source '{source_name}' failed on '{expression}': {message}")]
    Source {
        source_name: String,
        expression: String,
        message: String,
    },
}
