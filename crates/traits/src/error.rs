use thiserror::Error;

/// Error type for the collaborators the document build delegates to.
#[derive(Error, Debug, Clone)]
pub enum CollaboratorError {
    #[error("Renderer '{renderer}' failed: {message}")]
    Render { renderer: String, message: String },

    #[error("Failed to generate report '{report}': {message}")]
    Report { report: String, message: String },

    #[error("Failed to load decoration model: {0}")]
    Decoration(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for CollaboratorError {
    fn from(err: std::io::Error) -> Self {
        CollaboratorError::Io(err.to_string())
    }
}
