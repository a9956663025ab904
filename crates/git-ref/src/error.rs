/// Error types for reference operations.
///
/// Every variant names the reference involved.
#[derive(Debug, thiserror::Error)]
pub enum RefError {
    #[error("invalid ref name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("ref not found: {0}")]
    NotFound(String),

    #[error("symbolic ref cycle detected at '{name}'")]
    ResolutionCycle { name: String },

    #[error("symbolic ref '{name}' points at missing ref '{target}'")]
    Dangling { name: String, target: String },

    #[error("ref already exists: {0}")]
    AlreadyExists(String),

    #[error("reflog parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Util(#[from] git_utils::UtilError),

    #[error(transparent)]
    Hash(#[from] git_hash::HashError),
}

impl RefError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RefError::NotFound(_))
    }
}
