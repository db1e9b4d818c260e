use thiserror::Error;

/// Errors returned by storage collaborators.
///
/// The engine never inspects these beyond logging; they are wrapped in
/// [`super::ImportError::Storage`] and handed back to the caller.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
    #[error("storage rejected the request: {0}")]
    Rejected(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StorageError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StorageError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        StorageError::Rejected(message.into())
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StorageError::not_found("project", "42");
        assert_eq!(err.to_string(), "project not found: 42");
    }

    #[test]
    fn test_backend_is_transparent() {
        let err = StorageError::from(anyhow::anyhow!("connection dropped"));
        assert_eq!(err.to_string(), "connection dropped");
    }
}
