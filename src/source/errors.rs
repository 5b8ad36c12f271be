use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Entity not found")]
    NotFound,

    #[error("Not authorized")]
    Unauthorized,

    #[error("Request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

impl SourceError {
    /// Maps a non-success HTTP status and its body text onto the taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => SourceError::Unauthorized,
            404 => SourceError::NotFound,
            _ => SourceError::Rejected {
                status,
                message: message.into(),
            },
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            SourceError::ConnectionError(err.to_string())
        } else if err.is_decode() {
            SourceError::DecodeError(err.to_string())
        } else if let Some(status) = err.status() {
            SourceError::from_status(status.as_u16(), err.to_string())
        } else {
            SourceError::Unexpected(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::DecodeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(SourceError::from_status(401, ""), SourceError::Unauthorized);
        assert_eq!(SourceError::from_status(403, ""), SourceError::Unauthorized);
        assert_eq!(SourceError::from_status(404, ""), SourceError::NotFound);
        assert_eq!(
            SourceError::from_status(500, "boom"),
            SourceError::Rejected {
                status: 500,
                message: "boom".to_string()
            }
        );
    }
}
