use thiserror::Error;

/// Failures reported by a [`crate::store::LinkStore`] backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A link with the same code already exists.
    #[error("code already exists")]
    Conflict,

    #[error("link not found")]
    NotFound,

    /// The backend could not be reached or did not answer in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcomes reported to callers of [`crate::service::LinkService`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LinkError {
    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Invalid short code")]
    InvalidCode,

    #[error("Short code already exists")]
    CodeTaken,

    /// Every generated candidate collided with an existing code.
    #[error("Could not generate a unique short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("Not found")]
    NotFound,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for LinkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => LinkError::NotFound,
            StoreError::Unavailable(reason) => LinkError::StoreUnavailable(reason),
            StoreError::Conflict => LinkError::CodeTaken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_caller_outcomes() {
        assert_eq!(LinkError::from(StoreError::NotFound), LinkError::NotFound);
        assert_eq!(
            LinkError::from(StoreError::Unavailable("pool timed out".into())),
            LinkError::StoreUnavailable("pool timed out".into())
        );
    }

    #[test]
    fn messages_match_api_wording() {
        assert_eq!(LinkError::InvalidUrl.to_string(), "Invalid URL");
        assert_eq!(LinkError::InvalidCode.to_string(), "Invalid short code");
        assert_eq!(LinkError::CodeTaken.to_string(), "Short code already exists");
    }
}
