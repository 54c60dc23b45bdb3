use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::LinkError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub code: String,
    pub url: String,
    pub clicks: i64,
    pub last_clicked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn new(code: &str, url: &str, created_at: DateTime<Utc>) -> Self {
        Link {
            code: code.to_string(),
            url: url.to_string(),
            clicks: 0,
            last_clicked: None,
            created_at,
        }
    }
}

/// Creation request body. Fields stay loosely typed so that a missing or
/// non-string value is reported as a validation error, not a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct LinkSpecification {
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub code: Value,
}

impl LinkSpecification {
    pub fn url(&self) -> Result<&str, LinkError> {
        self.url.as_str().ok_or(LinkError::InvalidUrl)
    }

    pub fn code(&self) -> Result<Option<&str>, LinkError> {
        match &self.code {
            Value::Null => Ok(None),
            Value::String(code) => Ok(Some(code.as_str())),
            _ => Err(LinkError::InvalidCode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedLink {
    pub code: String,
    pub url: String,
}

impl From<Link> for CreatedLink {
    fn from(link: Link) -> Self {
        CreatedLink {
            code: link.code,
            url: link.url,
        }
    }
}
