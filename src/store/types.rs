//! Request and response shapes for the object-store capability

use serde::{Deserialize, Serialize};

/// Parameters for one paginated list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Only keys starting with this prefix are returned
    pub prefix: String,
    /// When set, keys with the delimiter after `prefix` are rolled up into
    /// `ListPage::sub_prefixes` instead of being returned as entries
    pub delimiter: Option<String>,
    /// Token from a previous page's `next_token`
    pub continuation_token: Option<String>,
}

impl ListRequest {
    #[must_use]
    pub fn flat(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: None,
            continuation_token: None,
        }
    }

    #[must_use]
    pub fn delimited(prefix: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            delimiter: Some(delimiter.into()),
            continuation_token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token;
        self
    }
}

/// One object as reported by a list call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
}

/// One page of a list call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub entries: Vec<ObjectEntry>,
    /// Each sub-prefix ends with the request's delimiter
    pub sub_prefixes: Vec<String>,
    /// Present while more pages remain
    pub next_token: Option<String>,
}
