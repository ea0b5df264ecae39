use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TagMkvError;

/// Namespaced identifier linking a file to a metadata-service record,
/// e.g. `movie/603` or `tv/1399`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalRef {
    pub namespace: String,
    pub id: String,
}

impl ExternalRef {
    pub const MOVIE: &'static str = "movie";
    pub const TV: &'static str = "tv";

    pub fn new(namespace: impl Into<String>, id: impl ToString) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.to_string(),
        }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(Self::MOVIE, id)
    }

    pub fn tv(id: u64) -> Self {
        Self::new(Self::TV, id)
    }
}

impl FromStr for ExternalRef {
    type Err = TagMkvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TagMkvError::InvalidExternalRef {
            value: s.to_string(),
        };
        let (namespace, id) = s.trim().split_once('/').ok_or_else(invalid)?;
        if namespace.is_empty() || id.is_empty() || id.contains('/') {
            return Err(invalid());
        }
        Ok(Self::new(namespace, id))
    }
}

impl fmt::Display for ExternalRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.id)
    }
}
