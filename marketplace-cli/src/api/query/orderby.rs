//! Sort ordering and the per-screen sort field allow-list

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sort direction sent as `sort_order`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

/// Sort fields a screen declares as supported
///
/// Unknown fields are not rejected: the backend decides what to do with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortFields {
    allowed: Vec<String>,
}

impl SortFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Fields the admin order list sorts on
    pub fn orders() -> Self {
        Self::new(["created_at", "total_amount", "status"])
    }

    pub fn contains(&self, field: &str) -> bool {
        self.allowed.iter().any(|f| f == field)
    }

    /// Accept any field, logging when it falls outside the declared list
    pub fn check<'a>(&self, field: &'a str) -> &'a str {
        if !self.allowed.is_empty() && !self.contains(field) {
            debug!(
                "Sort field '{}' not in allow-list {:?}, passing through",
                field, self.allowed
            );
        }
        field
    }
}
