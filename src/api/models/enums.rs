use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Publication state of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum DiagramStatus {
    Published,
    Draft,
    Archived,
}

impl DiagramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramStatus::Published => "Published",
            DiagramStatus::Draft => "Draft",
            DiagramStatus::Archived => "Archived",
        }
    }
}

impl fmt::Display for DiagramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Published" => Ok(DiagramStatus::Published),
            "Draft" => Ok(DiagramStatus::Draft),
            "Archived" => Ok(DiagramStatus::Archived),
            other => Err(format!("Unknown diagram status: {}", other)),
        }
    }
}
