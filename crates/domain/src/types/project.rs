//! Projects and billing rates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entry::Category;
use super::ids::{ProjectId, UserId};

/// A named bucket of work, optionally billable at an hourly rate.
///
/// A rate of zero means "not billable".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub hourly_rate: f64,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
}

impl Project {
    #[must_use]
    pub fn is_billable(&self) -> bool {
        self.hourly_rate > 0.0
    }
}

/// Input for creating a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub hourly_rate: f64,
}
