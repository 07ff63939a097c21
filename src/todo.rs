// Todo data model.
// Defines the TodoItem entity and the supporting draft/patch/list types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TidoError};

/// Todo priority. Stored on the wire as a numeric score (10/7/5/1),
/// matching the production data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    MediumHigh,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first. Drives form cycling and the stats panel.
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::MediumHigh,
        Priority::Medium,
        Priority::Low,
    ];

    /// Numeric score used by the backing stores.
    pub fn score(self) -> u8 {
        match self {
            Priority::High => 10,
            Priority::MediumHigh => 7,
            Priority::Medium => 5,
            Priority::Low => 1,
        }
    }

    /// Map a stored score back to a priority.
    pub fn from_score(score: u8) -> Option<Self> {
        match score {
            10 => Some(Priority::High),
            7 => Some(Priority::MediumHigh),
            5 => Some(Priority::Medium),
            1 => Some(Priority::Low),
            _ => None,
        }
    }

    /// Human-readable label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::MediumHigh => "Medium-High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Next priority in descending order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Priority::High => Priority::MediumHigh,
            Priority::MediumHigh => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    /// Previous priority in descending order, wrapping around.
    pub fn prev(self) -> Self {
        match self {
            Priority::High => Priority::Low,
            Priority::MediumHigh => Priority::High,
            Priority::Medium => Priority::MediumHigh,
            Priority::Low => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = TidoError;

    /// Parse a priority label, case-insensitively. Anything outside the
    /// enumerated set is a validation error, not a silent default.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium-high" | "mediumhigh" => Ok(Priority::MediumHigh),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(TidoError::Validation(format!(
                "unknown priority {:?}; expected High, Medium-High, Medium, or Low",
                other
            ))),
        }
    }
}

/// Completion state. Wire strings are `pending` / `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn is_completed(self) -> bool {
        matches!(self, Status::Completed)
    }

    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Status::Completed
        } else {
            Status::Pending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Status::Pending),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }
}

/// A single todo record. The backing store is the source of truth;
/// `id` is assigned by the store and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub task: String,
    pub status: Status,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoItem {
    pub fn completed(&self) -> bool {
        self.status.is_completed()
    }
}

/// A validated todo that has not been written yet. The store assigns the id.
#[derive(Debug, Clone)]
pub struct TodoDraft {
    pub task: String,
    pub status: Status,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoDraft {
    /// Promote to a full item once the store has assigned an id.
    pub fn into_item(self, id: String) -> TodoItem {
        TodoItem {
            id,
            task: self.task,
            status: self.status,
            priority: self.priority,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial update applied by the adapter's `update` operation.
/// Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub task: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_none() && self.priority.is_none() && self.completed.is_none()
    }
}

/// Result of a list operation: the mapped items plus the number of records
/// skipped because they could not be mapped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOutcome {
    pub items: Vec<TodoItem>,
    pub skipped: usize,
}

impl ListOutcome {
    pub fn new(items: Vec<TodoItem>) -> Self {
        Self { items, skipped: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_score_roundtrip() {
        for p in Priority::ALL {
            assert_eq!(Priority::from_score(p.score()), Some(p));
        }
        assert_eq!(Priority::from_score(3), None);
        assert_eq!(Priority::from_score(0), None);
    }

    #[test]
    fn test_priority_parse_labels() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(
            "medium-high".parse::<Priority>().unwrap(),
            Priority::MediumHigh
        );
        assert_eq!("  low ".parse::<Priority>().unwrap(), Priority::Low);
    }

    #[test]
    fn test_priority_parse_rejects_unknown() {
        let err = "Urgent".parse::<Priority>().unwrap_err();
        assert!(matches!(err, TidoError::Validation(_)));
    }

    #[test]
    fn test_priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_cycle_covers_all() {
        let mut p = Priority::High;
        for _ in 0..4 {
            assert_eq!(p.next().prev(), p);
            p = p.next();
        }
        assert_eq!(p, Priority::High);
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(Status::parse("pending"), Some(Status::Pending));
        assert_eq!(Status::parse("completed"), Some(Status::Completed));
        assert_eq!(Status::parse("done"), None);
        assert_eq!(Status::Completed.as_str(), "completed");
        assert!(Status::from_completed(true).is_completed());
    }

    #[test]
    fn test_patch_empty() {
        assert!(TodoPatch::default().is_empty());
        assert!(!TodoPatch::default().completed(true).is_empty());
    }
}
