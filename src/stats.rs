// Statistics over the current todo list.
// Feeds the sidebar panel: completion progress and priority distribution.

use crate::todo::{Priority, TodoItem};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Counts per priority, highest first (same order as `Priority::ALL`).
    pub by_priority: [usize; 4],
}

impl Stats {
    pub fn collect(items: &[TodoItem]) -> Self {
        let mut stats = Stats {
            total: items.len(),
            ..Stats::default()
        };
        for item in items {
            if item.completed() {
                stats.completed += 1;
            } else {
                stats.pending += 1;
            }
            let slot = Priority::ALL
                .iter()
                .position(|p| *p == item.priority)
                .unwrap_or(Priority::ALL.len() - 1);
            stats.by_priority[slot] += 1;
        }
        stats
    }

    /// Completed fraction in [0, 1]; zero for an empty list.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn count_for(&self, priority: Priority) -> usize {
        let slot = Priority::ALL.iter().position(|p| *p == priority).unwrap_or(0);
        self.by_priority[slot]
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::todo::Status;

    fn item(priority: Priority, status: Status) -> TodoItem {
        let now = Utc::now();
        TodoItem {
            id: "x".into(),
            task: "t".into(),
            status,
            priority,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_list() {
        let stats = Stats::collect(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.progress(), 0.0);
    }

    #[test]
    fn test_counts_and_progress() {
        let items = vec![
            item(Priority::High, Status::Completed),
            item(Priority::High, Status::Pending),
            item(Priority::Low, Status::Completed),
            item(Priority::Medium, Status::Pending),
        ];
        let stats = Stats::collect(&items);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.progress(), 0.5);
        assert_eq!(stats.count_for(Priority::High), 2);
        assert_eq!(stats.count_for(Priority::MediumHigh), 0);
        assert_eq!(stats.count_for(Priority::Medium), 1);
        assert_eq!(stats.count_for(Priority::Low), 1);
    }
}
