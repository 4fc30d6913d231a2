//! Append-only tally of what the user did during a session.
//!
//! History only holds the surviving edit branch; the log also remembers
//! rejected placements and undone work, which the operation score needs.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Added,
    Moved,
    Deleted,
    Cleared,
    Undone,
    Redone,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OperationLog {
    entries: Vec<Operation>,
}

impl OperationLog {
    pub fn record(&mut self, op: Operation) {
        self.entries.push(op);
    }

    pub fn entries(&self) -> &[Operation] {
        &self.entries
    }

    pub fn count(&self, op: Operation) -> usize {
        self.entries.iter().filter(|&&e| e == op).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut log = OperationLog::default();
        log.record(Operation::Added);
        log.record(Operation::Added);
        log.record(Operation::Rejected);
        assert_eq!(log.count(Operation::Added), 2);
        assert_eq!(log.count(Operation::Rejected), 1);
        assert_eq!(log.count(Operation::Cleared), 0);
        assert_eq!(log.len(), 3);
        log.clear();
        assert!(log.is_empty());
    }
}
