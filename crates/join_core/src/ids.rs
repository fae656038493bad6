use crate::error::AppError;
use crate::model::{Contact, Subtask, Task};
use std::collections::HashSet;

pub trait Identified {
    const KIND: &'static str;

    fn id(&self) -> u64;
}

impl Identified for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for Contact {
    const KIND: &'static str = "contact";

    fn id(&self) -> u64 {
        self.id
    }
}

impl Identified for Subtask {
    const KIND: &'static str = "subtask";

    fn id(&self) -> u64 {
        self.task_id
    }
}

/// Next free identifier: one past the largest in use, starting at 1.
pub fn next_id<T: Identified>(items: &[T]) -> u64 {
    items.iter().map(Identified::id).max().unwrap_or(0) + 1
}

pub fn ensure_unique<T: Identified>(items: &[T], id: u64) -> Result<(), AppError> {
    if items.iter().any(|item| item.id() == id) {
        return Err(AppError::DuplicateId { kind: T::KIND, id });
    }
    Ok(())
}

pub fn first_duplicate<T: Identified>(items: &[T]) -> Option<u64> {
    let mut seen = HashSet::new();
    items.iter().map(Identified::id).find(|id| !seen.insert(*id))
}
