use crate::error::AppError;
use crate::ids;
use crate::model::{Category, Contact, Priority, Progress, Subtask, Task};
use crate::storage::TASKS_KEY;
use crate::storage::sync::SyncedStore;
use crate::text::{capitalize_first, contains_ignore_case};
use std::sync::Arc;
use tracing::info;

/// Input for a new task; the repository assigns the identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: String,
    pub priority: Option<Priority>,
    pub assigned_to: Vec<Contact>,
    pub subtasks: Vec<Subtask>,
    pub progress: Progress,
}

/// Fields to overwrite on an existing task. `None` leaves a field untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<Vec<Contact>>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub task: Task,
    pub from: Progress,
    pub changed: bool,
}

/// Owns the board's tasks. Every mutation is written through the store
/// before the in-memory list is replaced; concurrent writers are not merged,
/// the last one to persist wins.
pub struct TaskRepository {
    store: Arc<SyncedStore>,
    tasks: Vec<Task>,
}

impl TaskRepository {
    pub fn load(store: Arc<SyncedStore>) -> Result<Self, AppError> {
        let tasks: Vec<Task> = store.read(TASKS_KEY)?.unwrap_or_default();
        if let Some(id) = ids::first_duplicate(&tasks) {
            return Err(AppError::invalid_data(format!(
                "stored tasks contain id {id} more than once"
            )));
        }
        for task in &tasks {
            if let Some(subtask_id) = ids::first_duplicate(&task.subtasks) {
                return Err(AppError::invalid_data(format!(
                    "task {} contains subtask id {subtask_id} more than once",
                    task.id
                )));
            }
        }
        Ok(Self { store, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: u64) -> Result<&Task, AppError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))
    }

    /// Case-insensitive substring match on title or description. Leaves the
    /// repository untouched.
    pub fn search(&self, query: &str) -> Vec<Task> {
        search_tasks(&self.tasks, query)
    }

    pub fn create(&mut self, draft: TaskDraft) -> Result<Task, AppError> {
        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;
        let due_date = required("due date", &draft.due_date)?;
        let category = required_category(&draft.category)?;
        check_subtasks(&draft.subtasks)?;

        let task = Task {
            id: ids::next_id(&self.tasks),
            title: capitalize_first(&title),
            description: capitalize_first(&description),
            due_date,
            priority: draft.priority.unwrap_or_default(),
            assigned_to: draft.assigned_to,
            category,
            subtasks: draft.subtasks,
            progress: draft.progress,
        };

        self.insert(task.clone())?;
        info!(task_id = task.id, column = %task.progress, "task created");
        Ok(task)
    }

    /// Appends a fully built task; fails on an identifier already in use.
    pub fn insert(&mut self, task: Task) -> Result<(), AppError> {
        ids::ensure_unique(&self.tasks, task.id)?;
        check_subtasks(&task.subtasks)?;
        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)
    }

    pub fn update(&mut self, id: u64, patch: TaskPatch) -> Result<Task, AppError> {
        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))?;

        if let Some(title) = patch.title.as_deref() {
            task.title = capitalize_first(&required("title", title)?);
        }
        if let Some(description) = patch.description.as_deref() {
            task.description = capitalize_first(&required("description", description)?);
        }
        if let Some(due_date) = patch.due_date.as_deref() {
            task.due_date = required("due date", due_date)?;
        }
        if let Some(category) = patch.category.as_deref() {
            task.category = required_category(category)?;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(subtasks) = patch.subtasks {
            check_subtasks(&subtasks)?;
            task.subtasks = subtasks;
        }

        let updated = task.clone();
        self.commit(next)?;
        info!(task_id = id, "task updated");
        Ok(updated)
    }

    pub fn remove(&mut self, id: u64) -> Result<Task, AppError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(task_id = id, "task removed");
        Ok(removed)
    }

    /// The single entry point for column changes. Moving a task to the column
    /// it already occupies changes nothing and writes nothing.
    pub fn move_task(&mut self, id: u64, to: Progress) -> Result<MoveOutcome, AppError> {
        let current = self.get(id)?.clone();
        if current.progress == to {
            return Ok(MoveOutcome {
                from: to,
                task: current,
                changed: false,
            });
        }

        let mut moved = current.clone();
        moved.progress = to;
        let next = self
            .tasks
            .iter()
            .map(|task| if task.id == id { moved.clone() } else { task.clone() })
            .collect();
        self.commit(next)?;
        info!(task_id = id, from = %current.progress, to = %to, "task moved");

        Ok(MoveOutcome {
            task: moved,
            from: current.progress,
            changed: true,
        })
    }

    pub fn toggle_subtask(&mut self, task_id: u64, subtask_id: u64) -> Result<Task, AppError> {
        let mut next = self.tasks.clone();
        let task = next
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| AppError::task_not_found(task_id))?;
        let subtask = task
            .subtasks
            .iter_mut()
            .find(|subtask| subtask.task_id == subtask_id)
            .ok_or_else(|| AppError::subtask_not_found(subtask_id))?;
        subtask.progress = !subtask.progress;
        let done = subtask.progress;

        let updated = task.clone();
        self.commit(next)?;
        info!(task_id, subtask_id, done, "subtask toggled");
        Ok(updated)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<(), AppError> {
        self.store.write(TASKS_KEY, &next)?;
        self.tasks = next;
        Ok(())
    }
}

pub fn search_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    let query = query.trim();
    tasks
        .iter()
        .filter(|task| {
            query.is_empty()
                || contains_ignore_case(&task.title, query)
                || contains_ignore_case(&task.description, query)
        })
        .cloned()
        .collect()
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Categories come from the fixed list; the stored name uses its canonical
/// spelling.
fn required_category(value: &str) -> Result<String, AppError> {
    let category = required("category", value)?;
    Category::from_name(&category)
        .map(|known| known.name().to_string())
        .ok_or_else(|| AppError::invalid_input(format!("unknown category '{category}'")))
}

fn check_subtasks(subtasks: &[Subtask]) -> Result<(), AppError> {
    match ids::first_duplicate(subtasks) {
        Some(id) => Err(AppError::DuplicateId { kind: "subtask", id }),
        None => Ok(()),
    }
}
