//! Every state change the front end can request, routed through one handler.

use crate::board::{BoardView, ColumnView, TaskDetail};
use crate::contact_api::{ContactDraft, ContactPatch, ContactRepository};
use crate::error::AppError;
use crate::model::{Contact, Progress, Task};
use crate::storage::LOGGED_IN_USER_KEY;
use crate::storage::sync::SyncedStore;
use crate::summary::{Summary, logged_in_user_name};
use crate::task_api::{TaskDraft, TaskPatch, TaskRepository};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    CreateTask(TaskDraft),
    UpdateTask { id: u64, patch: TaskPatch },
    MoveTask { id: u64, to: Progress },
    DeleteTask { id: u64 },
    ToggleSubtask { task_id: u64, subtask_id: u64 },
    CreateContact(ContactDraft),
    UpdateContact { id: u64, patch: ContactPatch },
    DeleteContact { id: u64 },
}

/// What the front end has to redraw after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderScope {
    Nothing,
    Board,
    Column(Progress),
    Contacts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Changed {
    Task(Task),
    Contact(Contact),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub message: String,
    pub render: RenderScope,
    pub changed: Changed,
}

/// Application state: the shared store plus both repositories.
pub struct App {
    store: Arc<SyncedStore>,
    tasks: TaskRepository,
    contacts: ContactRepository,
}

impl App {
    pub fn load(store: Arc<SyncedStore>) -> Result<Self, AppError> {
        let tasks = TaskRepository::load(Arc::clone(&store))?;
        let contacts = ContactRepository::load(Arc::clone(&store))?;
        Ok(Self {
            store,
            tasks,
            contacts,
        })
    }

    pub fn store(&self) -> &SyncedStore {
        &self.store
    }

    pub fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    pub fn contacts(&self) -> &ContactRepository {
        &self.contacts
    }

    pub fn board(&self, query: Option<&str>) -> BoardView {
        match query {
            Some(query) => BoardView::filtered(self.tasks.tasks(), query),
            None => BoardView::new(self.tasks.tasks()),
        }
    }

    pub fn column(&self, progress: Progress) -> ColumnView {
        ColumnView::new(progress, self.tasks.tasks())
    }

    pub fn detail(&self, id: u64) -> Result<TaskDetail, AppError> {
        self.tasks.get(id).map(TaskDetail::from_task)
    }

    pub fn summary(&self, hour: u8) -> Result<Summary, AppError> {
        let user = self.store.read::<Value>(LOGGED_IN_USER_KEY)?;
        let user_name = user.as_ref().and_then(logged_in_user_name);
        Ok(Summary::compute(self.tasks.tasks(), hour, user_name))
    }

    pub fn dispatch(&mut self, action: UiAction) -> Result<Outcome, AppError> {
        match action {
            UiAction::CreateTask(draft) => {
                let task = self.tasks.create(draft)?;
                Ok(task_outcome(
                    format!("Task {} added to {}", task.id, task.progress),
                    RenderScope::Board,
                    task,
                ))
            }
            UiAction::UpdateTask { id, patch } => {
                let task = self.tasks.update(id, patch)?;
                Ok(task_outcome(
                    format!("Task {id} updated"),
                    RenderScope::Board,
                    task,
                ))
            }
            UiAction::MoveTask { id, to } => {
                let moved = self.tasks.move_task(id, to)?;
                let (message, render) = if moved.changed {
                    (format!("Task {id} moved to {to}"), RenderScope::Board)
                } else {
                    (format!("Task {id} already in {to}"), RenderScope::Nothing)
                };
                Ok(task_outcome(message, render, moved.task))
            }
            UiAction::DeleteTask { id } => {
                let task = self.tasks.remove(id)?;
                Ok(task_outcome(
                    format!("Task {id} deleted"),
                    RenderScope::Board,
                    task,
                ))
            }
            UiAction::ToggleSubtask {
                task_id,
                subtask_id,
            } => {
                let task = self.tasks.toggle_subtask(task_id, subtask_id)?;
                let done = task.subtask(subtask_id).is_some_and(|subtask| subtask.progress);
                let state = if done { "done" } else { "open" };
                Ok(task_outcome(
                    format!("Subtask {subtask_id} of task {task_id} marked {state}"),
                    RenderScope::Column(task.progress),
                    task,
                ))
            }
            UiAction::CreateContact(draft) => {
                let contact = self.contacts.create(draft)?;
                Ok(contact_outcome(
                    format!("Contact {} added", contact.id),
                    contact,
                ))
            }
            UiAction::UpdateContact { id, patch } => {
                let contact = self.contacts.update(id, patch)?;
                Ok(contact_outcome(format!("Contact {id} updated"), contact))
            }
            UiAction::DeleteContact { id } => {
                let contact = self.contacts.remove(id)?;
                Ok(contact_outcome(format!("Contact {id} deleted"), contact))
            }
        }
    }
}

fn task_outcome(message: String, render: RenderScope, task: Task) -> Outcome {
    Outcome {
        message,
        render,
        changed: Changed::Task(task),
    }
}

fn contact_outcome(message: String, contact: Contact) -> Outcome {
    Outcome {
        message,
        render: RenderScope::Contacts,
        changed: Changed::Contact(contact),
    }
}
