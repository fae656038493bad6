//! The add/edit task form. One form serves both modes; a bound task id means
//! edit. Validation problems come back as `FormErrors`, never as `AppError`.

use crate::action::{App, Outcome, UiAction};
use crate::contact_api::filter_contacts;
use crate::error::AppError;
use crate::ids;
use crate::model::{CATEGORY_PLACEHOLDER, Category, Contact, Priority, Progress, Subtask, Task};
use crate::task_api::{TaskDraft, TaskPatch};
use crate::text::capitalize_first;
use std::fmt;
use thiserror::Error;

/// Subtasks need more than this many characters after trimming.
pub const SUBTASK_MIN_CHARS: usize = 3;
pub const SUBTASK_ERROR_PLACEHOLDER: &str = "Please enter a subtask!";
pub const REQUIRED_MESSAGE: &str = "This field is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    DueDate,
    Category,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::DueDate => "due date",
            Self::Category => "category",
        }
    }
}

/// Every field that failed the submit gate, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub fields: Vec<FormField>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.fields.contains(&field)
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(|field| field.name()).collect();
        write!(f, "{REQUIRED_MESSAGE}: {}", names.join(", "))
    }
}

impl std::error::Error for FormErrors {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(FormErrors),
    #[error("{0}")]
    Failed(#[from] AppError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Please enter a subtask!")]
pub struct SubtaskRejected;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    bound_id: Option<u64>,
    column: Progress,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: String,
    priority: Option<Priority>,
    assigned: Vec<Contact>,
    subtasks: Vec<Subtask>,
}

impl TaskForm {
    /// Empty create form opened from `column`'s "+" button.
    pub fn create(column: Progress) -> Self {
        Self {
            bound_id: None,
            column,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            category: CATEGORY_PLACEHOLDER.to_string(),
            priority: None,
            assigned: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    /// Edit form pre-filled from an existing task.
    pub fn edit(task: &Task) -> Self {
        Self {
            bound_id: Some(task.id),
            column: task.progress,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            category: task.category.clone(),
            priority: Some(task.priority),
            assigned: task.assigned_to.clone(),
            subtasks: task.subtasks.clone(),
        }
    }

    pub fn bound_id(&self) -> Option<u64> {
        self.bound_id
    }

    pub fn column(&self) -> Progress {
        self.column
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Activates `priority`, replacing whichever one was active.
    pub fn select_priority(&mut self, priority: Priority) {
        self.priority = Some(priority);
    }

    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    pub fn add_subtask(&mut self, text: &str) -> Result<u64, SubtaskRejected> {
        let text = accepted_subtask_text(text)?;
        let id = ids::next_id(&self.subtasks);
        self.subtasks.push(Subtask {
            task_id: id,
            task: text,
            progress: false,
        });
        Ok(id)
    }

    /// Returns `Ok(false)` when no subtask has that id.
    pub fn rename_subtask(&mut self, id: u64, text: &str) -> Result<bool, SubtaskRejected> {
        let text = accepted_subtask_text(text)?;
        match self.subtasks.iter_mut().find(|subtask| subtask.task_id == id) {
            Some(subtask) => {
                subtask.task = text;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_subtask(&mut self, id: u64) -> bool {
        let before = self.subtasks.len();
        self.subtasks.retain(|subtask| subtask.task_id != id);
        self.subtasks.len() != before
    }

    pub fn assigned(&self) -> &[Contact] {
        &self.assigned
    }

    pub fn is_assigned(&self, contact_id: u64) -> bool {
        self.assigned.iter().any(|contact| contact.id == contact_id)
    }

    /// Adds or removes `contact`; returns whether it is selected afterwards.
    pub fn toggle_contact(&mut self, contact: &Contact) -> bool {
        if self.is_assigned(contact.id) {
            self.assigned.retain(|assigned| assigned.id != contact.id);
            false
        } else {
            self.assigned.push(contact.clone());
            true
        }
    }

    /// Contacts offered by the assignment dropdown for the typed filter.
    pub fn contact_choices(&self, contacts: &[Contact], query: &str) -> Vec<(Contact, bool)> {
        filter_contacts(contacts, query)
            .into_iter()
            .map(|contact| {
                let selected = self.is_assigned(contact.id);
                (contact, selected)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.title.trim().is_empty() {
            errors.fields.push(FormField::Title);
        }
        if self.description.trim().is_empty() {
            errors.fields.push(FormField::Description);
        }
        if self.due_date.trim().is_empty() {
            errors.fields.push(FormField::DueDate);
        }
        if Category::from_name(&self.category).is_none() {
            errors.fields.push(FormField::Category);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Builds the action a successful submit dispatches.
    pub fn to_action(&self) -> Result<UiAction, FormErrors> {
        self.validate()?;
        let action = match self.bound_id {
            None => UiAction::CreateTask(TaskDraft {
                title: self.title.clone(),
                description: self.description.clone(),
                due_date: self.due_date.clone(),
                category: self.category.clone(),
                priority: self.priority,
                assigned_to: self.assigned.clone(),
                subtasks: self.subtasks.clone(),
                progress: self.column,
            }),
            Some(id) => UiAction::UpdateTask {
                id,
                patch: TaskPatch {
                    title: Some(self.title.clone()),
                    description: Some(self.description.clone()),
                    due_date: Some(self.due_date.clone()),
                    category: Some(self.category.clone()),
                    priority: self.priority,
                    assigned_to: Some(self.assigned.clone()),
                    subtasks: Some(self.subtasks.clone()),
                },
            },
        };
        Ok(action)
    }

    /// Validates, dispatches and resets the form. On any failure the form keeps
    /// its input so it can be corrected.
    pub fn submit(&mut self, app: &mut App) -> Result<Outcome, SubmitError> {
        let action = self.to_action().map_err(SubmitError::Invalid)?;
        let outcome = app.dispatch(action)?;
        self.clear();
        Ok(outcome)
    }

    /// Back to an empty create form for the same column.
    pub fn clear(&mut self) {
        *self = Self::create(self.column);
    }
}

fn accepted_subtask_text(text: &str) -> Result<String, SubtaskRejected> {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SUBTASK_MIN_CHARS {
        return Err(SubtaskRejected);
    }
    Ok(capitalize_first(trimmed))
}
