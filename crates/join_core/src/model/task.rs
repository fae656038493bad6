use crate::model::Contact;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub assigned_to: Vec<Contact>,
    pub category: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub progress: Progress,
}

impl Task {
    pub fn subtask(&self, subtask_id: u64) -> Option<&Subtask> {
        self.subtasks.iter().find(|subtask| subtask.task_id == subtask_id)
    }

    pub fn done_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|subtask| subtask.progress).count()
    }

    /// Share of finished subtasks in percent; a task without subtasks is 0%.
    pub fn completion_percent(&self) -> u8 {
        let total = self.subtasks.len();
        if total == 0 {
            return 0;
        }
        ((self.done_subtasks() * 100) / total) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(deserialize_with = "numeric_id")]
    pub task_id: u64,
    pub task: String,
    #[serde(default)]
    pub progress: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

// Older boards stored subtask ids as strings taken from DOM attributes.
fn numeric_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Number(value) => Ok(value),
        RawId::Text(value) => value
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("subtask id '{value}' is not numeric"))),
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::Urgent];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::Urgent => "Urgent",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Low => "low.svg",
            Self::Medium => "medium.svg",
            Self::Urgent => "urgent.svg",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "urgent" => Ok(Self::Urgent),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// Board column a task sits in. Stored as the integers 0..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Progress {
    ToDo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl Progress {
    pub const ALL: [Progress; 4] = [
        Progress::ToDo,
        Progress::InProgress,
        Progress::AwaitFeedback,
        Progress::Done,
    ];

    pub fn index(self) -> usize {
        match self {
            Self::ToDo => 0,
            Self::InProgress => 1,
            Self::AwaitFeedback => 2,
            Self::Done => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To do",
            Self::InProgress => "In progress",
            Self::AwaitFeedback => "Await feedback",
            Self::Done => "Done",
        }
    }

    pub fn empty_placeholder(self) -> &'static str {
        match self {
            Self::ToDo => "No tasks to do",
            Self::InProgress => "No tasks in progress",
            Self::AwaitFeedback => "No tasks await feedback",
            Self::Done => "No tasks done",
        }
    }

    /// The columns a card can be sent to from the per-card menu.
    pub fn others(self) -> Vec<Progress> {
        Self::ALL.into_iter().filter(|column| *column != self).collect()
    }
}

impl TryFrom<u8> for Progress {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ToDo),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::AwaitFeedback),
            3 => Ok(Self::Done),
            other => Err(format!("progress must be 0-3, got {other}")),
        }
    }
}

impl From<Progress> for u8 {
    fn from(value: Progress) -> Self {
        value.index() as u8
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Progress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let cleaned: String = value
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match cleaned.as_str() {
            "0" | "todo" => Ok(Self::ToDo),
            "1" | "inprogress" => Ok(Self::InProgress),
            "2" | "awaitfeedback" | "feedback" => Ok(Self::AwaitFeedback),
            "3" | "done" => Ok(Self::Done),
            _ => Err(format!("unknown column '{}'", value.trim())),
        }
    }
}
