//! Read-only projection of the task list into board columns, cards and the
//! task detail view, plus their HTML fragments.

use crate::model::{Category, Priority, Progress, Task};
use crate::task_api::search_tasks;
use crate::text::escape_html;
use serde::Serialize;
use std::fmt::Write as _;

/// Horizontal step between stacked assignee badges on a card, in rem.
pub const BADGE_OFFSET_REM: f32 = 2.5;
/// Background for categories outside the fixed list.
pub const UNKNOWN_CATEGORY_COLOR: &str = "transparent";

pub const NO_SUBTASKS: &str = "No subtasks added";
pub const NO_CONTACTS: &str = "No contacts added";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub initials: String,
    pub color: String,
    pub left_rem: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub category_color: &'static str,
    pub progress: Progress,
    pub subtasks_done: usize,
    pub subtasks_total: usize,
    pub percent_done: u8,
    pub badges: Vec<Badge>,
    pub priority: Priority,
    pub priority_icon: &'static str,
}

impl CardView {
    pub fn from_task(task: &Task) -> Self {
        let badges = task
            .assigned_to
            .iter()
            .enumerate()
            .map(|(index, contact)| Badge {
                initials: contact.initials(),
                color: contact.color.clone(),
                left_rem: BADGE_OFFSET_REM * index as f32,
            })
            .collect();

        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
            category_color: category_color(&task.category),
            progress: task.progress,
            subtasks_done: task.done_subtasks(),
            subtasks_total: task.subtasks.len(),
            percent_done: task.completion_percent(),
            badges,
            priority: task.priority,
            priority_icon: task.priority.icon(),
        }
    }

    /// "1/2" style counter; `None` when the task has no subtasks.
    pub fn subtask_ratio(&self) -> Option<String> {
        (self.subtasks_total > 0).then(|| format!("{}/{}", self.subtasks_done, self.subtasks_total))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnView {
    pub progress: Progress,
    pub title: &'static str,
    pub cards: Vec<CardView>,
    /// Set only when the column has no cards.
    pub placeholder: Option<&'static str>,
}

impl ColumnView {
    pub fn new(progress: Progress, tasks: &[Task]) -> Self {
        let buckets = group_by_progress(tasks);
        Self::from_bucket(progress, &buckets[progress.index()])
    }

    fn from_bucket(progress: Progress, members: &[&Task]) -> Self {
        let cards: Vec<CardView> = members.iter().copied().map(CardView::from_task).collect();
        let placeholder = cards.is_empty().then(|| progress.empty_placeholder());

        Self {
            progress,
            title: progress.label(),
            cards,
            placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    pub query: Option<String>,
}

impl BoardView {
    pub fn new(tasks: &[Task]) -> Self {
        Self {
            columns: Progress::ALL
                .into_iter()
                .zip(group_by_progress(tasks))
                .map(|(progress, members)| ColumnView::from_bucket(progress, &members))
                .collect(),
            query: None,
        }
    }

    /// Board restricted to tasks whose title or description contains `query`.
    pub fn filtered(tasks: &[Task], query: &str) -> Self {
        let matches = search_tasks(tasks, query);
        let mut board = Self::new(&matches);
        board.query = Some(query.trim().to_string());
        board
    }

    pub fn column(&self, progress: Progress) -> &ColumnView {
        &self.columns[progress.index()]
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }
}

/// Stable partition into the four columns, in `Progress::ALL` order.
pub fn group_by_progress(tasks: &[Task]) -> [Vec<&Task>; 4] {
    let mut buckets: [Vec<&Task>; 4] = Default::default();
    for task in tasks {
        buckets[task.progress.index()].push(task);
    }
    buckets
}

pub fn category_color(category: &str) -> &'static str {
    Category::from_name(category)
        .map(Category::color)
        .unwrap_or(UNKNOWN_CATEGORY_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeLine {
    pub initials: String,
    pub full_name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtaskLine {
    pub id: u64,
    pub text: String,
    pub done: bool,
}

/// Everything the detail panel shows for one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDetail {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub category: String,
    pub category_color: &'static str,
    pub priority: &'static str,
    pub priority_icon: &'static str,
    pub progress: &'static str,
    pub assignees: Vec<AssigneeLine>,
    pub subtasks: Vec<SubtaskLine>,
}

impl TaskDetail {
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone(),
            category: task.category.clone(),
            category_color: category_color(&task.category),
            priority: task.priority.label(),
            priority_icon: task.priority.icon(),
            progress: task.progress.label(),
            assignees: task
                .assigned_to
                .iter()
                .map(|contact| AssigneeLine {
                    initials: contact.initials(),
                    full_name: contact.full_name(),
                    color: contact.color.clone(),
                })
                .collect(),
            subtasks: task
                .subtasks
                .iter()
                .map(|subtask| SubtaskLine {
                    id: subtask.task_id,
                    text: subtask.task.clone(),
                    done: subtask.progress,
                })
                .collect(),
        }
    }
}

pub fn render_board_html(board: &BoardView) -> String {
    let mut html = String::from("<div class=\"board\">\n");
    for column in &board.columns {
        html.push_str(&render_column_html(column));
    }
    html.push_str("</div>\n");
    html
}

pub fn render_column_html(column: &ColumnView) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<section class=\"board-column\" data-progress=\"{}\">",
        u8::from(column.progress)
    );
    let _ = writeln!(html, "<h2>{}</h2>", escape_html(column.title));
    match column.placeholder {
        Some(text) => {
            let _ = writeln!(html, "<div class=\"no-tasks\">{}</div>", escape_html(text));
        }
        None => {
            for card in &column.cards {
                html.push_str(&render_card_html(card));
            }
        }
    }
    html.push_str("</section>\n");
    html
}

pub fn render_card_html(card: &CardView) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<div class=\"progress-card\" data-id=\"{}\" data-progress=\"{}\">",
        card.id,
        u8::from(card.progress)
    );
    let _ = writeln!(
        html,
        "<div class=\"progress-card-category\" style=\"background: {}\">{}</div>",
        card.category_color,
        escape_html(&card.category)
    );
    let _ = writeln!(
        html,
        "<p class=\"progress-card-title\">{}</p>",
        escape_html(&card.title)
    );
    let _ = writeln!(
        html,
        "<p class=\"progress-card-description\">{}</p>",
        escape_html(&card.description)
    );
    if let Some(ratio) = card.subtask_ratio() {
        let _ = writeln!(
            html,
            "<div class=\"progress-percent-container\"><div class=\"progress-percent-status\" style=\"width: {}%\"></div></div>",
            card.percent_done
        );
        let _ = writeln!(
            html,
            "<p class=\"progress-percent-status-info\"><span>{ratio}</span> Subtasks</p>"
        );
    }
    html.push_str("<div class=\"progress-assigned-contacts\">");
    for badge in &card.badges {
        let _ = write!(
            html,
            "<div class=\"progress-card-assigned-contact\" style=\"left: {}rem; background-color: {}\">{}</div>",
            badge.left_rem,
            escape_html(&badge.color),
            escape_html(&badge.initials)
        );
    }
    let _ = writeln!(
        html,
        "<img src=\"./assets/img/{}\" alt=\"{}\" /></div>",
        card.priority_icon,
        card.priority.label()
    );
    html.push_str("</div>\n");
    html
}
