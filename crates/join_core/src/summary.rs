use crate::model::{Priority, Progress, Task};
use serde::Serialize;
use serde_json::Value;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

pub const NO_DEADLINE: &str = "No tasks added";

/// Header figures shown on the summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub total: usize,
    pub urgent: usize,
    pub upcoming_deadline: String,
    pub greeting: &'static str,
    pub user_name: Option<String>,
}

impl Summary {
    pub fn compute(tasks: &[Task], hour: u8, user_name: Option<String>) -> Self {
        let count = |progress: Progress| tasks.iter().filter(|task| task.progress == progress).count();
        let upcoming_deadline = earliest_due_date(tasks)
            .and_then(|date| date.format(format_description!("[day]-[month]-[year]")).ok())
            .unwrap_or_else(|| NO_DEADLINE.to_string());

        Self {
            to_do: count(Progress::ToDo),
            in_progress: count(Progress::InProgress),
            await_feedback: count(Progress::AwaitFeedback),
            done: count(Progress::Done),
            total: tasks.len(),
            urgent: tasks
                .iter()
                .filter(|task| task.priority == Priority::Urgent)
                .count(),
            upcoming_deadline,
            greeting: greeting_for_hour(hour),
            user_name,
        }
    }
}

pub fn greeting_for_hour(hour: u8) -> &'static str {
    match hour {
        6..=11 => "Morning",
        12..=17 => "Evening",
        _ => "Night",
    }
}

/// Earliest `YYYY-MM-DD` due date; entries that do not parse are ignored.
pub fn earliest_due_date(tasks: &[Task]) -> Option<Date> {
    tasks
        .iter()
        .filter_map(|task| parse_due_date(&task.due_date))
        .min()
}

pub fn parse_due_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Name of the first entry of the stored `loggedInUser` array.
pub fn logged_in_user_name(value: &Value) -> Option<String> {
    value
        .get(0)?
        .get("name")?
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn current_local_hour() -> u8 {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).hour()
}

#[cfg(test)]
mod tests {
    use super::{NO_DEADLINE, Summary, greeting_for_hour, logged_in_user_name, parse_due_date};
    use crate::model::{Priority, Progress, Task};
    use serde_json::json;
    use time::{Date, Month};

    fn task(id: u64, due_date: &str, priority: Priority, progress: Progress) -> Task {
        Task {
            id,
            title: "T".to_string(),
            description: "D".to_string(),
            due_date: due_date.to_string(),
            priority,
            assigned_to: Vec::new(),
            category: "Media".to_string(),
            subtasks: Vec::new(),
            progress,
        }
    }

    #[test]
    fn counts_columns_and_urgent_tasks() {
        let tasks = vec![
            task(1, "2025-03-10", Priority::Urgent, Progress::ToDo),
            task(2, "2025-01-05", Priority::Low, Progress::ToDo),
            task(3, "2025-02-01", Priority::Urgent, Progress::Done),
            task(4, "2025-02-01", Priority::Medium, Progress::AwaitFeedback),
        ];

        let summary = Summary::compute(&tasks, 9, Some("Guest".to_string()));

        assert_eq!(summary.to_do, 2);
        assert_eq!(summary.in_progress, 0);
        assert_eq!(summary.await_feedback, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.urgent, 2);
        assert_eq!(summary.upcoming_deadline, "05-01-2025");
        assert_eq!(summary.greeting, "Morning");
    }

    #[test]
    fn empty_board_has_no_deadline() {
        let summary = Summary::compute(&[], 20, None);
        assert_eq!(summary.upcoming_deadline, NO_DEADLINE);
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn unparsable_due_dates_are_skipped() {
        let tasks = vec![
            task(1, "soon", Priority::Low, Progress::ToDo),
            task(2, "2026-07-14", Priority::Low, Progress::ToDo),
        ];
        assert_eq!(Summary::compute(&tasks, 0, None).upcoming_deadline, "14-07-2026");
    }

    #[test]
    fn greeting_follows_hour_ranges() {
        assert_eq!(greeting_for_hour(5), "Night");
        assert_eq!(greeting_for_hour(6), "Morning");
        assert_eq!(greeting_for_hour(11), "Morning");
        assert_eq!(greeting_for_hour(12), "Evening");
        assert_eq!(greeting_for_hour(17), "Evening");
        assert_eq!(greeting_for_hour(18), "Night");
    }

    #[test]
    fn parses_iso_due_dates() {
        assert_eq!(
            parse_due_date(" 2025-12-20 "),
            Some(Date::from_calendar_date(2025, Month::December, 20).unwrap())
        );
        assert_eq!(parse_due_date("20-12-2025"), None);
    }

    #[test]
    fn reads_first_logged_in_user_name() {
        assert_eq!(
            logged_in_user_name(&json!([{"name": "Sofia Müller"}])),
            Some("Sofia Müller".to_string())
        );
        assert_eq!(logged_in_user_name(&json!([])), None);
        assert_eq!(logged_in_user_name(&json!({"name": "x"})), None);
    }
}
