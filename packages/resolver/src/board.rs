//! Kanban columns and task counters derived from a visible task list.

use chrono::NaiveDate;

use crate::display::is_past;
use crate::models::{Task, TaskStatus};

/// Column heading for a status on the board.
pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "To Do",
        TaskStatus::InProgress => "In Progress",
        TaskStatus::Review => "In Review",
        TaskStatus::Testing => "Testing",
        TaskStatus::Completed => "Completed",
        TaskStatus::Blocked => "Blocked",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct KanbanColumn<'t> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'t Task>,
}

/// One column per status in board order; tasks keep their input order.
pub fn kanban_columns<'t>(tasks: &[&'t Task]) -> Vec<KanbanColumn<'t>> {
    TaskStatus::ALL
        .into_iter()
        .map(|status| KanbanColumn {
            status,
            title: column_title(status),
            tasks: tasks.iter().copied().filter(|t| t.status == status).collect(),
        })
        .collect()
}

/// A task is overdue when its due date is before `today` and it is not completed.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.status != TaskStatus::Completed && is_past(&task.due_date, today)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub overdue: usize,
}

pub fn task_stats(tasks: &[&Task], today: NaiveDate) -> TaskStats {
    tasks.iter().fold(TaskStats::default(), |mut stats, task| {
        stats.total += 1;
        match task.status {
            TaskStatus::Completed => stats.completed += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            _ => {}
        }
        if is_overdue(task, today) {
            stats.overdue += 1;
        }
        stats
    })
}
