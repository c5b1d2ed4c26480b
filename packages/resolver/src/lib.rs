pub mod analytics;
pub mod board;
pub mod display;
pub mod envelope;
pub mod filter;
pub mod form;
pub mod models;
pub mod policy;
pub mod query;
pub mod relation;

mod de;

pub use analytics::DashboardAnalytics;
pub use board::{kanban_columns, task_stats, KanbanColumn, TaskStats};
pub use envelope::{decode_collection, decode_entity, normalize, ApiEnvelope, Pagination};
pub use filter::{team_candidates, visible_projects, visible_tasks, ProjectFilter, TaskFilter};
pub use form::{ProjectForm, TaskForm, TaskPatch, ValidationError};
pub use models::{
    Project, ProjectPriority, ProjectStatus, Role, Task, TaskComment, TaskPriority, TaskStatus,
    User,
};
pub use policy::{AccessPolicy, PolicyOptions};
pub use query::{Page, ProjectQuery, SortOrder, TaskQuery};
pub use relation::{extract_id, extract_ids, extract_label, extract_label_or, Related, Relation};
