mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod app_shell;
pub use app_shell::{AppShellView, Section};

mod login;
pub use login::LoginView;

mod dashboard;
pub use dashboard::DashboardView;

mod projects;
pub use projects::ProjectsView;

mod project_form;
pub use project_form::ProjectFormModal;

mod tasks;
pub use tasks::TasksView;

mod task_form;
pub use task_form::TaskFormModal;

mod task_detail;
pub use task_detail::TaskDetailView;
